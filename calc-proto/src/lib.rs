//! Generated gRPC code for the `calc.v1.Orchestrator` service (§6.2).

#[allow(clippy::enum_variant_names)]
pub mod proto {
    tonic::include_proto!("calc.v1");
}

//! calc-orchestrator — JWT-authenticated REST façade (§6.1) plus the
//! gRPC task dispatcher agents poll (§6.2). Reads config from env vars:
//!   DATABASE_URL      — sqlite connection string (default: sqlite://calc.db)
//!   JWT_SECRET        — JWT HMAC secret (required)
//!   BIND_ADDR         — HTTP listen address (default: 0.0.0.0:4100)
//!   GRPC_ADDR         — gRPC listen address (default: 0.0.0.0:50051)
//!   TIME_ADDITION_MS, TIME_SUBTRACTION_MS, TIME_MULTIPLICATIONS_MS,
//!   TIME_DIVISIONS_MS — per-operator artificial delay (§4.3)

use std::sync::Arc;

use calc_core::delay::DelayConfig;
use calc_core::ports::{ExpressionStore, UserStore};
use calc_core::recovery;
use calc_core::registry::TaskRegistry;
use calc_orchestrator::auth::JwtConfig;
use calc_orchestrator::dispatcher::DispatcherService;
use calc_orchestrator::router::build_router;
use calc_orchestrator::state::AppState;
use calc_proto::proto::orchestrator_server::OrchestratorServer;
use calc_store::SqliteStores;
use sqlx::sqlite::SqlitePoolOptions;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tonic::transport::Server as GrpcServer;
use tracing_subscriber::EnvFilter;

fn env_ms(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,calc_orchestrator=debug".into()),
        )
        .init();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://calc.db?mode=rwc".into());
    let jwt_secret = std::env::var("JWT_SECRET").expect("JWT_SECRET must be set");
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:4100".into());
    let grpc_addr: std::net::SocketAddr = std::env::var("GRPC_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:50051".into())
        .parse()
        .expect("GRPC_ADDR must be a valid socket address");

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .expect("failed to connect to database");
    calc_store::migrate(&pool).await.expect("migration failed");
    tracing::info!("connected to database");

    let stores = SqliteStores::new(pool);
    let users: Arc<dyn UserStore> = Arc::new(stores.users);
    let expressions: Arc<dyn ExpressionStore> = Arc::new(stores.expressions);

    let recovered = recovery::recover_arc(expressions.clone())
        .await
        .expect("recovery failed");
    if recovered > 0 {
        tracing::warn!(count = recovered, "recovered stranded expressions at startup");
    }

    let delay = DelayConfig {
        add_ms: env_ms("TIME_ADDITION_MS", 1000),
        sub_ms: env_ms("TIME_SUBTRACTION_MS", 1000),
        mul_ms: env_ms("TIME_MULTIPLICATIONS_MS", 1000),
        div_ms: env_ms("TIME_DIVISIONS_MS", 1000),
    };

    let shutdown = CancellationToken::new();
    let registry = TaskRegistry::new();

    let state = AppState {
        users,
        expressions,
        registry: registry.clone(),
        delay,
        shutdown: shutdown.clone(),
    };

    let jwt_config = JwtConfig::from_secret(jwt_secret.as_bytes());
    let app = build_router(state, jwt_config);

    let grpc_shutdown = shutdown.clone();
    let grpc_task = tokio::spawn(async move {
        tracing::info!(%grpc_addr, "gRPC dispatcher listening");
        GrpcServer::builder()
            .add_service(OrchestratorServer::new(DispatcherService { registry }))
            .serve_with_shutdown(grpc_addr, grpc_shutdown.cancelled())
            .await
            .expect("gRPC server error");
    });

    let listener = TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind to {bind_addr}: {e}"));
    tracing::info!(%bind_addr, "HTTP server listening");

    let http_shutdown = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { http_shutdown.cancelled().await })
        .await
        .expect("HTTP server error");

    shutdown.cancel();
    let _ = grpc_task.await;
}

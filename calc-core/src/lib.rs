//! calc-core — the expression compiler, task dispatch protocol state, and
//! expression lifecycle manager for the distributed arithmetic evaluator.
//! Storage- and transport-agnostic: everything here depends only on the
//! trait ports in [`ports`], never on `sqlx`, `axum`, or `tonic` directly.

pub mod cell;
pub mod delay;
pub mod error;
pub mod graph;
pub mod lexer;
pub mod lifecycle;
pub mod parser;
pub mod ports;
pub mod recovery;
pub mod registry;
pub mod types;

//! Shared application state, injected into every handler via
//! `axum::Extension` — same wiring shape as the teacher's `CoreService`.

use std::sync::Arc;

use calc_core::delay::DelayConfig;
use calc_core::ports::{ExpressionStore, UserStore};
use calc_core::registry::TaskRegistry;
use tokio_util::sync::CancellationToken;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub expressions: Arc<dyn ExpressionStore>,
    pub registry: TaskRegistry,
    pub delay: DelayConfig,
    pub shutdown: CancellationToken,
}

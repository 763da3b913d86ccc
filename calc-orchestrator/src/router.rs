//! Router construction (§6.1) — same public/protected split as the
//! teacher's `sem_os_server::router::build_router`.

use axum::{
    middleware as axum_mw,
    routing::{get, post},
    Extension, Router,
};

use crate::auth::JwtConfig;
use crate::handlers;
use crate::middleware::jwt::jwt_auth;
use crate::state::AppState;

pub fn build_router(state: AppState, jwt_config: JwtConfig) -> Router {
    let protected = Router::new()
        .route("/api/v1/calculate", post(handlers::calculate::calculate))
        .route("/api/v1/expressions", get(handlers::expressions::list))
        .route(
            "/api/v1/expressions/:id",
            get(handlers::expressions::get_one),
        )
        .layer(axum_mw::from_fn_with_state(jwt_config.clone(), jwt_auth))
        .with_state(state.clone());

    let public = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/v1/register", post(handlers::auth::register))
        .route("/api/v1/login", post(handlers::auth::login))
        .with_state(state)
        .layer(Extension(jwt_config));

    public.merge(protected)
}

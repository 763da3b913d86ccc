//! JWT middleware. Extracts `Authorization: Bearer <token>`, validates it,
//! and injects the resolved `UserId` into request extensions. Returns 401
//! if the header is missing or the token doesn't verify — mirrors the
//! teacher's `sem_os_server::middleware::jwt::jwt_auth`.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::auth::JwtConfig;

#[derive(Clone, Copy, Debug)]
pub struct UserId(pub i64);

pub async fn jwt_auth(
    State(jwt_config): State<JwtConfig>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| unauthorized("missing Authorization header"))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| unauthorized("invalid Authorization header format — expected 'Bearer <token>'"))?;

    let claims = jwt_config.verify(token).map_err(|e| {
        tracing::warn!("JWT validation failed: {e}");
        unauthorized("invalid token")
    })?;

    let user_id: i64 = claims
        .sub
        .parse()
        .map_err(|_| unauthorized("invalid claims"))?;

    req.extensions_mut().insert(UserId(user_id));

    Ok(next.run(req).await)
}

fn unauthorized(msg: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": msg }))).into_response()
}

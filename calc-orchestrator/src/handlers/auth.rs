//! POST /api/v1/register, POST /api/v1/login (§6.1).

use axum::{extract::State, http::StatusCode, Extension, Json};
use calc_core::error::CalcError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::auth::{hash_password, verify_password, JwtConfig};
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub login: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub info: &'static str,
    pub token: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<Credentials>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let hash = hash_password(&body.password)?;
    state.users.create(&body.login, &hash).await?;
    Ok((StatusCode::OK, Json(json!({ "info": "OK" }))))
}

pub async fn login(
    State(state): State<AppState>,
    Extension(jwt_config): Extension<JwtConfig>,
    Json(body): Json<Credentials>,
) -> Result<Json<LoginResponse>, AppError> {
    let user = state
        .users
        .find_by_login(&body.login)
        .await?
        .ok_or(CalcError::InvalidCredentials)?;

    if !verify_password(&body.password, &user.password_hash) {
        return Err(CalcError::InvalidCredentials.into());
    }

    let token = jwt_config.issue(user.id)?;
    Ok(Json(LoginResponse { info: "OK", token }))
}

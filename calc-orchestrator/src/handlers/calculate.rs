//! POST /api/v1/calculate (§6.1, §4.7). Persists a `pending` Expression,
//! spawns its Lifecycle, and returns immediately with the new id — syntax
//! and arithmetic errors surface later through the expression's status,
//! not synchronously here (only the trivial "no expression" case is
//! rejected up front, matching the original handler's empty-body check).

use axum::{extract::State, http::StatusCode, Extension, Json};
use calc_core::error::CalcError;
use calc_core::lifecycle;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::jwt::UserId;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CalculateRequest {
    pub expression: String,
}

#[derive(Debug, Serialize)]
pub struct CalculateResponse {
    pub id: String,
}

pub async fn calculate(
    State(state): State<AppState>,
    Extension(UserId(user_id)): Extension<UserId>,
    Json(body): Json<CalculateRequest>,
) -> Result<(StatusCode, Json<CalculateResponse>), AppError> {
    if body.expression.trim().is_empty() {
        return Err(CalcError::InvalidExpression.into());
    }

    let id = Uuid::now_v7().to_string();
    state
        .expressions
        .create(&id, user_id, &body.expression)
        .await?;

    tokio::spawn(lifecycle::run(
        id.clone(),
        body.expression,
        state.registry.clone(),
        state.expressions.clone(),
        state.delay,
        state.shutdown.clone(),
    ));

    Ok((StatusCode::CREATED, Json(CalculateResponse { id })))
}

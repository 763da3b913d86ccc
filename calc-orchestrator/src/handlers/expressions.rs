//! GET /api/v1/expressions, GET /api/v1/expressions/{id} (§6.1, §3).
//! An expression is only ever visible to the user who created it — a
//! lookup by another owner returns 404, not 403, so existence itself
//! isn't leaked across accounts.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use calc_core::error::CalcError;
use calc_core::types::Expression;
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::middleware::jwt::UserId;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ExpressionView {
    pub id: String,
    pub status: String,
    pub result: Option<f64>,
}

impl From<Expression> for ExpressionView {
    fn from(e: Expression) -> Self {
        Self {
            id: e.id,
            status: e.status.as_str(),
            result: e.result,
        }
    }
}

pub async fn list(
    State(state): State<AppState>,
    Extension(UserId(user_id)): Extension<UserId>,
) -> Result<Json<Value>, AppError> {
    let expressions = state.expressions.list_for_owner(user_id).await?;
    let views: Vec<ExpressionView> = expressions.into_iter().map(Into::into).collect();
    Ok(Json(json!({ "expressions": views })))
}

pub async fn get_one(
    State(state): State<AppState>,
    Extension(UserId(user_id)): Extension<UserId>,
    Path(id): Path<String>,
) -> Result<Json<ExpressionView>, AppError> {
    let expression = state
        .expressions
        .get(&id)
        .await?
        .ok_or_else(|| CalcError::NotFound(id.clone()))?;

    if expression.owner != user_id {
        return Err(CalcError::NotFound(id).into());
    }

    Ok(Json(expression.into()))
}

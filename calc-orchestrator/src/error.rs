//! Maps `CalcError` to HTTP status codes and JSON error bodies, the same
//! shape as the teacher's `sem_os_server::error::AppError`.

use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use calc_core::error::CalcError;
use serde_json::json;

pub struct AppError(pub CalcError);

impl From<CalcError> for AppError {
    fn from(e: CalcError) -> Self {
        Self(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            CalcError::NotFound(_) => StatusCode::NOT_FOUND,
            CalcError::Forbidden => StatusCode::FORBIDDEN,
            CalcError::Conflict(_) => StatusCode::CONFLICT,
            CalcError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            CalcError::InvalidCharacter(_)
            | CalcError::InvalidNumber
            | CalcError::BracketMismatch
            | CalcError::InvalidExpression
            | CalcError::DivisionByZero => StatusCode::UNPROCESSABLE_ENTITY,
            CalcError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = json!({ "error": self.0.to_string() });
        (status, Json(body)).into_response()
    }
}

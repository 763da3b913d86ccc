//! Core error taxonomy. One enum for every class in the error design (§7):
//! syntax, structural, arithmetic, auth/ownership, and persistence failures.
//! Below the lifecycle these propagate as typed values; nothing panics.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CalcError {
    #[error("invalid character: {0}")]
    InvalidCharacter(char),

    #[error("invalid number format")]
    InvalidNumber,

    #[error("bracket mismatch")]
    BracketMismatch,

    #[error("invalid expression")]
    InvalidExpression,

    #[error("division by zero")]
    DivisionByZero,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("forbidden")]
    Forbidden,

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("server error: {0}")]
    Internal(String),
}

impl CalcError {
    /// The string persisted as `failed:<reason>` on the Expression.
    pub fn as_failure_reason(&self) -> String {
        match self {
            CalcError::InvalidCharacter(_) => "invalid character".to_string(),
            CalcError::InvalidNumber => "invalid number format".to_string(),
            CalcError::BracketMismatch => "bracket mismatch".to_string(),
            CalcError::InvalidExpression => "invalid expression".to_string(),
            CalcError::DivisionByZero => "division by zero".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<anyhow::Error> for CalcError {
    fn from(e: anyhow::Error) -> Self {
        CalcError::Internal(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CalcError>;

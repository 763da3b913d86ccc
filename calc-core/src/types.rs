//! Core data model (§3): Expression, Token, Task. Transient tagged values
//! use plain enums; durable rows carry `serde` derives for the store layer.

use serde::{Deserialize, Serialize};

// ─── Operator ─────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    /// Shunting-yard precedence: `{+,-}=1`, `{*,/}=2`.
    pub fn precedence(self) -> u8 {
        match self {
            Operator::Add | Operator::Sub => 1,
            Operator::Mul | Operator::Div => 2,
        }
    }

    pub fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            Operator::Add => a + b,
            Operator::Sub => a - b,
            Operator::Mul => a * b,
            Operator::Div => a / b,
        }
    }

    /// Wire representation of the operator sent to agents alongside a
    /// Task (§6.2), matching the original protocol's literal `+ - * /`.
    pub fn as_char(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '*',
            Operator::Div => '/',
        }
    }
}

// ─── Token ────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    Number(f64),
    Operator(Operator),
    LParen,
    RParen,
}

// ─── Task ─────────────────────────────────────────────────────

/// A dispatchable binary operation, created once both argument cells
/// resolve. Process-local; never persisted (§1 Non-goals).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub arg1: f64,
    pub arg2: f64,
    pub operator: Operator,
    pub delay_ms: u64,
}

/// Result posted back by an agent for a given task id.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SolvedTask {
    pub id: String,
    pub result: f64,
}

// ─── Expression ───────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ExpressionStatus {
    Pending,
    Processing,
    Completed,
    Failed(String),
}

impl ExpressionStatus {
    pub fn as_str(&self) -> String {
        match self {
            ExpressionStatus::Pending => "pending".to_string(),
            ExpressionStatus::Processing => "processing".to_string(),
            ExpressionStatus::Completed => "completed".to_string(),
            ExpressionStatus::Failed(reason) => format!("failed: {reason}"),
        }
    }

    pub fn from_db(status: &str, failure_reason: Option<&str>) -> Self {
        match status {
            "pending" => ExpressionStatus::Pending,
            "processing" => ExpressionStatus::Processing,
            "completed" => ExpressionStatus::Completed,
            "failed" => ExpressionStatus::Failed(failure_reason.unwrap_or_default().to_string()),
            other => ExpressionStatus::Failed(format!("unknown status: {other}")),
        }
    }

    /// `(status, failure_reason)` as persisted in the `expressions` table.
    pub fn to_db(&self) -> (&'static str, Option<String>) {
        match self {
            ExpressionStatus::Pending => ("pending", None),
            ExpressionStatus::Processing => ("processing", None),
            ExpressionStatus::Completed => ("completed", None),
            ExpressionStatus::Failed(reason) => ("failed", Some(reason.clone())),
        }
    }
}

/// A durable Expression row (§3). `result` is meaningful only once
/// `status = Completed`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Expression {
    pub id: String,
    pub owner: i64,
    pub source: String,
    pub status: ExpressionStatus,
    pub result: Option<f64>,
}

/// A durable User row.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub login: String,
    pub password_hash: String,
}

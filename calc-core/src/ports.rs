//! Storage port traits — implemented by `calc-store`. Core logic depends
//! only on these traits, never on `sqlx` directly (mirrors the teacher's
//! `ProcessStore`/`SnapshotStore` boundary).

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Expression, ExpressionStatus, User};

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, login: &str, password_hash: &str) -> Result<User>;
    async fn find_by_login(&self, login: &str) -> Result<Option<User>>;
    async fn find_by_id(&self, id: i64) -> Result<Option<User>>;
}

#[async_trait]
pub trait ExpressionStore: Send + Sync {
    async fn create(&self, id: &str, owner: i64, source: &str) -> Result<Expression>;
    async fn set_status(&self, id: &str, status: &ExpressionStatus) -> Result<()>;
    async fn set_completed(&self, id: &str, result: f64) -> Result<()>;
    async fn get(&self, id: &str) -> Result<Option<Expression>>;
    async fn list_for_owner(&self, owner: i64) -> Result<Vec<Expression>>;
    /// All expressions left in `processing` at last shutdown — consumed
    /// once, at orchestrator startup, by Recovery (C8).
    async fn list_processing(&self) -> Result<Vec<Expression>>;
}

//! calc-store — sqlite adapters implementing `calc-core`'s storage ports.
//! Mirrors the teacher's `sem_os_postgres` crate: one newtype per port
//! wrapping a shared pool, plus a convenience struct that builds them all.

pub mod store;

pub use store::{SqliteExpressionStore, SqliteUserStore};

use sqlx::SqlitePool;

/// Bundles both sqlite adapters, built from one shared pool (grounded on
/// `sem_os_postgres::PgStores`).
pub struct SqliteStores {
    pub users: SqliteUserStore,
    pub expressions: SqliteExpressionStore,
}

impl SqliteStores {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            users: SqliteUserStore::new(pool.clone()),
            expressions: SqliteExpressionStore::new(pool),
        }
    }
}

/// Run the embedded migration that creates `users` and `expressions`.
pub async fn migrate(pool: &SqlitePool) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            login TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS expressions (
            id TEXT PRIMARY KEY,
            owner INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            source TEXT NOT NULL,
            status TEXT NOT NULL,
            failure_reason TEXT,
            result REAL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use calc_core::ports::{ExpressionStore, UserStore};
    use calc_core::types::ExpressionStatus;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        migrate(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn create_and_find_user() {
        let stores = SqliteStores::new(test_pool().await);
        let user = stores.users.create("alice", "hash").await.unwrap();
        assert_eq!(user.login, "alice");

        let found = stores.users.find_by_login("alice").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
    }

    #[tokio::test]
    async fn duplicate_login_is_conflict() {
        let stores = SqliteStores::new(test_pool().await);
        stores.users.create("alice", "hash").await.unwrap();
        let err = stores.users.create("alice", "hash2").await.unwrap_err();
        assert!(matches!(err, calc_core::error::CalcError::Conflict(_)));
    }

    #[tokio::test]
    async fn expression_lifecycle_roundtrip() {
        let stores = SqliteStores::new(test_pool().await);
        let user = stores.users.create("bob", "hash").await.unwrap();
        stores
            .expressions
            .create("e1", user.id, "2+2")
            .await
            .unwrap();

        stores
            .expressions
            .set_status("e1", &ExpressionStatus::Processing)
            .await
            .unwrap();
        stores.expressions.set_completed("e1", 4.0).await.unwrap();

        let expr = stores.expressions.get("e1").await.unwrap().unwrap();
        assert_eq!(expr.status, ExpressionStatus::Completed);
        assert_eq!(expr.result, Some(4.0));
    }

    #[tokio::test]
    async fn list_for_owner_only_returns_that_owners_expressions() {
        let stores = SqliteStores::new(test_pool().await);
        let a = stores.users.create("a", "h").await.unwrap();
        let b = stores.users.create("b", "h").await.unwrap();
        stores.expressions.create("e1", a.id, "1+1").await.unwrap();
        stores.expressions.create("e2", b.id, "2+2").await.unwrap();

        let a_list = stores.expressions.list_for_owner(a.id).await.unwrap();
        assert_eq!(a_list.len(), 1);
        assert_eq!(a_list[0].id, "e1");
    }

    #[tokio::test]
    async fn list_processing_finds_stranded_expressions() {
        let stores = SqliteStores::new(test_pool().await);
        let user = stores.users.create("c", "h").await.unwrap();
        stores.expressions.create("e1", user.id, "1+1").await.unwrap();
        stores
            .expressions
            .set_status("e1", &ExpressionStatus::Processing)
            .await
            .unwrap();

        let stranded = stores.expressions.list_processing().await.unwrap();
        assert_eq!(stranded.len(), 1);
    }
}

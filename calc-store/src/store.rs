//! sqlite implementations of `calc-core`'s port traits. All SQL is
//! runtime-checked (`sqlx::query`, not `sqlx::query!`) so the crate builds
//! without a live database connection, the same discipline the teacher's
//! Postgres adapters follow.

use anyhow::anyhow;
use async_trait::async_trait;
use sqlx::SqlitePool;

use calc_core::error::{CalcError, Result};
use calc_core::ports::{ExpressionStore, UserStore};
use calc_core::types::{Expression, ExpressionStatus, User};

// ── SqliteUserStore ───────────────────────────────────────────

pub struct SqliteUserStore {
    pool: SqlitePool,
}

impl SqliteUserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for SqliteUserStore {
    async fn create(&self, login: &str, password_hash: &str) -> Result<User> {
        let existing = self.find_by_login(login).await?;
        if existing.is_some() {
            return Err(CalcError::Conflict(format!("user already exists: {login}")));
        }

        let id = sqlx::query(
            r#"INSERT INTO users (login, password_hash) VALUES (?1, ?2)"#,
        )
        .bind(login)
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| CalcError::from(anyhow!(e)))?
        .last_insert_rowid();

        Ok(User {
            id,
            login: login.to_string(),
            password_hash: password_hash.to_string(),
        })
    }

    async fn find_by_login(&self, login: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, (i64, String, String)>(
            r#"SELECT id, login, password_hash FROM users WHERE login = ?1"#,
        )
        .bind(login)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CalcError::from(anyhow!(e)))?;

        Ok(row.map(|(id, login, password_hash)| User {
            id,
            login,
            password_hash,
        }))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, (i64, String, String)>(
            r#"SELECT id, login, password_hash FROM users WHERE id = ?1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CalcError::from(anyhow!(e)))?;

        Ok(row.map(|(id, login, password_hash)| User {
            id,
            login,
            password_hash,
        }))
    }
}

// ── SqliteExpressionStore ─────────────────────────────────────

pub struct SqliteExpressionStore {
    pool: SqlitePool,
}

impl SqliteExpressionStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_expression(
        id: String,
        owner: i64,
        source: String,
        status: String,
        failure_reason: Option<String>,
        result: Option<f64>,
    ) -> Expression {
        Expression {
            id,
            owner,
            source,
            status: ExpressionStatus::from_db(&status, failure_reason.as_deref()),
            result,
        }
    }
}

type ExpressionRow = (String, i64, String, String, Option<String>, Option<f64>);

#[async_trait]
impl ExpressionStore for SqliteExpressionStore {
    async fn create(&self, id: &str, owner: i64, source: &str) -> Result<Expression> {
        sqlx::query(
            r#"INSERT INTO expressions (id, owner, source, status) VALUES (?1, ?2, ?3, 'pending')"#,
        )
        .bind(id)
        .bind(owner)
        .bind(source)
        .execute(&self.pool)
        .await
        .map_err(|e| CalcError::from(anyhow!(e)))?;

        Ok(Expression {
            id: id.to_string(),
            owner,
            source: source.to_string(),
            status: ExpressionStatus::Pending,
            result: None,
        })
    }

    async fn set_status(&self, id: &str, status: &ExpressionStatus) -> Result<()> {
        let (status_str, failure_reason) = status.to_db();
        sqlx::query(
            r#"UPDATE expressions SET status = ?1, failure_reason = ?2 WHERE id = ?3"#,
        )
        .bind(status_str)
        .bind(failure_reason)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| CalcError::from(anyhow!(e)))?;
        Ok(())
    }

    async fn set_completed(&self, id: &str, result: f64) -> Result<()> {
        sqlx::query(
            r#"UPDATE expressions SET status = 'completed', result = ?1 WHERE id = ?2"#,
        )
        .bind(result)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| CalcError::from(anyhow!(e)))?;
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Expression>> {
        let row = sqlx::query_as::<_, ExpressionRow>(
            r#"SELECT id, owner, source, status, failure_reason, result FROM expressions WHERE id = ?1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CalcError::from(anyhow!(e)))?;

        Ok(row.map(|(id, owner, source, status, failure_reason, result)| {
            Self::row_to_expression(id, owner, source, status, failure_reason, result)
        }))
    }

    async fn list_for_owner(&self, owner: i64) -> Result<Vec<Expression>> {
        let rows = sqlx::query_as::<_, ExpressionRow>(
            r#"SELECT id, owner, source, status, failure_reason, result FROM expressions WHERE owner = ?1 ORDER BY rowid"#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| CalcError::from(anyhow!(e)))?;

        Ok(rows
            .into_iter()
            .map(|(id, owner, source, status, failure_reason, result)| {
                Self::row_to_expression(id, owner, source, status, failure_reason, result)
            })
            .collect())
    }

    async fn list_processing(&self) -> Result<Vec<Expression>> {
        let rows = sqlx::query_as::<_, ExpressionRow>(
            r#"SELECT id, owner, source, status, failure_reason, result FROM expressions WHERE status = 'processing'"#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| CalcError::from(anyhow!(e)))?;

        Ok(rows
            .into_iter()
            .map(|(id, owner, source, status, failure_reason, result)| {
                Self::row_to_expression(id, owner, source, status, failure_reason, result)
            })
            .collect())
    }
}

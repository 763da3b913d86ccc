//! Recovery (C8): at orchestrator startup, enumerate persisted Expressions
//! left `processing` from a prior run and mark them `failed:server
//! restart`. Strategy (b) of §4.8 / §9 — re-dispatch is not implemented,
//! mirroring the original Go `database.Init()`, which marks every
//! `processing` row it finds at boot rather than re-parsing it.

use std::sync::Arc;

use crate::ports::ExpressionStore;
use crate::types::ExpressionStatus;

pub async fn recover(store: &dyn ExpressionStore) -> crate::error::Result<usize> {
    let stranded = store.list_processing().await?;
    let count = stranded.len();
    for expr in stranded {
        tracing::warn!(expression_id = %expr.id, "marking stranded expression as failed after restart");
        store
            .set_status(
                &expr.id,
                &ExpressionStatus::Failed("server restart".to_string()),
            )
            .await?;
    }
    Ok(count)
}

/// Convenience wrapper taking the shared `Arc<dyn ExpressionStore>` the
/// orchestrator holds.
pub async fn recover_arc(store: Arc<dyn ExpressionStore>) -> crate::error::Result<usize> {
    recover(store.as_ref()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Expression;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FakeStore {
        expressions: Mutex<Vec<Expression>>,
    }

    #[async_trait]
    impl ExpressionStore for FakeStore {
        async fn create(&self, _id: &str, _owner: i64, _source: &str) -> crate::error::Result<Expression> {
            unimplemented!()
        }

        async fn set_status(&self, id: &str, status: &ExpressionStatus) -> crate::error::Result<()> {
            let mut exprs = self.expressions.lock().unwrap();
            if let Some(e) = exprs.iter_mut().find(|e| e.id == id) {
                e.status = status.clone();
            }
            Ok(())
        }

        async fn set_completed(&self, _id: &str, _result: f64) -> crate::error::Result<()> {
            unimplemented!()
        }

        async fn get(&self, id: &str) -> crate::error::Result<Option<Expression>> {
            Ok(self.expressions.lock().unwrap().iter().find(|e| e.id == id).cloned())
        }

        async fn list_for_owner(&self, _owner: i64) -> crate::error::Result<Vec<Expression>> {
            unimplemented!()
        }

        async fn list_processing(&self) -> crate::error::Result<Vec<Expression>> {
            Ok(self
                .expressions
                .lock()
                .unwrap()
                .iter()
                .filter(|e| e.status == ExpressionStatus::Processing)
                .cloned()
                .collect())
        }
    }

    #[tokio::test]
    async fn marks_stranded_expressions_failed() {
        let store = FakeStore {
            expressions: Mutex::new(vec![Expression {
                id: "e1".into(),
                owner: 1,
                source: "2+2".into(),
                status: ExpressionStatus::Processing,
                result: None,
            }]),
        };

        let n = recover(&store).await.unwrap();
        assert_eq!(n, 1);

        let e = store.get("e1").await.unwrap().unwrap();
        assert_eq!(e.status, ExpressionStatus::Failed("server restart".into()));
    }

    #[tokio::test]
    async fn terminal_expressions_are_left_untouched() {
        let store = FakeStore {
            expressions: Mutex::new(vec![Expression {
                id: "e1".into(),
                owner: 1,
                source: "2+2".into(),
                status: ExpressionStatus::Completed,
                result: Some(4.0),
            }]),
        };

        let n = recover(&store).await.unwrap();
        assert_eq!(n, 0);
        let e = store.get("e1").await.unwrap().unwrap();
        assert_eq!(e.status, ExpressionStatus::Completed);
    }
}

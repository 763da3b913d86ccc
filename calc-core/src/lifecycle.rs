//! Expression Lifecycle (C7): the per-expression cooperative unit that
//! drives parsing, graph construction, and terminal-state persistence.
//! Every error in the pipeline funnels through here and terminates in a
//! persisted `failed:<reason>` state — no control-flow side channels.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::delay::DelayConfig;
use crate::error::CalcError;
use crate::graph;
use crate::lexer::tokenize;
use crate::parser::to_rpn;
use crate::ports::ExpressionStore;
use crate::registry::TaskRegistry;
use crate::types::ExpressionStatus;

/// Drive one Expression through `pending -> processing -> (completed |
/// failed:<reason>)`. Consumes the expression id and source text; the
/// caller (HTTP handler or Recovery) is responsible for having already
/// persisted the `pending` row.
pub async fn run(
    expression_id: String,
    source: String,
    registry: TaskRegistry,
    store: Arc<dyn ExpressionStore>,
    delay: DelayConfig,
    shutdown: CancellationToken,
) {
    if let Err(e) = store
        .set_status(&expression_id, &ExpressionStatus::Processing)
        .await
    {
        tracing::error!(expression_id, error = %e, "failed to persist processing state");
        return;
    }

    let fail = |reason: String| async {
        if let Err(e) = store
            .set_status(&expression_id, &ExpressionStatus::Failed(reason))
            .await
        {
            tracing::error!(expression_id, error = %e, "failed to persist failure state");
        }
    };

    let tokens = match tokenize(&source) {
        Ok(t) => t,
        Err(e) => {
            fail(e.as_failure_reason()).await;
            return;
        }
    };

    let rpn = match to_rpn(tokens) {
        Ok(r) => r,
        Err(e) => {
            fail(e.as_failure_reason()).await;
            return;
        }
    };

    let built = graph::build(rpn, registry, delay);
    let graph = match built {
        Ok(g) => g,
        Err(e) => {
            fail(e.as_failure_reason()).await;
            return;
        }
    };

    // The root cell's `get()` is the single synchronization point that
    // joins every in-flight operator computation for this expression. It
    // races against an emission-time error (division by zero) and against
    // orchestrator shutdown, so a blocked wait does not survive a
    // graceful stop.
    tokio::select! {
        value = graph.root.get() => {
            if !value.is_finite() {
                fail(CalcError::DivisionByZero.as_failure_reason()).await;
                return;
            }
            if let Err(e) = store.set_completed(&expression_id, value).await {
                tracing::error!(expression_id, error = %e, "failed to persist completed result");
            }
        }
        err = graph.errors.wait() => {
            fail(err.as_failure_reason()).await;
        }
        _ = shutdown.cancelled() => {
            fail("shutdown".to_string()).await;
        }
    }
}

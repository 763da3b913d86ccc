//! Task Registry (C4): the only process-wide mutable state in the hot
//! path. One `RwLock<Inner>` guarding a `ready` map and a `pending` map,
//! the same single-mutex shape as `bpmn-lite-core`'s in-memory store —
//! acceptable given the dispatcher's 100ms idle polling (§5).

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::cell::Cell;
use crate::types::Task;

struct Inner {
    /// Tasks whose operands are known, awaiting an agent.
    ready: HashMap<String, Task>,
    /// The Cell each task id will satisfy once a result posts.
    pending: HashMap<String, Cell>,
}

/// Process-wide map of ready Tasks + map of live Cells keyed by task id.
#[derive(Clone)]
pub struct TaskRegistry {
    inner: Arc<RwLock<Inner>>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                ready: HashMap::new(),
                pending: HashMap::new(),
            })),
        }
    }

    /// Atomically insert a ready Task and its Cell. Idempotent if the same
    /// id is re-offered, which should not happen under the graph builder's
    /// discipline (each task id is minted once).
    pub async fn offer(&self, task: Task, cell: Cell) {
        let mut w = self.inner.write().await;
        w.pending.entry(task.id.clone()).or_insert(cell);
        w.ready.entry(task.id.clone()).or_insert(task);
    }

    /// Remove and return any one ready Task. Selection is unordered;
    /// fairness is not guaranteed, but the underlying `HashMap` does not
    /// starve any particular entry — every entry is eventually visited.
    pub async fn take_one(&self) -> Option<Task> {
        let mut w = self.inner.write().await;
        let id = w.ready.keys().next().cloned()?;
        w.ready.remove(&id)
    }

    /// Re-offer a Task taken by `take_one` but never delivered — e.g. the
    /// stream it was about to go out on broke between poll and send (§4.5).
    /// The task's pending Cell is untouched, so it simply becomes visible
    /// to `take_one` again; either a send succeeds and the task is gone,
    /// or it remains (or returns) to the ready set for a later attempt.
    pub async fn put_back(&self, task: Task) {
        let mut w = self.inner.write().await;
        w.ready.entry(task.id.clone()).or_insert(task);
    }

    /// Resolve a pending Cell with an agent's result. Discards silently if
    /// the task id is unknown — a late arrival after cleanup, or a result
    /// for a task this process never offered (§4.4, §4.5).
    pub async fn resolve(&self, task_id: &str, value: f64) {
        let cell = {
            let mut w = self.inner.write().await;
            w.pending.remove(task_id)
        };
        match cell {
            Some(cell) => cell.put(value),
            None => tracing::debug!(task_id, "resolve() for unknown or already-resolved task"),
        }
    }

    #[cfg(test)]
    pub async fn ready_len(&self) -> usize {
        self.inner.read().await.ready.len()
    }
}

impl Default for TaskRegistry {
    fn default() -> Self {
        Self::new()
    }
}

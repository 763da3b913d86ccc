//! Result Cell (C2): the only inter-task synchronization primitive in the
//! core. `put` assigns a real exactly once and wakes every blocked reader;
//! `get` blocks until `put` has occurred, then returns immediately for all
//! later callers. A second `put` is a protocol violation and is dropped.

use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

struct Inner {
    value: std::sync::Mutex<Option<f64>>,
    notify: Notify,
}

/// A single-assignment slot for one `f64`, keyed externally by a task id.
#[derive(Clone)]
pub struct Cell {
    inner: std::sync::Arc<Inner>,
}

impl std::fmt::Debug for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = *self.inner.value.lock().unwrap();
        f.debug_struct("Cell").field("value", &value).finish()
    }
}

/// Distinguishes a cancelled wait from a resolved one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aborted;

impl Cell {
    pub fn new() -> Self {
        Self {
            inner: std::sync::Arc::new(Inner {
                value: std::sync::Mutex::new(None),
                notify: Notify::new(),
            }),
        }
    }

    /// A cell pre-filled with a value — used for `Number` tokens, which are
    /// trivially-satisfied from the start.
    pub fn filled(value: f64) -> Self {
        let cell = Self::new();
        cell.put(value);
        cell
    }

    /// Assign the value and wake every blocked reader. Idempotent only in
    /// the sense that a second call is dropped, not panicked on — the
    /// registry's discipline is what actually prevents double-writes.
    pub fn put(&self, value: f64) {
        let mut guard = self.inner.value.lock().unwrap();
        if guard.is_some() {
            tracing::warn!("cell put() called twice; second write dropped");
            return;
        }
        *guard = Some(value);
        drop(guard);
        self.inner.notify.notify_waiters();
    }

    /// Block until `put` has occurred, then return the value. May be
    /// called concurrently from many readers.
    pub async fn get(&self) -> f64 {
        loop {
            if let Some(v) = *self.inner.value.lock().unwrap() {
                return v;
            }
            let notified = self.inner.notify.notified();
            // Re-check after subscribing, to avoid missing a `put` that
            // happened between the first check and `notified()`.
            if let Some(v) = *self.inner.value.lock().unwrap() {
                return v;
            }
            notified.await;
        }
    }

    /// `get`, but races against a cancellation signal and returns `Err`
    /// with a distinct "aborted" signal if the token fires first. The
    /// cell itself is left untouched — cancelling a reader does not
    /// invalidate it for other readers.
    pub async fn get_or_cancelled(&self, token: &CancellationToken) -> Result<f64, Aborted> {
        tokio::select! {
            v = self.get() => Ok(v),
            _ = token.cancelled() => Err(Aborted),
        }
    }

    pub fn try_get(&self) -> Option<f64> {
        *self.inner.value.lock().unwrap()
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn filled_cell_resolves_immediately() {
        let cell = Cell::filled(42.0);
        assert_eq!(cell.get().await, 42.0);
    }

    #[tokio::test]
    async fn get_blocks_until_put() {
        let cell = Cell::new();
        let reader = cell.clone();
        let handle = tokio::spawn(async move { reader.get().await });
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        cell.put(7.0);
        assert_eq!(handle.await.unwrap(), 7.0);
    }

    #[tokio::test]
    async fn many_readers_all_observe_the_write() {
        let cell = Cell::new();
        let mut handles = Vec::new();
        for _ in 0..8 {
            let reader = cell.clone();
            handles.push(tokio::spawn(async move { reader.get().await }));
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        cell.put(3.0);
        for h in handles {
            assert_eq!(h.await.unwrap(), 3.0);
        }
    }

    #[tokio::test]
    async fn second_put_is_dropped_not_applied() {
        let cell = Cell::new();
        cell.put(1.0);
        cell.put(2.0);
        assert_eq!(cell.get().await, 1.0);
    }

    #[tokio::test]
    async fn cancellation_releases_reader_without_invalidating_cell() {
        let cell = Cell::new();
        let token = CancellationToken::new();
        token.cancel();
        assert_eq!(cell.get_or_cancelled(&token).await, Err(Aborted));
        cell.put(9.0);
        assert_eq!(cell.get().await, 9.0);
    }
}

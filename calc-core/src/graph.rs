//! Graph Builder (C3): walks an RPN stream with an operand stack of Cells
//! (never raw numbers), spawning one deferred unit of work per operator
//! that awaits both argument cells and then offers a Task into the
//! Registry. Task emission is lazy — this is what gives a single
//! expression internal parallelism between independent subexpressions.

use std::sync::{Arc, Mutex};

use tokio::sync::Notify;
use uuid::Uuid;

use crate::cell::Cell;
use crate::delay::DelayConfig;
use crate::error::{CalcError, Result};
use crate::registry::TaskRegistry;
use crate::types::{Operator, Task, Token};

/// A single-assignment slot for the first emission-time error observed
/// anywhere in the graph (division by zero today; non-finite results also
/// fold into this class per §7). First writer wins, same discipline as
/// `Cell`, but for errors instead of values.
#[derive(Clone)]
pub struct ErrorSignal {
    inner: Arc<(Mutex<Option<CalcError>>, Notify)>,
}

impl std::fmt::Debug for ErrorSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let guard = self.inner.0.lock().unwrap();
        f.debug_struct("ErrorSignal").field("error", &*guard).finish()
    }
}

impl ErrorSignal {
    pub fn new() -> Self {
        Self {
            inner: Arc::new((Mutex::new(None), Notify::new())),
        }
    }

    pub fn set(&self, err: CalcError) {
        let mut guard = self.inner.0.lock().unwrap();
        if guard.is_none() {
            *guard = Some(err);
            drop(guard);
            self.inner.1.notify_waiters();
        }
    }

    /// Resolves once an error has been set; never resolves otherwise.
    pub async fn wait(&self) -> CalcError {
        loop {
            if let Some(e) = self.inner.0.lock().unwrap().clone() {
                return e;
            }
            let notified = self.inner.1.notified();
            if let Some(e) = self.inner.0.lock().unwrap().clone() {
                return e;
            }
            notified.await;
        }
    }
}

impl Default for ErrorSignal {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct Graph {
    pub root: Cell,
    pub errors: ErrorSignal,
    /// Number of operator Tasks the graph will emit — equals the RPN's
    /// operator count (§8 "Graph join" invariant).
    pub task_count: usize,
}

/// Build the DAG for one RPN stream, spawning a `tokio::task` per operator.
/// Does not block: returns as soon as the shape of the graph is known.
pub fn build(rpn: Vec<Token>, registry: TaskRegistry, delay: DelayConfig) -> Result<Graph> {
    let mut stack: Vec<Cell> = Vec::new();
    let errors = ErrorSignal::new();
    let mut task_count = 0;

    for token in rpn {
        match token {
            Token::Number(n) => stack.push(Cell::filled(n)),
            Token::Operator(op) => {
                let b = stack.pop().ok_or(CalcError::InvalidExpression)?;
                let a = stack.pop().ok_or(CalcError::InvalidExpression)?;
                let result = Cell::new();
                stack.push(result.clone());
                task_count += 1;

                let task_id = Uuid::now_v7().to_string();
                let registry = registry.clone();
                let errors = errors.clone();
                let delay_ms = delay.get(op);

                tokio::spawn(async move {
                    let arg1 = a.get().await;
                    let arg2 = b.get().await;

                    if matches!(op, Operator::Div) && arg2 == 0.0 {
                        errors.set(CalcError::DivisionByZero);
                        return;
                    }

                    let task = Task {
                        id: task_id,
                        arg1,
                        arg2,
                        operator: op,
                        delay_ms,
                    };
                    registry.offer(task, result).await;
                });
            }
            Token::LParen | Token::RParen => {
                // The parser never emits these into RPN; treat as a
                // structural error if it somehow does.
                return Err(CalcError::InvalidExpression);
            }
        }
    }

    if stack.len() != 1 {
        return Err(CalcError::InvalidExpression);
    }

    Ok(Graph {
        root: stack.pop().unwrap(),
        errors,
        task_count,
    })
}

// src/batch/race.rs

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::exec::{ExecutionResult, Task};

/// Deliver N in-flight executions to `on_result` exactly once each, in the
/// order they actually settle rather than the order they were submitted.
///
/// Every execution forwards `(index, result)` into a completion channel
/// exactly once when it finishes; a single reader loop receives N times.
/// This gives "first settled of many" without polling, and the remaining
/// executions keep running while the callback processes each delivery.
///
/// If the async machinery around an execution fails (the spawned task
/// panics or is aborted, rather than the child merely exiting nonzero), a
/// synthetic failing [`ExecutionResult`] is substituted so the aggregate
/// failure count is never undercounted and the batch of still-pending
/// siblings is never aborted.
///
/// N = 0 completes immediately with no invocations.
pub async fn race_in_order<F>(executions: Vec<(Task, JoinHandle<ExecutionResult>)>, mut on_result: F)
where
    F: FnMut(Task, ExecutionResult),
{
    let total = executions.len();
    if total == 0 {
        return;
    }

    let (tx, mut rx) = mpsc::channel::<(usize, ExecutionResult)>(total);

    let mut tasks: Vec<Option<Task>> = Vec::with_capacity(total);
    for (index, (task, handle)) in executions.into_iter().enumerate() {
        tasks.push(Some(task));
        let tx = tx.clone();
        tokio::spawn(async move {
            let result = match handle.await {
                Ok(result) => result,
                Err(err) => ExecutionResult::execution_failure(
                    format!("execution task failed: {err}"),
                    Duration::ZERO,
                ),
            };
            let _ = tx.send((index, result)).await;
        });
    }
    drop(tx);

    let mut delivered = 0;
    while delivered < total {
        let Some((index, result)) = rx.recv().await else {
            // All senders send exactly once before dropping, so the channel
            // closing early means a forwarder died without delivering.
            warn!(delivered, total, "completion channel closed early");
            break;
        };

        // Taking the slot guarantees at most one delivery per task even if
        // an index were ever duplicated.
        if let Some(task) = tasks.get_mut(index).and_then(Option::take) {
            delivered += 1;
            debug!(task = %task.name, delivered, total, "batch result settled");
            on_result(task, result);
        }
    }
}

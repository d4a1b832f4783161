//! Async dispatch: a bounded worker pool with a task-id-based retrieval
//! contract.
//!
//! Submitted units of work run as blocking tasks on a tokio runtime whose
//! blocking pool is capped at the configured worker count. Submission
//! returns a UUID immediately; the result is exchanged later via
//! [`AsyncDispatcher::wait`]. Queuing beyond the worker count is unbounded,
//! an accepted limitation. No ordering is guaranteed between tasks.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use tokio::runtime::{Builder, Runtime};
use tokio::task::JoinHandle;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::element::ControlHandle;
use crate::errors::AutomationError;

/// Result of a completed asynchronous keyword.
#[derive(Debug, Clone)]
pub enum TaskOutcome {
    /// A human-readable completion message (click, type-into).
    Message(String),
    /// Resolved control handles (find-all).
    Controls(Vec<ControlHandle>),
}

type TaskResult = Result<TaskOutcome, AutomationError>;

pub struct AsyncDispatcher {
    worker_count: usize,
    runtime: Mutex<Runtime>,
    tasks: Mutex<HashMap<Uuid, JoinHandle<TaskResult>>>,
}

impl AsyncDispatcher {
    pub fn new(worker_count: usize) -> Result<Self, AutomationError> {
        Ok(Self {
            worker_count,
            runtime: Mutex::new(build_runtime(worker_count)?),
            tasks: Mutex::new(HashMap::new()),
        })
    }

    /// Queue a unit of blocking work and hand back its task id immediately.
    /// Never blocks on pool saturation; work queues behind the pool's
    /// capacity instead.
    pub fn submit<F>(&self, work: F) -> Result<Uuid, AutomationError>
    where
        F: FnOnce() -> TaskResult + Send + 'static,
    {
        let task_id = Uuid::new_v4();
        let handle = self.runtime()?.spawn_blocking(work);
        self.tasks()?.insert(task_id, handle);
        debug!(%task_id, "async task submitted");
        Ok(task_id)
    }

    /// Block until the task completes or `timeout` elapses. A timed-out task
    /// stays registered so its result remains retrievable; a task error is
    /// re-raised to the waiter with the original message preserved.
    #[instrument(skip(self))]
    pub fn wait(&self, task_id: Uuid, timeout: Duration) -> Result<TaskOutcome, AutomationError> {
        let mut handle = self.tasks()?.remove(&task_id).ok_or_else(|| {
            AutomationError::InvalidArgument(format!("unknown async task id: {task_id}"))
        })?;

        let runtime_handle = self.runtime()?.handle().clone();
        let joined =
            runtime_handle.block_on(async { tokio::time::timeout(timeout, &mut handle).await });
        match joined {
            Ok(Ok(Ok(outcome))) => Ok(outcome),
            Ok(Ok(Err(e))) => Err(AutomationError::AsyncOperation(format!(
                "async task {task_id} failed: {e}"
            ))),
            Ok(Err(join_error)) => Err(AutomationError::AsyncOperation(format!(
                "async task {task_id} aborted: {join_error}"
            ))),
            Err(_elapsed) => {
                self.tasks()?.insert(task_id, handle);
                Err(AutomationError::Timeout(format!(
                    "async task {task_id} did not complete within {timeout:?}"
                )))
            }
        }
    }

    /// Number of submitted tasks whose results are still unretrieved.
    pub fn pending(&self) -> Result<usize, AutomationError> {
        Ok(self.tasks()?.len())
    }

    /// Drain (`wait = true`) or abandon outstanding work, then swap in a
    /// fresh pool so the dispatcher stays usable. Unretrieved task ids
    /// become unknown.
    #[instrument(skip(self))]
    pub fn shutdown(&self, wait: bool) -> Result<(), AutomationError> {
        let fresh = build_runtime(self.worker_count)?;
        let old = {
            let mut runtime = self.runtime()?;
            std::mem::replace(&mut *runtime, fresh)
        };
        self.tasks()?.clear();
        if wait {
            // Dropping the runtime waits for in-flight blocking tasks.
            drop(old);
        } else {
            old.shutdown_background();
        }
        debug!(wait, "async executor replaced");
        Ok(())
    }

    fn runtime(&self) -> Result<MutexGuard<'_, Runtime>, AutomationError> {
        self.runtime
            .lock()
            .map_err(|_| AutomationError::AsyncOperation("worker pool state poisoned".to_string()))
    }

    fn tasks(&self) -> Result<MutexGuard<'_, HashMap<Uuid, JoinHandle<TaskResult>>>, AutomationError>
    {
        self.tasks
            .lock()
            .map_err(|_| AutomationError::AsyncOperation("task registry poisoned".to_string()))
    }
}

fn build_runtime(worker_count: usize) -> Result<Runtime, AutomationError> {
    Builder::new_multi_thread()
        .worker_threads(1)
        .max_blocking_threads(worker_count.max(1))
        .thread_name("winkeys-async")
        .enable_time()
        .build()
        .map_err(|e| {
            AutomationError::AsyncOperation(format!("failed to start worker pool: {e}"))
        })
}

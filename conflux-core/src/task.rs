// Copyright 2025 The Conflux Authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Cancellable background work.
//!
//! [`TaskHandle`] spawns a task that receives a [`CancellationToken`] and is
//! expected to stop at its next checkpoint once the token fires. [`TaskSet`]
//! keeps a collection of handles alive and tears all of them down at once.
//!
//! Dropping a `TaskHandle` detaches the task rather than cancelling it:
//! forgetting a handle must not stop the work it tracks. Only an explicit
//! [`cancel`](TaskHandle::cancel) (or [`TaskSet::cancel_all`]) does.

use std::collections::HashMap;
use std::future::Future;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Handle to a spawned background task with cooperative cancellation.
///
/// # Example
///
/// ```
/// use conflux_core::TaskHandle;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let task = TaskHandle::spawn(|cancel| async move {
///     cancel.cancelled().await;
///     // Clean up and exit.
/// });
///
/// task.cancel();
/// task.join().await;
/// # }
/// ```
#[derive(Debug)]
pub struct TaskHandle {
    cancel: CancellationToken,
    join: JoinHandle<()>,
}

impl TaskHandle {
    /// Spawn a background task with cancellation support.
    ///
    /// The closure receives a [`CancellationToken`] that fires when
    /// [`cancel`](Self::cancel) is called. The spawned future should monitor
    /// the token and exit promptly once it fires.
    pub fn spawn<F, Fut>(f: F) -> Self
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let join = tokio::spawn(f(cancel.clone()));
        Self { cancel, join }
    }

    /// Signal the task to stop.
    ///
    /// Idempotent; does not wait for the task to finish. The task stops at
    /// its next cancellation checkpoint.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Returns `true` if cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Returns `true` if the task has run to completion.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Wait for the task to complete.
    ///
    /// A panic inside the task is swallowed here; joining is about lifetime,
    /// not about surfacing results.
    pub async fn join(self) {
        let _ = self.join.await;
    }
}

/// Identifier of a task inside a [`TaskSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

/// A collection of [`TaskHandle`]s with bulk teardown.
///
/// Removing a handle from the set forgets it without cancelling: the task
/// keeps running for as long as something else keeps it alive (and spawned
/// tasks run detached regardless). [`cancel_all`](Self::cancel_all) is the
/// destructive operation: it cancels every member and empties the set, and is
/// a no-op on an empty set.
#[derive(Debug, Default)]
pub struct TaskSet {
    next_id: u64,
    tasks: HashMap<u64, TaskHandle>,
}

impl TaskSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a handle, returning its id within this set.
    pub fn insert(&mut self, task: TaskHandle) -> TaskId {
        let id = self.next_id;
        self.next_id += 1;
        self.tasks.insert(id, task);
        TaskId(id)
    }

    /// Take a handle back out of the set without cancelling it.
    ///
    /// Returns `None` if the id is not (or no longer) present.
    pub fn remove(&mut self, id: TaskId) -> Option<TaskHandle> {
        self.tasks.remove(&id.0)
    }

    /// Cancel every member and empty the set.
    ///
    /// Idempotent: calling it again, or on an empty set, does nothing.
    pub fn cancel_all(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.cancel();
        }
    }

    /// Number of handles currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns `true` if the set holds no handles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

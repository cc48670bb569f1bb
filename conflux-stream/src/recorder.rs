// Copyright 2025 The Conflux Authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Recording adapter: push-style delivery to poll-style consumption.
//!
//! A [`Recorder`] wraps a source sequence, continuously drains it into an
//! internal FIFO on a background pump, and hands values out through
//! [`next`](Recorder::next), a pull with a bounded wait. Useful wherever a
//! consumer wants to poll at its own pace: step-wise tests, request handlers
//! sampling a feed, bridging into synchronous code.
//!
//! Buffering is governed by a [`BufferPolicy`]; source completion, source
//! error and [`cancel`](Recorder::cancel) all surface to pullers as
//! [`RecvError::SourceEnded`] rather than blocking forever.

use crate::logging::warn;
use conflux_core::{StreamItem, TaskHandle};
use futures::{Stream, StreamExt};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::Instant;

/// What to do with new values once the buffer holds `capacity` undelivered
/// ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferPolicy {
    /// Keep everything; the buffer grows without bound.
    Unbounded,
    /// Discard the oldest undelivered value to make room for the new one.
    DropOldest(usize),
    /// Discard the incoming value; the buffered ones keep their place.
    DropNewest(usize),
}

/// Failure modes of [`Recorder::next`]. Both are recoverable conditions, not
/// crashes: `Timeout` callers may retry, `SourceEnded` callers are done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RecvError {
    /// The bounded wait elapsed before a value arrived.
    #[error("no value arrived within {elapsed:?}")]
    Timeout {
        /// The wait that was exceeded.
        elapsed: Duration,
    },

    /// The source has finished (normally, by error, or by cancellation) and
    /// no further values will ever arrive.
    #[error("source ended, no further values will arrive")]
    SourceEnded,
}

/// A recording/polling adapter over a source sequence.
///
/// # Example
///
/// ```
/// use conflux_core::StreamItem;
/// use conflux_stream::{RecordExt, RecvError};
/// use futures::stream;
/// use std::time::Duration;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let recorder = stream::iter([StreamItem::Value(1), StreamItem::Value(2)]).record();
///
/// assert_eq!(recorder.next(Duration::from_millis(100)).await, Ok(1));
/// assert_eq!(recorder.next(Duration::from_millis(100)).await, Ok(2));
/// assert_eq!(
///     recorder.next(Duration::from_millis(100)).await,
///     Err(RecvError::SourceEnded)
/// );
/// # }
/// ```
pub struct Recorder<T> {
    shared: Arc<Shared<T>>,
    pump: TaskHandle,
}

struct Shared<T> {
    state: Mutex<RecorderState<T>>,
    wakeup: Notify,
}

struct RecorderState<T> {
    buffer: VecDeque<T>,
    policy: BufferPolicy,
    finished: bool,
}

impl<T> RecorderState<T> {
    fn push(&mut self, value: T) {
        // A pump racing against cancel() must not resurrect the buffer.
        if self.finished {
            return;
        }
        match self.policy {
            BufferPolicy::Unbounded => self.buffer.push_back(value),
            BufferPolicy::DropOldest(capacity) => {
                if capacity == 0 {
                    return;
                }
                if self.buffer.len() == capacity {
                    self.buffer.pop_front();
                }
                self.buffer.push_back(value);
            }
            BufferPolicy::DropNewest(capacity) => {
                if self.buffer.len() < capacity {
                    self.buffer.push_back(value);
                }
            }
        }
    }
}

impl<T: Send + 'static> Recorder<T> {
    /// Record `source` with an unbounded buffer.
    pub fn record<S>(source: S) -> Self
    where
        S: Stream<Item = StreamItem<T>> + Send + Unpin + 'static,
    {
        Self::record_with_policy(source, BufferPolicy::Unbounded)
    }

    /// Record `source`, buffering undelivered values per `policy`.
    ///
    /// The pump runs until the source finishes or errors (both mark the
    /// buffer finished; errors are additionally logged) or the recorder is
    /// cancelled or dropped.
    pub fn record_with_policy<S>(mut source: S, policy: BufferPolicy) -> Self
    where
        S: Stream<Item = StreamItem<T>> + Send + Unpin + 'static,
    {
        let shared = Arc::new(Shared {
            state: Mutex::new(RecorderState {
                buffer: VecDeque::new(),
                policy,
                finished: false,
            }),
            wakeup: Notify::new(),
        });

        let pump = TaskHandle::spawn({
            let shared = Arc::clone(&shared);
            move |cancel| async move {
                loop {
                    tokio::select! {
                        () = cancel.cancelled() => return,
                        item = source.next() => match item {
                            Some(StreamItem::Value(value)) => {
                                shared.state.lock().push(value);
                                shared.wakeup.notify_waiters();
                            }
                            Some(StreamItem::Error(e)) => {
                                warn!("recorder: source failed, treating as completed: {}", e);
                                break;
                            }
                            None => break,
                        },
                    }
                }
                shared.state.lock().finished = true;
                shared.wakeup.notify_waiters();
            }
        });

        Self { shared, pump }
    }

    /// Pull the next buffered value, waiting at most `timeout` for one to
    /// arrive.
    ///
    /// Returns the oldest undelivered value if available. Otherwise waits,
    /// racing buffer arrival against the deadline; the losing wait is dropped
    /// with this call, nothing leaks.
    ///
    /// # Errors
    ///
    /// - [`RecvError::Timeout`]: the deadline elapsed first.
    /// - [`RecvError::SourceEnded`]: the source finished and the buffer is
    ///   drained; no value will ever arrive.
    pub async fn next(&self, timeout: Duration) -> Result<T, RecvError> {
        let deadline = Instant::now() + timeout;
        loop {
            // Register interest before inspecting state; a value pushed
            // between the check and the await would otherwise be missed.
            let notified = self.shared.wakeup.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let mut state = self.shared.state.lock();
                if let Some(value) = state.buffer.pop_front() {
                    return Ok(value);
                }
                if state.finished {
                    return Err(RecvError::SourceEnded);
                }
            }

            // The lock is released before suspending; concurrent callers each
            // keep their own deadline.
            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                return Err(RecvError::Timeout { elapsed: timeout });
            }
        }
    }

    /// Stop the pump, release buffered values and mark the source ended.
    ///
    /// Subsequent and in-flight [`next`](Self::next) calls fail with
    /// [`RecvError::SourceEnded`]. Idempotent; dropping the recorder performs
    /// the same teardown.
    pub fn cancel(&self) {
        self.pump.cancel();
        {
            let mut state = self.shared.state.lock();
            state.finished = true;
            state.buffer.clear();
        }
        self.shared.wakeup.notify_waiters();
    }
}

impl<T> Drop for Recorder<T> {
    fn drop(&mut self) {
        self.pump.cancel();
        let mut state = self.shared.state.lock();
        state.finished = true;
        state.buffer.clear();
    }
}

/// Extension trait providing [`Recorder`] construction in method position.
pub trait RecordExt<T>: Stream<Item = StreamItem<T>> + Sized {
    /// Record this source with an unbounded buffer.
    fn record(self) -> Recorder<T>
    where
        Self: Send + Unpin + 'static,
        T: Send + 'static,
    {
        Recorder::record(self)
    }

    /// Record this source with the given buffering policy.
    fn record_with_policy(self, policy: BufferPolicy) -> Recorder<T>
    where
        Self: Send + Unpin + 'static,
        T: Send + 'static,
    {
        Recorder::record_with_policy(self, policy)
    }
}

impl<S, T> RecordExt<T> for S where S: Stream<Item = StreamItem<T>> + Sized {}

// Copyright 2025 The Conflux Authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Latest-pair combination of two sources.
//!
//! [`combine_latest`] consumes two independently-progressing sources
//! concurrently and produces one merged sequence of `(A, B)` pairs.
//!
//! ## Semantics
//!
//! - **Priming**: nothing is emitted until both sides have produced at least
//!   one value; the first pair carries each side's first value.
//! - **Update propagation**: from then on, every value from either side
//!   re-emits a pair using the other side's most recent value. Pair order
//!   equals the interleaved order of updates.
//! - **Termination**: the merged sequence ends exactly when *both* sources
//!   have finished. One side finishing early keeps the merge alive; the
//!   remaining side keeps pairing with the finished side's last value.
//! - **Errors**: a source error is treated as that source finishing. The
//!   merge itself never fails.
//! - **Cancellation**: dropping the merged stream cancels both upstream
//!   pumps; no pair is emitted afterwards.
//!
//! ## Example
//!
//! ```
//! use conflux_core::StreamItem;
//! use conflux_stream::CombineLatestExt;
//! use futures::{stream, StreamExt};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let numbers = stream::iter([StreamItem::Value(1)]);
//! let letters = stream::iter([StreamItem::Value("a")]);
//!
//! let mut pairs = numbers.combine_latest(letters);
//! assert_eq!(pairs.next().await, Some((1, "a")));
//! assert_eq!(pairs.next().await, None);
//! # }
//! ```

use crate::logging::warn;
use conflux_core::{StreamItem, TaskHandle};
use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::{Stream, StreamExt};
use parking_lot::Mutex;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

/// Merge two sources into a sequence of latest-value pairs.
///
/// Spawns one pump task per source; both feed a shared state machine whose
/// single lock serializes updates, finishes and emissions. See the
/// [module documentation](self) for the exact semantics.
pub fn combine_latest<SA, SB, A, B>(source_a: SA, source_b: SB) -> CombineLatest<A, B>
where
    SA: Stream<Item = StreamItem<A>> + Send + Unpin + 'static,
    SB: Stream<Item = StreamItem<B>> + Send + Unpin + 'static,
    A: Clone + Send + 'static,
    B: Clone + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded();
    let state = Arc::new(Mutex::new(PairState {
        latest_a: None,
        latest_b: None,
        finished_a: false,
        finished_b: false,
        cancelled: false,
        out: tx,
    }));

    let pump_a = spawn_pump(
        source_a,
        {
            let state = Arc::clone(&state);
            move |value| state.lock().update_a(value)
        },
        {
            let state = Arc::clone(&state);
            move || state.lock().finish_a()
        },
    );
    let pump_b = spawn_pump(
        source_b,
        {
            let state = Arc::clone(&state);
            move |value| state.lock().update_b(value)
        },
        {
            let state = Arc::clone(&state);
            move || state.lock().finish_b()
        },
    );

    CombineLatest {
        receiver: rx,
        state,
        pump_a,
        pump_b,
    }
}

/// Extension trait providing [`combine_latest`] in method position.
pub trait CombineLatestExt<A>: Stream<Item = StreamItem<A>> + Sized {
    /// Combine this source with `other`, pairing each update with the other
    /// side's latest value.
    fn combine_latest<SB, B>(self, other: SB) -> CombineLatest<A, B>
    where
        Self: Send + Unpin + 'static,
        SB: Stream<Item = StreamItem<B>> + Send + Unpin + 'static,
        A: Clone + Send + 'static,
        B: Clone + Send + 'static,
    {
        combine_latest(self, other)
    }
}

impl<S, A> CombineLatestExt<A> for S where S: Stream<Item = StreamItem<A>> + Sized {}

/// The merged sequence produced by [`combine_latest`].
///
/// Dropping it cancels both upstream pumps and suppresses any in-flight
/// emission.
pub struct CombineLatest<A, B> {
    receiver: UnboundedReceiver<(A, B)>,
    state: Arc<Mutex<PairState<A, B>>>,
    pump_a: TaskHandle,
    pump_b: TaskHandle,
}

impl<A, B> Stream for CombineLatest<A, B> {
    type Item = (A, B);

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.get_mut().receiver).poll_next(cx)
    }
}

impl<A, B> Drop for CombineLatest<A, B> {
    fn drop(&mut self) {
        // Mark the state first so a pump that already owns an item cannot
        // emit between our cancel signal and its next checkpoint.
        self.state.lock().cancel();
        self.pump_a.cancel();
        self.pump_b.cancel();
    }
}

struct PairState<A, B> {
    latest_a: Option<A>,
    latest_b: Option<B>,
    finished_a: bool,
    finished_b: bool,
    cancelled: bool,
    out: UnboundedSender<(A, B)>,
}

impl<A: Clone, B: Clone> PairState<A, B> {
    fn update_a(&mut self, value: A) {
        if self.cancelled {
            return;
        }
        self.latest_a = Some(value);
        self.emit_if_primed();
    }

    fn update_b(&mut self, value: B) {
        if self.cancelled {
            return;
        }
        self.latest_b = Some(value);
        self.emit_if_primed();
    }

    fn emit_if_primed(&self) {
        if let (Some(a), Some(b)) = (&self.latest_a, &self.latest_b) {
            // Send failure means the consumer is gone; nothing to do, the
            // pumps are being cancelled by the stream's Drop.
            let _ = self.out.unbounded_send((a.clone(), b.clone()));
        }
    }
}

impl<A, B> PairState<A, B> {
    fn finish_a(&mut self) {
        self.finished_a = true;
        self.close_if_done();
    }

    fn finish_b(&mut self) {
        self.finished_b = true;
        self.close_if_done();
    }

    // The output ends iff both sides have finished.
    fn close_if_done(&self) {
        if self.finished_a && self.finished_b {
            self.out.close_channel();
        }
    }

    fn cancel(&mut self) {
        self.cancelled = true;
        self.out.close_channel();
    }
}

/// Drives one source into the shared state.
///
/// `on_finish` runs on natural completion or upstream error, never after
/// cancellation: a cancelled pump stops without touching the state again.
fn spawn_pump<S, T>(
    mut source: S,
    on_value: impl Fn(T) + Send + 'static,
    on_finish: impl FnOnce() + Send + 'static,
) -> TaskHandle
where
    S: Stream<Item = StreamItem<T>> + Send + Unpin + 'static,
    T: Send + 'static,
{
    TaskHandle::spawn(move |cancel| async move {
        loop {
            tokio::select! {
                () = cancel.cancelled() => return,
                item = source.next() => match item {
                    Some(StreamItem::Value(value)) => on_value(value),
                    Some(StreamItem::Error(e)) => {
                        warn!("combine_latest: source failed, treating as completed: {}", e);
                        break;
                    }
                    None => break,
                },
            }
        }
        on_finish();
    })
}

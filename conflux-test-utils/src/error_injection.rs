// Copyright 2025 The Conflux Authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Error injection for streams under test.
//!
//! [`FailAfter`] turns a plain value stream into a `StreamItem` source that
//! fails after a given number of items, for exercising the swallow-on-error
//! boundaries of the combinators.

use conflux_core::{StreamError, StreamItem};
use futures::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};

/// A stream wrapper that passes through `fail_after` values, then emits a
/// single injected error and ends.
///
/// A well-behaved source produces its error as the last item, which is what
/// this wrapper reproduces.
pub struct FailAfter<S> {
    inner: S,
    remaining: usize,
    failed: bool,
}

impl<S> FailAfter<S> {
    /// Wrap `inner`, letting `fail_after` items through before the error.
    pub fn new(inner: S, fail_after: usize) -> Self {
        Self {
            inner,
            remaining: fail_after,
            failed: false,
        }
    }
}

impl<S> Stream for FailAfter<S>
where
    S: Stream + Unpin,
{
    type Item = StreamItem<S::Item>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.failed {
            return Poll::Ready(None);
        }

        if self.remaining == 0 {
            self.failed = true;
            return Poll::Ready(Some(StreamItem::Error(StreamError::source_error(
                "injected test failure",
            ))));
        }

        match Pin::new(&mut self.inner).poll_next(cx) {
            Poll::Ready(Some(item)) => {
                self.remaining -= 1;
                Poll::Ready(Some(StreamItem::Value(item)))
            }
            Poll::Ready(None) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        }
    }
}

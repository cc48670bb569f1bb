// Copyright 2025 The Conflux Authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities and fixtures for the conflux workspace.
//!
//! This crate provides push-style test channels, an error-injecting stream
//! wrapper, small data fixtures and timeout-guarded assertion helpers. It is
//! meant for development and testing only, not for production code.
//!
//! # Architecture
//!
//! Production code consumes streams; tests need to *push* into them. The
//! test channels here bridge that gap: an imperative `tokio` sender on one
//! side, a `Stream<Item = StreamItem<T>>` on the other, so a test can drive a
//! combinator step by step and assert between steps.
//!
//! # Module Organization
//!
//! - `helpers` - assertion and timeout utilities
//! - `error_injection` - `FailAfter` stream wrapper
//! - `person`, `animal` - data fixtures

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
pub mod animal;
pub mod error_injection;
pub mod helpers;
pub mod person;

use conflux_core::StreamItem;
use futures::{Stream, StreamExt};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

// Re-export commonly used test utilities
pub use error_injection::FailAfter;
pub use helpers::{assert_no_element_emitted, assert_stream_ended, unwrap_stream};

/// Creates a test channel that automatically wraps values in
/// `StreamItem::Value`.
///
/// Tests send plain values; the stream side receives `StreamItem<T>`, which
/// is what the combinators in this workspace consume.
///
/// # Example
///
/// ```rust
/// use conflux_test_utils::test_channel;
/// use futures::StreamExt;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let (tx, mut stream) = test_channel();
///
/// tx.send(42).unwrap();
///
/// let item = stream.next().await.unwrap();
/// assert_eq!(item.unwrap(), 42);
/// # }
/// ```
pub fn test_channel<T: Send + 'static>() -> (
    mpsc::UnboundedSender<T>,
    impl Stream<Item = StreamItem<T>> + Send + Unpin,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let stream = UnboundedReceiverStream::new(rx).map(StreamItem::Value);
    (tx, stream)
}

/// Creates a test channel that accepts raw `StreamItem<T>` values.
///
/// Lets a test push both values and errors through a source, for exercising
/// the swallow-on-error behavior of the combinators.
///
/// # Example
///
/// ```rust
/// use conflux_core::{StreamError, StreamItem};
/// use conflux_test_utils::test_channel_with_errors;
/// use futures::StreamExt;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let (tx, mut stream) = test_channel_with_errors();
///
/// tx.send(StreamItem::Value(1)).unwrap();
/// tx.send(StreamItem::Error(StreamError::source_error("boom"))).unwrap();
///
/// assert!(stream.next().await.unwrap().is_value());
/// assert!(stream.next().await.unwrap().is_error());
/// # }
/// ```
pub fn test_channel_with_errors<T: Send + 'static>() -> (
    mpsc::UnboundedSender<StreamItem<T>>,
    impl Stream<Item = StreamItem<T>> + Send + Unpin,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let stream = UnboundedReceiverStream::new(rx);
    (tx, stream)
}

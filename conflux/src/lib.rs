// Copyright 2025 The Conflux Authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! # Conflux
//!
//! Concurrency primitives for fan-out broadcast and multi-source
//! synchronization over asynchronous value sequences.
//!
//! ## Overview
//!
//! Conflux provides three building blocks on top of the Rust async ecosystem
//! (tokio, futures):
//!
//! - [`Relay`]: a replay-1 multicast relay: many consumers join at
//!   different times, each first observes the latest published value and then
//!   a consistent suffix of updates.
//! - [`combine_latest`]: merges two independently-progressing sources into
//!   one synchronized sequence of latest-value pairs.
//! - [`Recorder`]: drains any source on a background pump and exposes a
//!   pull-based "next value or time out" interface.
//!
//! ## Quick Start
//!
//! ```rust
//! use conflux_rx::Relay;
//! use futures::StreamExt;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let relay = Relay::new("idle");
//!     let mut updates = relay.subscribe();
//!
//!     relay.publish("running");
//!
//!     assert_eq!(updates.next().await, Some("idle"));
//!     assert_eq!(updates.next().await, Some("running"));
//! }
//! ```

// Re-export core types
pub use conflux_core::{
    CancellationToken, Relay, Result, Sink, SinkHandle, StreamError, StreamItem, Subscription,
    TaskHandle, TaskId, TaskSet,
};

// Re-export the stream combinators
pub use conflux_stream::{
    combine_latest, BufferPolicy, CombineLatest, CombineLatestExt, RecordExt, Recorder, RecvError,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use conflux_core::{Relay, StreamItem, TaskHandle, TaskSet};
    pub use conflux_stream::{combine_latest, CombineLatestExt, RecordExt, Recorder};
}

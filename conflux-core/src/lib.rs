// Copyright 2025 The Conflux Authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Core primitives for fan-out broadcast and multi-source synchronization.
//!
//! This crate holds the stateful building blocks of the conflux workspace:
//!
//! - [`Relay`]: a replay-1 multicast relay: many independently-paced
//!   subscribers, each of which first observes the latest published value and
//!   then every subsequent publish, in order.
//! - [`StreamItem`] / [`StreamError`]: the in-band item type of a source
//!   sequence, carrying either a value or the terminal failure that ended it.
//! - [`TaskHandle`] / [`TaskSet`]: cancellable background work and bulk
//!   lifetime management for collections of such work.
//!
//! Combinators over these primitives (`combine_latest`, `Recorder`) live in
//! `conflux-stream`.

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
pub mod error;
pub mod relay;
pub mod stream_item;
pub mod task;

pub use self::error::{Result, StreamError};
pub use self::relay::{Relay, Sink, SinkHandle, Subscription};
pub use self::stream_item::StreamItem;
pub use self::task::{TaskHandle, TaskId, TaskSet};

// The cancellation token used throughout the workspace. Re-exported so
// downstream crates spell it the same way everywhere.
pub use tokio_util::sync::CancellationToken;

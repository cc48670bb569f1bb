// Copyright 2025 The Conflux Authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Combinators over asynchronous value sequences.
//!
//! Two adapters built on the `conflux-core` primitives:
//!
//! - [`combine_latest`]: merges two independently-progressing sources into
//!   one sequence of latest-value pairs (CombineLatest semantics).
//! - [`Recorder`]: continuously drains a source into a buffer on a
//!   background task and exposes a pull interface with a bounded wait.
//!
//! Both convert upstream faults into normal completion at their boundary;
//! consumers of the merged or recorded sequence never see a source's error.

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
pub mod combine_latest;
pub mod recorder;

mod logging;

// Re-export commonly used types
pub use combine_latest::{combine_latest, CombineLatest, CombineLatestExt};
pub use recorder::{BufferPolicy, RecordExt, Recorder, RecvError};

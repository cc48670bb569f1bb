// Copyright 2025 The Conflux Authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::time::Duration;

use futures::stream::StreamExt;
use futures::Stream;
use tokio::time::sleep;

/// Pulls the next item from the stream, panicking if nothing arrives within
/// `timeout_ms` or the stream has ended.
pub async fn unwrap_stream<S, T>(stream: &mut S, timeout_ms: u64) -> T
where
    S: Stream<Item = T> + Unpin,
{
    tokio::select! {
        item = stream.next() => item.expect("stream ended, expected an item"),
        () = sleep(Duration::from_millis(timeout_ms)) => {
            panic!("no item emitted within {timeout_ms}ms");
        }
    }
}

/// Asserts the stream ends (yields `None`) within `timeout_ms`.
pub async fn assert_stream_ended<S, T>(stream: &mut S, timeout_ms: u64)
where
    S: Stream<Item = T> + Unpin,
{
    tokio::select! {
        item = stream.next() => {
            assert!(item.is_none(), "expected end of stream, got an item");
        }
        () = sleep(Duration::from_millis(timeout_ms)) => {
            panic!("stream did not end within {timeout_ms}ms");
        }
    }
}

/// Asserts the stream stays silent for `timeout_ms` (neither an item nor an
/// end-of-stream).
pub async fn assert_no_element_emitted<S, T>(stream: &mut S, timeout_ms: u64)
where
    S: Stream<Item = T> + Unpin,
{
    tokio::select! {
        _item = stream.next() => {
            panic!("unexpected emission, expected no output");
        }
        () = sleep(Duration::from_millis(timeout_ms)) => {
        }
    }
}

/// Expect the next pair emitted by a combined stream to match by value.
pub async fn expect_next_pair<S, A, B>(stream: &mut S, expected_left: A, expected_right: B)
where
    S: Stream<Item = (A, B)> + Unpin,
    A: PartialEq + std::fmt::Debug,
    B: PartialEq + std::fmt::Debug,
{
    let (left, right) = unwrap_stream(stream, 500).await;
    assert_eq!((left, right), (expected_left, expected_right));
}

// Copyright 2025 The Conflux Authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! End-to-end pipelines across the whole public surface: relays feeding
//! combine_latest, recorded for step-wise consumption.

use std::time::Duration;

use conflux_rx::prelude::*;
use conflux_rx::RecvError;
use futures::StreamExt;

const WAIT: Duration = Duration::from_millis(500);

#[tokio::test]
async fn test_relay_pair_recorded_end_to_end() {
    // Arrange - two relays bridged into a latest-pair merge, then recorded
    let temperature = Relay::new(21i32);
    let humidity = Relay::new(40i32);

    let pairs = temperature
        .subscribe()
        .map(StreamItem::Value)
        .combine_latest(humidity.subscribe().map(StreamItem::Value));
    let recorder = pairs.map(StreamItem::Value).record();

    // Assert - both replays prime the merge immediately
    assert_eq!(recorder.next(WAIT).await, Ok((21, 40)));

    // Act / Assert - updates from either side keep pairing
    temperature.publish(22);
    assert_eq!(recorder.next(WAIT).await, Ok((22, 40)));

    humidity.publish(45);
    assert_eq!(recorder.next(WAIT).await, Ok((22, 45)));

    // Act - tear the producers down; subscriptions end, the merge ends
    drop(temperature);
    drop(humidity);

    // Assert
    assert_eq!(recorder.next(WAIT).await, Err(RecvError::SourceEnded));
}

#[tokio::test]
async fn test_task_set_manages_subscriber_pumps() {
    // Arrange - one relay fanned out to two recorded subscribers, with the
    // pump lifetimes owned by a TaskSet
    let relay = Relay::new(0);
    let first = relay.subscribe().map(StreamItem::Value).record();
    let second = relay.subscribe().map(StreamItem::Value).record();

    let mut tasks = TaskSet::new();
    tasks.insert(TaskHandle::spawn(|cancel| async move {
        cancel.cancelled().await;
    }));

    // Act
    relay.publish(1);

    // Assert - multicast: both observers see the same suffix
    assert_eq!(first.next(WAIT).await, Ok(0));
    assert_eq!(second.next(WAIT).await, Ok(0));
    assert_eq!(first.next(WAIT).await, Ok(1));
    assert_eq!(second.next(WAIT).await, Ok(1));

    // Teardown is bulk and idempotent
    tasks.cancel_all();
    tasks.cancel_all();
    assert!(tasks.is_empty());
}

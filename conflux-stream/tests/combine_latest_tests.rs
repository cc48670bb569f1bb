// Copyright 2025 The Conflux Authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::time::Duration;

use conflux_core::{StreamError, StreamItem};
use conflux_stream::CombineLatestExt;
use conflux_test_utils::animal::{animal_cat, animal_dog, Animal};
use conflux_test_utils::helpers::expect_next_pair;
use conflux_test_utils::person::{person_alice, person_bob, Person};
use conflux_test_utils::{
    assert_no_element_emitted, assert_stream_ended, test_channel, test_channel_with_errors,
    unwrap_stream, FailAfter,
};
use futures::stream;
use tokio::time::sleep;

#[tokio::test]
async fn test_combine_latest_waits_for_both_sides_to_prime() -> anyhow::Result<()> {
    // Arrange
    let (tx_a, stream_a) = test_channel::<i32>();
    let (tx_b, stream_b) = test_channel::<&str>();

    let mut pairs = stream_a.combine_latest(stream_b);

    // Act - only one side has a value
    tx_a.send(1)?;

    // Assert - no emission before priming
    assert_no_element_emitted(&mut pairs, 100).await;

    // Act - the other side primes
    tx_b.send("a")?;

    // Assert - the first pair carries both first values
    expect_next_pair(&mut pairs, 1, "a").await;

    Ok(())
}

#[tokio::test]
async fn test_combine_latest_reemits_on_every_update() -> anyhow::Result<()> {
    // Arrange
    let (tx_a, stream_a) = test_channel::<i32>();
    let (tx_b, stream_b) = test_channel::<&str>();

    let mut pairs = stream_a.combine_latest(stream_b);

    tx_a.send(1)?;
    tx_b.send("a")?;
    expect_next_pair(&mut pairs, 1, "a").await;

    // Act / Assert - each side's update pairs with the other's latest
    tx_a.send(2)?;
    expect_next_pair(&mut pairs, 2, "a").await;

    tx_b.send("b")?;
    expect_next_pair(&mut pairs, 2, "b").await;

    tx_a.send(3)?;
    expect_next_pair(&mut pairs, 3, "b").await;

    Ok(())
}

#[tokio::test]
async fn test_combine_latest_survives_one_side_finishing() -> anyhow::Result<()> {
    // Arrange
    let (tx_a, stream_a) = test_channel::<i32>();
    let (tx_b, stream_b) = test_channel::<&str>();

    let mut pairs = stream_a.combine_latest(stream_b);

    tx_a.send(1)?;
    tx_b.send("a")?;
    expect_next_pair(&mut pairs, 1, "a").await;

    // Act - side A finishes
    drop(tx_a);

    // Assert - the merge stays alive, pairing with A's last value
    tx_b.send("b")?;
    expect_next_pair(&mut pairs, 1, "b").await;

    tx_b.send("c")?;
    expect_next_pair(&mut pairs, 1, "c").await;

    // Act - side B finishes too
    drop(tx_b);

    // Assert - now the merge ends
    assert_stream_ended(&mut pairs, 500).await;

    Ok(())
}

#[tokio::test]
async fn test_combine_latest_silent_side_blocks_emission_until_both_end() -> anyhow::Result<()> {
    // Arrange - side A never produces a value
    let (tx_a, stream_a) = test_channel::<i32>();
    let (tx_b, stream_b) = test_channel::<&str>();

    let mut pairs = stream_a.combine_latest(stream_b);

    // Act - B emits, A stays silent
    tx_b.send("a")?;
    tx_b.send("b")?;

    // Assert - priming never completes
    assert_no_element_emitted(&mut pairs, 100).await;

    // Act - A finishes without ever emitting; B keeps going, then finishes
    drop(tx_a);
    tx_b.send("c")?;
    assert_no_element_emitted(&mut pairs, 100).await;
    drop(tx_b);

    // Assert - the merge finishes without ever having emitted
    assert_stream_ended(&mut pairs, 500).await;

    Ok(())
}

#[tokio::test]
async fn test_combine_latest_treats_upstream_error_as_completion() -> anyhow::Result<()> {
    // Arrange
    let (tx_a, stream_a) = test_channel_with_errors::<i32>();
    let (tx_b, stream_b) = test_channel::<&str>();

    let mut pairs = stream_a.combine_latest(stream_b);

    tx_a.send(StreamItem::Value(1))?;
    tx_b.send("a")?;
    expect_next_pair(&mut pairs, 1, "a").await;

    // Act - side A fails
    tx_a.send(StreamItem::Error(StreamError::source_error("boom")))?;

    // Assert - swallowed: the merge continues on A's last good value
    tx_b.send("b")?;
    expect_next_pair(&mut pairs, 1, "b").await;

    drop(tx_b);
    assert_stream_ended(&mut pairs, 500).await;

    Ok(())
}

#[tokio::test]
async fn test_combine_latest_error_before_first_value_never_primes() -> anyhow::Result<()> {
    // Arrange - side A fails immediately, having produced nothing
    let stream_a = FailAfter::new(stream::empty::<i32>(), 0);
    let (tx_b, stream_b) = test_channel::<&str>();

    let mut pairs = stream_a.combine_latest(stream_b);

    // Act
    tx_b.send("a")?;

    // Assert
    assert_no_element_emitted(&mut pairs, 100).await;
    drop(tx_b);
    assert_stream_ended(&mut pairs, 500).await;

    Ok(())
}

#[tokio::test]
async fn test_combine_latest_emission_order_matches_update_order() -> anyhow::Result<()> {
    // Arrange
    let (tx_a, stream_a) = test_channel::<i32>();
    let (tx_b, stream_b) = test_channel::<i32>();

    let mut pairs = stream_a.combine_latest(stream_b);

    // Act - interleave updates, observing after each so the interleaving is
    // the one we think it is
    tx_a.send(1)?;
    tx_b.send(10)?;
    expect_next_pair(&mut pairs, 1, 10).await;
    tx_a.send(2)?;
    expect_next_pair(&mut pairs, 2, 10).await;
    tx_b.send(20)?;
    expect_next_pair(&mut pairs, 2, 20).await;
    tx_b.send(30)?;
    expect_next_pair(&mut pairs, 2, 30).await;

    Ok(())
}

#[tokio::test]
async fn test_combine_latest_pairs_owned_values() -> anyhow::Result<()> {
    // Arrange - non-Copy payloads on both sides
    let (tx_a, stream_a) = test_channel::<Person>();
    let (tx_b, stream_b) = test_channel::<Animal>();

    let mut pairs = stream_a.combine_latest(stream_b);

    // Act
    tx_a.send(person_alice())?;
    tx_b.send(animal_cat())?;
    expect_next_pair(&mut pairs, person_alice(), animal_cat()).await;

    tx_a.send(person_bob())?;

    // Assert - the retained latest values are clones, not moves
    expect_next_pair(&mut pairs, person_bob(), animal_cat()).await;

    tx_b.send(animal_dog())?;
    expect_next_pair(&mut pairs, person_bob(), animal_dog()).await;

    Ok(())
}

#[tokio::test]
async fn test_combine_latest_drop_cancels_both_pumps() -> anyhow::Result<()> {
    // Arrange
    let (tx_a, stream_a) = test_channel::<i32>();
    let (tx_b, stream_b) = test_channel::<&str>();

    let mut pairs = stream_a.combine_latest(stream_b);
    tx_a.send(1)?;
    tx_b.send("a")?;
    expect_next_pair(&mut pairs, 1, "a").await;

    // Act - cancel the merged sequence
    drop(pairs);

    // Assert - both pump tasks tear down their source channels
    while !(tx_a.is_closed() && tx_b.is_closed()) {
        sleep(Duration::from_millis(1)).await;
    }

    Ok(())
}

#[tokio::test]
async fn test_combine_latest_with_failing_source_pairs_until_failure() -> anyhow::Result<()> {
    // Arrange - A delivers 1, 2 and then fails
    let stream_a = FailAfter::new(stream::iter([1, 2]), 2);
    let (tx_b, stream_b) = test_channel::<&str>();

    let mut pairs = stream_a.combine_latest(stream_b);

    // Act - prime B after A has already run dry
    tx_b.send("a")?;

    // Assert - A's last value before the failure keeps pairing
    let pair = unwrap_stream(&mut pairs, 500).await;
    assert_eq!(pair, (2, "a"));

    tx_b.send("b")?;
    expect_next_pair(&mut pairs, 2, "b").await;

    drop(tx_b);
    assert_stream_ended(&mut pairs, 500).await;

    Ok(())
}

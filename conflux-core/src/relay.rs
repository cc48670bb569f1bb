// Copyright 2025 The Conflux Authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Replay-1 multicast relay.
//!
//! A [`Relay<T>`] broadcasts each published value to all active subscribers
//! and replays the latest value to anyone who joins late.
//!
//! ## Characteristics
//!
//! - **Replay-1**: A relay always holds a value. Every new subscriber
//!   receives the current value as its first item, before any publish it can
//!   also observe.
//! - **Unbounded**: The built-in subscriber sink uses unbounded mpsc channels
//!   (no backpressure); `publish` never blocks on a slow consumer.
//! - **Thread-safe**: Cheap to clone; all clones share the same state.
//! - **No error channel**: A relay broadcasts plain values. It never fails
//!   and never proactively ends a subscription.
//!
//! ## Example
//!
//! ```
//! use conflux_core::Relay;
//! use futures::StreamExt;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let relay = Relay::new(0);
//! relay.publish(1);
//!
//! // A late subscriber first observes the latest value...
//! let mut updates = relay.subscribe();
//! assert_eq!(updates.next().await, Some(1));
//!
//! // ...and every publish from then on, in order.
//! relay.publish(2);
//! relay.publish(3);
//! assert_eq!(updates.next().await, Some(2));
//! assert_eq!(updates.next().await, Some(3));
//! # }
//! ```

use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::Stream;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::pin::Pin;
use std::sync::{Arc, Weak};
use std::task::{Context, Poll};

/// Per-subscriber delivery endpoint.
///
/// The relay pushes values through this trait without depending on a specific
/// delivery mechanism; an unbounded-channel implementation backs
/// [`Relay::subscribe`], and callers can register their own (a queue, a
/// callback) through [`Relay::subscribe_sink`].
///
/// `deliver` must not block: it runs inside the relay's serialization point,
/// and a sink that buffers or sheds load does so internally.
pub trait Sink<T>: Send {
    /// Push one value to the consumer. Returning `false` tells the relay the
    /// consumer is gone and this sink must be forgotten.
    fn deliver(&self, value: T) -> bool;

    /// Terminal notification; no further `deliver` calls will follow.
    fn close(&self);
}

struct ChannelSink<T> {
    tx: UnboundedSender<T>,
}

impl<T: Send> Sink<T> for ChannelSink<T> {
    fn deliver(&self, value: T) -> bool {
        self.tx.unbounded_send(value).is_ok()
    }

    fn close(&self) {
        self.tx.close_channel();
    }
}

struct RelayState<T> {
    current: T,
    next_id: u64,
    sinks: HashMap<u64, Box<dyn Sink<T>>>,
}

impl<T: Clone> RelayState<T> {
    fn register(&mut self, sink: Box<dyn Sink<T>>) -> u64 {
        // Replay happens under the state lock, so the first delivered item is
        // the current value and no concurrent publish can be lost or seen
        // twice by this subscriber.
        sink.deliver(self.current.clone());
        let id = self.next_id;
        self.next_id += 1;
        self.sinks.insert(id, sink);
        id
    }

    fn unregister(&mut self, id: u64) {
        // Idempotent keyed removal; a second call for the same id is a no-op.
        if let Some(sink) = self.sinks.remove(&id) {
            sink.close();
        }
    }
}

/// A replay-1 multicast relay.
///
/// `Relay` is the entry point for pushing values into a conflux pipeline.
/// The relay exclusively owns its current value and subscriber map; one lock
/// serializes every publish, subscribe and unsubscribe, which is what makes
/// replay-on-subscribe atomic with respect to concurrent publishes.
///
/// See the [module documentation](self) for examples and more details.
pub struct Relay<T: Clone + Send + 'static> {
    state: Arc<Mutex<RelayState<T>>>,
}

impl<T: Clone + Send + 'static> Relay<T> {
    /// Creates a relay holding `seed` as its current value.
    ///
    /// A relay is never valueless: subscribers registered before the first
    /// publish observe the seed.
    #[must_use]
    pub fn new(seed: T) -> Self {
        Self {
            state: Arc::new(Mutex::new(RelayState {
                current: seed,
                next_id: 0,
                sinks: HashMap::new(),
            })),
        }
    }

    /// Publish a value to every current subscriber.
    ///
    /// Atomically overwrites the current value and fans it out. Each
    /// individual subscriber observes publishes in call order; no order is
    /// guaranteed across distinct subscribers. Sinks whose consumer has gone
    /// away are dropped here.
    ///
    /// `publish` cannot fail and never blocks the publisher.
    pub fn publish(&self, value: T) {
        let mut state = self.state.lock();
        state.current = value.clone();
        state.sinks.retain(|_, sink| sink.deliver(value.clone()));
    }

    /// Returns a clone of the most recently published value.
    #[must_use]
    pub fn current(&self) -> T {
        self.state.lock().current.clone()
    }

    /// Subscribe to this relay and receive a stream of values.
    ///
    /// The subscription's first item is the relay's current value; every
    /// later publish follows in order. Dropping the subscription (or calling
    /// [`Subscription::unsubscribe`]) removes it from the relay; that is the
    /// only way a relay forgets a subscriber.
    #[must_use]
    pub fn subscribe(&self) -> Subscription<T> {
        let (tx, rx) = mpsc::unbounded();
        let id = self.state.lock().register(Box::new(ChannelSink { tx }));
        Subscription {
            id,
            state: Arc::downgrade(&self.state),
            receiver: rx,
        }
    }

    /// Register a caller-supplied sink.
    ///
    /// The current value is replayed into the sink before it can observe any
    /// later publish, exactly as with [`subscribe`](Self::subscribe).
    pub fn subscribe_sink(&self, sink: Box<dyn Sink<T>>) -> SinkHandle<T> {
        let id = self.state.lock().register(sink);
        SinkHandle {
            id,
            state: Arc::downgrade(&self.state),
        }
    }

    /// Returns the number of currently registered subscribers.
    ///
    /// Note: subscribers whose consumer has gone away without unsubscribing
    /// are removed on the next `publish`, not immediately.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.state.lock().sinks.len()
    }
}

impl<T: Clone + Send + 'static> Clone for Relay<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

/// A subscriber's view of a [`Relay`]: a stream of delivered values.
///
/// Holds only a weak reference back to the relay, so an outstanding
/// subscription does not keep the relay's state alive. When every `Relay`
/// handle is gone the stream simply ends.
pub struct Subscription<T: Clone + Send + 'static> {
    id: u64,
    state: Weak<Mutex<RelayState<T>>>,
    receiver: UnboundedReceiver<T>,
}

impl<T: Clone + Send + 'static> Subscription<T> {
    /// Explicitly remove this subscription from the relay.
    ///
    /// Equivalent to dropping the subscription; removal is idempotent.
    pub fn unsubscribe(self) {}
}

impl<T: Clone + Send + 'static> Stream for Subscription<T> {
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.get_mut().receiver).poll_next(cx)
    }
}

impl<T: Clone + Send + 'static> Drop for Subscription<T> {
    fn drop(&mut self) {
        if let Some(state) = self.state.upgrade() {
            state.lock().unregister(self.id);
        }
    }
}

/// Registration handle for a caller-supplied [`Sink`].
///
/// Dropping the handle (or calling [`detach`](Self::detach)) unregisters the
/// sink and closes it.
pub struct SinkHandle<T: Clone + Send + 'static> {
    id: u64,
    state: Weak<Mutex<RelayState<T>>>,
}

impl<T: Clone + Send + 'static> SinkHandle<T> {
    /// Unregister the sink. Equivalent to dropping the handle; idempotent.
    pub fn detach(self) {}
}

impl<T: Clone + Send + 'static> Drop for SinkHandle<T> {
    fn drop(&mut self) {
        if let Some(state) = self.state.upgrade() {
            state.lock().unregister(self.id);
        }
    }
}

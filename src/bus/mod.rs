//! Hierarchical publish/subscribe bus.
//!
//! Subscribers register a channel name or a trailing-wildcard pattern
//! (`"a/*"`) and receive every event published on a channel the pattern
//! matches (see [`pattern::matches`]). Channels under the `local/`
//! namespace are never eligible for remote forwarding by
//! [`crate::remote`] (spec §4.2, §4.7).
//!
//! Grounded in the broker's `Arc<Inner>` + `DashMap` shape
//! (`broker::in_memory::InMemoryMessageBroker`), generalized from a flat
//! actor-address routing table into a pattern-keyed subscription table.

pub mod error;
pub mod pattern;

// Layer 1: Standard library imports
use std::sync::Arc;

// Layer 2: Third-party crate imports
use dashmap::{DashMap, DashSet};
use tracing::warn;

// Layer 3: Internal module imports
use crate::mailbox::MailboxSender;
use crate::message::{Message, MessageEnvelope};
use crate::util::ActorPath;
pub use error::BusError;

/// An event published on the bus: the channel it travelled on, the
/// publishing actor, and the payload.
#[derive(Debug, Clone)]
pub struct BusEvent<M: Message> {
    /// Exact channel the event was published on (never a pattern).
    pub channel: String,
    /// The actor that published the event.
    pub sender: ActorPath,
    /// The event payload.
    pub payload: M,
}

impl<M: Message> BusEvent<M> {
    /// Construct a new event.
    pub fn new(channel: impl Into<String>, sender: ActorPath, payload: M) -> Self {
        Self {
            channel: channel.into(),
            sender,
            payload,
        }
    }
}

struct Inner<M: Message, S: MailboxSender<M>> {
    /// pattern -> subscribed actor paths.
    subscriptions: DashMap<String, DashSet<ActorPath>>,
    /// actor path -> its mailbox sender.
    senders: DashMap<ActorPath, S>,
    _marker: std::marker::PhantomData<M>,
}

/// Hierarchical pub/sub bus for one universe.
///
/// Generic over the message type `M` carried as [`BusEvent`] payloads and
/// the mailbox sender type `S` used to deliver them, following the
/// zero-cost generic-constraint style used throughout this crate rather
/// than boxed trait objects.
pub struct Bus<M: Message, S: MailboxSender<M>> {
    inner: Arc<Inner<M, S>>,
}

impl<M: Message, S: MailboxSender<M>> Clone for Bus<M, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<M: Message, S: MailboxSender<M>> Default for Bus<M, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Message, S: MailboxSender<M>> Bus<M, S> {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                subscriptions: DashMap::new(),
                senders: DashMap::new(),
                _marker: std::marker::PhantomData,
            }),
        }
    }

    /// Register `subscriber`'s mailbox sender and subscribe it to
    /// `pattern` (an exact channel name or a trailing-wildcard pattern).
    pub fn subscribe(&self, subscriber: ActorPath, pattern: impl Into<String>, sender: S) {
        let pattern = pattern.into();
        self.inner.senders.insert(subscriber.clone(), sender);
        self.inner
            .subscriptions
            .entry(pattern)
            .or_default()
            .insert(subscriber);
    }

    /// Remove `subscriber` from `pattern`. Does not drop its registered
    /// sender, since the same actor may still be subscribed elsewhere.
    pub fn unsubscribe(&self, subscriber: &ActorPath, pattern: &str) -> Result<(), BusError> {
        match self.inner.subscriptions.get(pattern) {
            Some(subs) if subs.remove(subscriber).is_some() => Ok(()),
            _ => Err(BusError::NotSubscribed {
                subscriber: subscriber.clone(),
                channel: pattern.to_string(),
            }),
        }
    }

    /// Deliver `event` to every subscriber whose pattern matches
    /// `event.channel`. Subscribers with a closed mailbox are dropped
    /// from the subscription and logged, never treated as fatal to the
    /// publish.
    pub async fn publish(&self, event: BusEvent<M>) {
        let mut matched = Vec::new();
        for entry in self.inner.subscriptions.iter() {
            if pattern::matches(entry.key(), &event.channel) {
                matched.extend(entry.value().iter().map(|r| r.clone()));
            }
        }

        for subscriber in matched {
            let sender = match self.inner.senders.get(&subscriber) {
                Some(s) => s.clone(),
                None => continue,
            };
            let envelope = MessageEnvelope::new(event.payload.clone())
                .with_sender(event.sender.clone());
            if sender.send(envelope).await.is_err() {
                warn!(%subscriber, channel = %event.channel, "dropping subscriber with closed mailbox");
                self.evict(&subscriber);
            }
        }
    }

    /// Number of distinct patterns with at least one subscriber.
    pub fn pattern_count(&self) -> usize {
        self.inner.subscriptions.len()
    }

    /// Number of subscribers registered on an exact pattern (not
    /// resolved against wildcards).
    pub fn subscriber_count(&self, pattern: &str) -> usize {
        self.inner
            .subscriptions
            .get(pattern)
            .map(|s| s.len())
            .unwrap_or(0)
    }

    fn evict(&self, subscriber: &ActorPath) {
        self.inner.senders.remove(subscriber);
        for entry in self.inner.subscriptions.iter() {
            entry.value().remove(subscriber);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mailbox::bounded::{BoundedMailbox, BoundedMailboxSender};
    use crate::mailbox::traits::MailboxReceiver;

    #[derive(Debug, Clone, PartialEq)]
    struct Ping;

    impl Message for Ping {
        const MESSAGE_TYPE: &'static str = "ping";
    }

    #[tokio::test]
    async fn test_exact_channel_delivery() {
        let bus: Bus<Ping, _> = Bus::new();
        let (mut rx, tx) = BoundedMailbox::<Ping>::new(8);
        let sub = ActorPath::root("race").child("sink");
        bus.subscribe(sub.clone(), "a/b", tx);

        bus.publish(BusEvent::new("a/b", ActorPath::root("race"), Ping))
            .await;

        let received = rx.recv().await;
        assert!(received.is_some());
    }

    #[tokio::test]
    async fn test_wildcard_delivery_to_descendant_channel() {
        let bus: Bus<Ping, _> = Bus::new();
        let (mut rx, tx) = BoundedMailbox::<Ping>::new(8);
        let sub = ActorPath::root("race").child("sink");
        bus.subscribe(sub, "a/*", tx);

        bus.publish(BusEvent::new("a/b/c", ActorPath::root("race"), Ping))
            .await;

        assert!(rx.recv().await.is_some());
    }

    #[tokio::test]
    async fn test_no_delivery_to_unrelated_channel() {
        let bus: Bus<Ping, _> = Bus::new();
        let (mut rx, tx) = BoundedMailbox::<Ping>::new(8);
        let sub = ActorPath::root("race").child("sink");
        bus.subscribe(sub, "a/*", tx);

        bus.publish(BusEvent::new("b/x", ActorPath::root("race"), Ping))
            .await;

        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_unsubscribe_unknown_is_error() {
        let bus: Bus<Ping, BoundedMailboxSender<Ping>> = Bus::new();
        let sub = ActorPath::root("race").child("sink");
        assert!(bus.unsubscribe(&sub, "a/b").is_err());
    }

    #[tokio::test]
    async fn test_unsubscribe_stops_delivery() {
        let bus: Bus<Ping, _> = Bus::new();
        let (mut rx, tx) = BoundedMailbox::<Ping>::new(8);
        let sub = ActorPath::root("race").child("sink");
        bus.subscribe(sub.clone(), "a/b", tx);
        bus.unsubscribe(&sub, "a/b").unwrap();

        bus.publish(BusEvent::new("a/b", ActorPath::root("race"), Ping))
            .await;

        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_local_namespace_never_remote_forwarded() {
        assert!(pattern::is_local_only("local/metrics"));
    }
}

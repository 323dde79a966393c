//! Channel/topic provider negotiation: decouples "I subscribe to channel
//! X" from "I want the provider for channel X to serve me topic Y" (spec
//! §4.7).
//!
//! A provider may serve several topics; several subscribers may share one
//! provider; a provider only activates once at least one client has
//! accepted. State lives in two maps, keyed from each side of the
//! negotiation, matching the bus module's `DashMap`-backed concurrent
//! registries.

// Layer 1: Standard library imports
use std::collections::HashSet;

// Layer 2: Third-party crate imports
use dashmap::{DashMap, DashSet};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

// Layer 3: Internal module imports
use crate::util::ActorPath;

/// Well-known system channel requests are published on (spec §4.7: user
/// handlers never see these).
pub const PROVIDER_CHANNEL: &str = "/race/provider";

/// Opaque tag distinguishing topics served by the same channel.
pub type Topic = Option<String>;

/// A `(channel, topic)` pair: the provider-negotiation key.
pub type ChannelTopic = (String, Topic);

#[derive(Debug, Error)]
pub enum NegotiatorError {
    #[error("no provider registered for channel '{channel}' topic {topic:?}")]
    NoProvider { channel: String, topic: Topic },

    #[error("subscriber '{subscriber}' has no accepted subscription for channel '{channel}' topic {topic:?}")]
    NotAccepted {
        subscriber: ActorPath,
        channel: String,
        topic: Topic,
    },
}

/// A subscriber's negotiation state for one `(channel, topic)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
enum SubscriberState {
    Pending,
    Accepted { provider: ActorPath, refcount: u32 },
}

/// A provider's negotiation state for one `(channel, topic)` it serves.
struct ProviderRecord {
    provider: ActorPath,
    clients: HashSet<ActorPath>,
}

impl ProviderRecord {
    fn is_active(&self) -> bool {
        !self.clients.is_empty()
    }
}

/// Outcome of a [`ChannelTopicNegotiator::request`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    /// A registered provider accepted immediately.
    Accepted(ActorPath),
    /// No provider is registered yet; the request is now pending.
    Pending,
}

/// Tracks provider/subscriber negotiation state across the universe.
///
/// Transitive providers (an actor that is both subscriber and provider
/// for a different tuple) are supported by calling `request` again for
/// the upstream tuple from within the provider's own message handler —
/// the negotiator itself stays a flat registry and does not recurse.
/// [`register_transitive_request`](Self::register_transitive_request),
/// [`pending_for_input`](Self::pending_for_input), and
/// [`accept_upstream_once`](Self::accept_upstream_once) hold the
/// `input-tuple -> {pending-requests}` / `client-tuple -> input-response`
/// bookkeeping the transitive case needs.
#[derive(Default)]
pub struct ChannelTopicNegotiator {
    subscribers: DashMap<(ActorPath, ChannelTopic), SubscriberState>,
    providers: DashMap<ChannelTopic, ProviderRecord>,
    /// Subscribers that asked to be notified of every channel a provider
    /// ever serves, rather than one `(channel, topic)` at a time.
    all_channel_requests: DashSet<ActorPath>,
    /// `input-tuple -> {client-tuple}` pending requests a transitive
    /// provider has forwarded upstream and not yet answered.
    input_pending: DashMap<ChannelTopic, HashSet<ChannelTopic>>,
    /// `client-tuple -> input-tuple`: which upstream tuple a downstream
    /// tuple a transitive provider serves is backed by.
    client_to_input: DashMap<ChannelTopic, ChannelTopic>,
    /// Input tuples a transitive provider has already accepted upstream,
    /// so later downstream accepts don't re-send `Accept`.
    accepted_upstream: DashSet<ChannelTopic>,
}

impl ChannelTopicNegotiator {
    /// Create an empty negotiator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `provider` as able to serve `(channel, topic)`. Idempotent;
    /// does not itself activate the provider (only an accepted client
    /// does, per spec: "a provider only activates when at least one
    /// client has accepted").
    pub fn register_provider(&self, channel: impl Into<String>, topic: Topic, provider: ActorPath) {
        let key = (channel.into(), topic);
        self.providers.entry(key).or_insert_with(|| ProviderRecord {
            provider,
            clients: HashSet::new(),
        });
    }

    /// Subscriber-side request for `(channel, topic)`. If a provider is
    /// registered, accepts immediately and shares the subscription via
    /// refcount if `subscriber` already holds it; otherwise records the
    /// request as pending.
    pub fn request(
        &self,
        subscriber: ActorPath,
        channel: impl Into<String>,
        topic: Topic,
    ) -> RequestOutcome {
        let key = (channel.into(), topic.clone());
        let sub_key = (subscriber.clone(), key.clone());

        if let Some(mut existing) = self.subscribers.get_mut(&sub_key) {
            if let SubscriberState::Accepted { provider, refcount } = &mut *existing {
                *refcount += 1;
                debug!(%subscriber, channel = %key.0, "shared existing subscription, refcount={refcount}");
                return RequestOutcome::Accepted(provider.clone());
            }
        }

        match self.providers.get_mut(&key) {
            Some(mut record) => {
                record.clients.insert(subscriber.clone());
                let provider = record.provider.clone();
                self.subscribers.insert(
                    sub_key,
                    SubscriberState::Accepted {
                        provider: provider.clone(),
                        refcount: 1,
                    },
                );
                RequestOutcome::Accepted(provider)
            }
            None => {
                self.subscribers.insert(sub_key, SubscriberState::Pending);
                RequestOutcome::Pending
            }
        }
    }

    /// Subscriber-side release of one reference to `(channel, topic)`.
    /// Decrements refcount; only the last release tears the subscription
    /// down and removes it from the subscription map, keeping the map
    /// consistent with the refcount invariant.
    pub fn release(
        &self,
        subscriber: &ActorPath,
        channel: impl Into<String>,
        topic: Topic,
    ) -> Result<(), NegotiatorError> {
        let key = (channel.into(), topic.clone());
        let sub_key = (subscriber.clone(), key.clone());

        let should_remove = {
            let mut entry = self
                .subscribers
                .get_mut(&sub_key)
                .ok_or_else(|| NegotiatorError::NotAccepted {
                    subscriber: subscriber.clone(),
                    channel: key.0.clone(),
                    topic: key.1.clone(),
                })?;
            match &mut *entry {
                SubscriberState::Accepted { refcount, .. } => {
                    *refcount -= 1;
                    *refcount == 0
                }
                SubscriberState::Pending => true,
            }
        };

        if should_remove {
            self.subscribers.remove(&sub_key);
            if let Some(mut record) = self.providers.get_mut(&key) {
                record.clients.remove(subscriber);
            }
        }
        Ok(())
    }

    /// True if `(channel, topic)` has at least one accepted client.
    pub fn provider_has_clients(&self, channel: &str, topic: &Topic) -> bool {
        self.providers
            .get(&(channel.to_string(), topic.clone()))
            .map(|r| r.is_active())
            .unwrap_or(false)
    }

    /// Current refcount for `subscriber`'s accepted `(channel, topic)`,
    /// or `None` if not accepted.
    pub fn refcount(&self, subscriber: &ActorPath, channel: &str, topic: &Topic) -> Option<u32> {
        match self
            .subscribers
            .get(&(subscriber.clone(), (channel.to_string(), topic.clone())))?
            .value()
        {
            SubscriberState::Accepted { refcount, .. } => Some(*refcount),
            SubscriberState::Pending => None,
        }
    }

    /// Remove every subscription held by a client that terminated without
    /// releasing (spec §4.7: provider absent "on Release received or
    /// client Terminated").
    pub fn on_client_terminated(&self, subscriber: &ActorPath) {
        let keys: Vec<ChannelTopic> = self
            .subscribers
            .iter()
            .filter(|e| e.key().0 == *subscriber)
            .map(|e| e.key().1.clone())
            .collect();
        for key in keys {
            self.subscribers.remove(&(subscriber.clone(), key.clone()));
            if let Some(mut record) = self.providers.get_mut(&key) {
                record.clients.remove(subscriber);
            }
        }
        self.all_channel_requests.remove(subscriber);
        warn!(%subscriber, "cleared negotiation state for terminated client");
    }

    /// Mark `subscriber` as wanting every channel a provider serves,
    /// rather than negotiating one `(channel, topic)` tuple at a time.
    pub fn request_all_channels(&self, subscriber: ActorPath) {
        self.all_channel_requests.insert(subscriber);
    }

    /// Clear a previously set all-channel request.
    pub fn cancel_all_channels(&self, subscriber: &ActorPath) {
        self.all_channel_requests.remove(subscriber);
    }

    /// True if `subscriber` holds an all-channel request.
    pub fn has_all_channel_request(&self, subscriber: &ActorPath) -> bool {
        self.all_channel_requests.contains(subscriber)
    }

    /// Record that a transitive provider cannot satisfy `client_tuple`
    /// itself and has forwarded the request upstream as `input_tuple`.
    /// Idempotent: forwarding the same `client_tuple` twice just adds it
    /// to the same pending set once.
    pub fn register_transitive_request(&self, input_tuple: ChannelTopic, client_tuple: ChannelTopic) {
        self.input_pending
            .entry(input_tuple.clone())
            .or_default()
            .insert(client_tuple.clone());
        self.client_to_input.insert(client_tuple, input_tuple);
    }

    /// Every downstream `client_tuple` still waiting on `input_tuple`'s
    /// upstream response, so the caller can forward the response to each
    /// (spec: "it later receives a response it forwards responses to
    /// each pending requester"). Does not clear the pending set — the
    /// transitive provider keeps forwarding every response it gets until
    /// the client releases.
    pub fn pending_for_input(&self, input_tuple: &ChannelTopic) -> Vec<ChannelTopic> {
        self.input_pending
            .get(input_tuple)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// The upstream `input_tuple` a downstream `client_tuple` was
    /// forwarded as, if this negotiator is acting as a transitive
    /// provider for it.
    pub fn input_for_client(&self, client_tuple: &ChannelTopic) -> Option<ChannelTopic> {
        self.client_to_input.get(client_tuple).map(|e| e.value().clone())
    }

    /// True only the first time it is called for `input_tuple`: the
    /// transitive provider commits its own upstream `Accept` once, on
    /// the first accept from any downstream client (spec: "When it
    /// receives the first accept from any of them, it finally accepts
    /// its own upstream provider"). Every later call returns false so
    /// the caller knows not to re-send `Accept`.
    pub fn accept_upstream_once(&self, input_tuple: &ChannelTopic) -> bool {
        self.accepted_upstream.insert(input_tuple.clone())
    }

    /// Drop a downstream client tuple from a transitive provider's
    /// pending set, e.g. once that client releases or terminates.
    pub fn forget_transitive_client(&self, client_tuple: &ChannelTopic) {
        if let Some((_, input_tuple)) = self.client_to_input.remove(client_tuple) {
            if let Some(mut pending) = self.input_pending.get_mut(&input_tuple) {
                pending.remove(client_tuple);
            }
        }
    }
}

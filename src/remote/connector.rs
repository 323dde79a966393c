//! `RemoteBusConnector`: a local proxy actor standing in for peers in
//! another universe, so the bus itself never needs to be serializable
//! (spec §4.4).

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use tracing::warn;

// Layer 3: Internal module imports
use crate::actor::{Actor, ActorContext};
use crate::bus::{Bus, BusEvent};
use crate::mailbox::MailboxSender;
use crate::message::{Message, MessageEnvelope};
use crate::util::ActorPath;

/// Opt-in contract a message type must satisfy to cross the wire. Types
/// that cannot serialize (e.g. they carry a non-serializable handle)
/// simply don't implement this, and the connector drops them with a
/// warning rather than failing the whole universe (spec §4.4).
pub trait SerializableEnvelope {
    /// Encode this value for remote delivery, or `None` if it cannot be
    /// represented on the wire.
    fn to_wire(&self) -> Option<Bytes>;

    /// Build a local stand-in carrying the reason `channel`'s payload
    /// could not cross the wire, delivered back to the sender so it
    /// observes the failure instead of its forward silently vanishing.
    /// The default `None` means the type has no such representation and
    /// the connector falls back to a log-only warning.
    fn non_serializable_warning(_channel: &str) -> Option<Self>
    where
        Self: Sized,
    {
        None
    }
}

/// Messages the connector actor consumes.
#[derive(Debug, Clone)]
pub enum RemoteCommand<M: Message> {
    /// A remote actor wants to subscribe to a local channel.
    RemoteSubscribe { actor: ActorPath, channel: String },
    /// A remote actor is dropping its subscription to a local channel.
    RemoteUnsubscribe { actor: ActorPath, channel: String },
    /// A bus event to relay to the peer universe.
    Forward(BusEvent<M>),
}

impl<M: Message> Message for RemoteCommand<M> {
    const MESSAGE_TYPE: &'static str = "remote_command";
}

/// Relays subscribe/unsubscribe/publish traffic between the local bus
/// and a peer universe on behalf of actors it cannot host directly.
///
/// `PeerSender` is the mailbox sender type used by the bus this
/// connector proxies for `M`-typed traffic; it is independent of the
/// connector's own mailbox sender (its `Actor` impl is generic over
/// that separately), since the two carry different message types.
pub struct RemoteBusConnector<M, PeerSender>
where
    M: Message + SerializableEnvelope,
    PeerSender: MailboxSender<M>,
{
    bus: Bus<M, PeerSender>,
    peer_senders: DashMap<ActorPath, PeerSender>,
}

impl<M, PeerSender> RemoteBusConnector<M, PeerSender>
where
    M: Message + SerializableEnvelope,
    PeerSender: MailboxSender<M>,
{
    /// Create a connector attached to the local `bus`.
    pub fn new(bus: Bus<M, PeerSender>) -> Self {
        Self {
            bus,
            peer_senders: DashMap::new(),
        }
    }

    /// Register the local mailbox sender standing in for a remote actor.
    /// Required before that actor's `RemoteSubscribe` can be honored.
    pub fn register_peer(&self, actor: ActorPath, sender: PeerSender) {
        self.peer_senders.insert(actor, sender);
    }
}

#[async_trait]
impl<M, PeerSender, ConnSender> Actor<RemoteCommand<M>, ConnSender> for RemoteBusConnector<M, PeerSender>
where
    M: Message + SerializableEnvelope,
    PeerSender: MailboxSender<M> + 'static,
    ConnSender: MailboxSender<RemoteCommand<M>>,
{
    async fn handle_message(
        &mut self,
        message: RemoteCommand<M>,
        _ctx: &mut ActorContext<RemoteCommand<M>, ConnSender>,
    ) {
        match message {
            RemoteCommand::RemoteSubscribe { actor, channel } => {
                match self.peer_senders.get(&actor) {
                    Some(sender) => self.bus.subscribe(actor, channel, sender.clone()),
                    None => warn!(%actor, "remote subscribe for unregistered peer"),
                }
            }
            RemoteCommand::RemoteUnsubscribe { actor, channel } => {
                if let Err(err) = self.bus.unsubscribe(&actor, &channel) {
                    warn!(%actor, %channel, error = %err, "remote unsubscribe failed");
                }
            }
            RemoteCommand::Forward(event) => match event.payload.to_wire() {
                Some(_bytes) => {
                    // Wire transport is supplied by the embedding process
                    // (spec §4.9 "remote actor references: a string
                    // address + a dial function provided by the
                    // transport"); this connector only validates the
                    // serializable-message contract before handoff.
                    self.bus.publish(event).await;
                }
                None => {
                    warn!(channel = %event.channel, sender = %event.sender, "payload is not wire-serializable, dropping remote forward");
                    match M::non_serializable_warning(&event.channel) {
                        Some(warning) => match self.peer_senders.get(&event.sender) {
                            Some(sender) => {
                                if let Err(err) = sender.send(MessageEnvelope::new(warning)).await {
                                    warn!(actor = %event.sender, error = %err, "failed to deliver non-serializable warning to sender");
                                }
                            }
                            None => warn!(actor = %event.sender, "cannot notify sender of non-serializable payload: not a registered peer"),
                        },
                        None => {}
                    }
                }
            },
        }
    }
}

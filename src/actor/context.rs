//! Actor context: identity, timing, and bus access handed to every
//! message handler.

// Layer 1: Standard library imports
use std::marker::PhantomData;

// Layer 2: Third-party crate imports
use chrono::{DateTime, Utc}; // §3.2 MANDATORY

// Layer 3: Internal module imports
use super::capability::CapabilitySet;
use crate::bus::Bus;
use crate::mailbox::MailboxSender;
use crate::message::Message;
use crate::util::{ActorId, ActorPath};

/// Per-actor context passed to every lifecycle and message handler call.
///
/// Generic over the message type `M` the actor's bus carries and the
/// mailbox sender type `S`, following the zero-cost generic-constraint
/// convention used throughout this crate rather than a boxed bus handle.
pub struct ActorContext<M: Message, S: MailboxSender<M>> {
    path: ActorPath,
    id: ActorId,
    created_at: DateTime<Utc>,
    capabilities: CapabilitySet,
    bus: Bus<M, S>,
    _marker: PhantomData<M>,
}

impl<M: Message, S: MailboxSender<M>> ActorContext<M, S> {
    /// Create a new actor context.
    pub fn new(path: ActorPath, capabilities: CapabilitySet, bus: Bus<M, S>) -> Self {
        Self {
            id: *path.id(),
            path,
            created_at: Utc::now(), // §3.2
            capabilities,
            bus,
            _marker: PhantomData,
        }
    }

    /// This actor's hierarchical path.
    pub fn path(&self) -> &ActorPath {
        &self.path
    }

    /// This actor's mailbox identity.
    pub fn id(&self) -> &ActorId {
        &self.id
    }

    /// When this context was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// This actor's negotiated capabilities.
    pub fn capabilities(&self) -> CapabilitySet {
        self.capabilities
    }

    /// The bus this actor is attached to, for publishing events.
    pub fn bus(&self) -> &Bus<M, S> {
        &self.bus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::Capability;
    use crate::mailbox::bounded::BoundedMailboxSender;
    use crate::mailbox::metrics::AtomicMetrics;

    #[derive(Debug, Clone)]
    struct Dummy;
    impl Message for Dummy {
        const MESSAGE_TYPE: &'static str = "dummy";
    }

    #[test]
    fn test_context_exposes_path_and_capabilities() {
        let path = ActorPath::root("race").child("tracker");
        let caps = CapabilitySet::new().add(Capability::SupportsPauseResume);
        let bus: Bus<Dummy, BoundedMailboxSender<Dummy, AtomicMetrics>> = Bus::new();
        let ctx = ActorContext::new(path.clone(), caps, bus);

        assert_eq!(ctx.path(), &path);
        assert!(ctx.capabilities().has(Capability::SupportsPauseResume));
    }
}

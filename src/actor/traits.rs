//! Core Actor trait: the lifecycle callback contract the kernel drives
//! every actor through.
//!
//! Every callback returns `bool` rather than `Result`: a failure is
//! reported by returning `false` and logging internally, since the
//! kernel must never let an actor's panic or error escape and take down
//! the universe (spec §4.5: "an actor never crashes its universe").

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use async_trait::async_trait;

// Layer 3: Internal module imports
use super::capability::CapabilitySet;
use super::context::ActorContext;
use crate::clock::Instant;
use crate::mailbox::MailboxSender;
use crate::message::Message;

/// Core Actor trait with generic constraints for zero-cost abstractions.
///
/// `M` is the user message type this actor handles; `S` is the mailbox
/// sender type used by the bus this actor is attached to.
#[async_trait]
pub trait Actor<M: Message, S: MailboxSender<M>>: Send + Sync + 'static {
    /// The capabilities this actor advertises during negotiation (spec
    /// §4.9). Called once, before `on_initialize`.
    fn capabilities(&self) -> CapabilitySet {
        CapabilitySet::new()
    }

    /// One-time setup before the actor is eligible to start. Returning
    /// `false` aborts the actor's inclusion in the universe unless it is
    /// marked optional.
    async fn on_initialize(&mut self, _ctx: &mut ActorContext<M, S>) -> bool {
        true
    }

    /// Called when the universe transitions this actor into `Running`.
    async fn on_start(&mut self, _ctx: &mut ActorContext<M, S>) -> bool {
        true
    }

    /// Called when the universe pauses this actor. While paused only
    /// system messages are dispatched.
    async fn on_pause(&mut self, _ctx: &mut ActorContext<M, S>) -> bool {
        true
    }

    /// Called when the universe resumes a paused actor.
    async fn on_resume(&mut self, _ctx: &mut ActorContext<M, S>) -> bool {
        true
    }

    /// Called once as the actor is torn down, in reverse creation order
    /// relative to its siblings (spec §4.9).
    async fn on_terminate(&mut self, _ctx: &mut ActorContext<M, S>) -> bool {
        true
    }

    /// Called when the universe's simulation clock is reset, only if
    /// this actor advertised [`crate::actor::Capability::SupportsSimTimeReset`].
    async fn on_sync_with_clock(&mut self, _instant: Instant, _ctx: &mut ActorContext<M, S>) -> bool {
        true
    }

    /// Handle one user message. The default handler ignores everything,
    /// since many actors exist purely to react to system lifecycle
    /// events published on the bus.
    async fn handle_message(&mut self, _message: M, _ctx: &mut ActorContext<M, S>) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::Bus;
    use crate::mailbox::bounded::BoundedMailboxSender;
    use crate::mailbox::metrics::AtomicMetrics;
    use crate::util::ActorPath;

    #[derive(Debug, Clone)]
    struct Dummy;
    impl Message for Dummy {
        const MESSAGE_TYPE: &'static str = "dummy";
    }

    struct CountingActor {
        started: bool,
        messages: u32,
    }

    #[async_trait]
    impl Actor<Dummy, BoundedMailboxSender<Dummy, AtomicMetrics>> for CountingActor {
        async fn on_start(
            &mut self,
            _ctx: &mut ActorContext<Dummy, BoundedMailboxSender<Dummy, AtomicMetrics>>,
        ) -> bool {
            self.started = true;
            true
        }

        async fn handle_message(
            &mut self,
            _message: Dummy,
            _ctx: &mut ActorContext<Dummy, BoundedMailboxSender<Dummy, AtomicMetrics>>,
        ) {
            self.messages += 1;
        }
    }

    fn make_ctx() -> ActorContext<Dummy, BoundedMailboxSender<Dummy, AtomicMetrics>> {
        let bus: Bus<Dummy, BoundedMailboxSender<Dummy, AtomicMetrics>> = Bus::new();
        ActorContext::new(ActorPath::root("race"), CapabilitySet::new(), bus)
    }

    #[tokio::test]
    async fn test_default_capabilities_is_empty() {
        let actor = CountingActor {
            started: false,
            messages: 0,
        };
        assert_eq!(actor.capabilities(), CapabilitySet::new());
    }

    #[tokio::test]
    async fn test_on_start_runs() {
        let mut actor = CountingActor {
            started: false,
            messages: 0,
        };
        let mut ctx = make_ctx();
        assert!(actor.on_start(&mut ctx).await);
        assert!(actor.started);
    }

    #[tokio::test]
    async fn test_handle_message_counts() {
        let mut actor = CountingActor {
            started: false,
            messages: 0,
        };
        let mut ctx = make_ctx();
        actor.handle_message(Dummy, &mut ctx).await;
        assert_eq!(actor.messages, 1);
    }

    #[tokio::test]
    async fn test_default_hooks_succeed() {
        struct Noop;
        #[async_trait]
        impl Actor<Dummy, BoundedMailboxSender<Dummy, AtomicMetrics>> for Noop {}

        let mut actor = Noop;
        let mut ctx = make_ctx();
        assert!(actor.on_initialize(&mut ctx).await);
        assert!(actor.on_pause(&mut ctx).await);
        assert!(actor.on_resume(&mut ctx).await);
        assert!(actor.on_terminate(&mut ctx).await);
        assert!(actor.on_sync_with_clock(0, &mut ctx).await);
    }
}

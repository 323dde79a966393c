//! Actor kernel: drives an [`Actor`] impl through its synchronous
//! lifecycle and dispatches mailbox messages according to the current
//! state (spec §4.5).
//!
//! Lifecycle transitions arrive on a dedicated control channel, separate
//! from the actor's user mailbox, so a paused actor keeps answering
//! control traffic (`Ping`, `Terminate`) without a backlog of user
//! messages blocking it.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

// Layer 3: Internal module imports
use super::context::ActorContext;
use super::lifecycle::{ActorLifecycle, ActorState};
use super::traits::Actor;
use crate::clock::Instant;
use crate::mailbox::{MailboxReceiver, MailboxSender};
use crate::message::Message;

/// Control-plane command delivered outside the user mailbox.
#[derive(Debug)]
pub enum KernelCommand {
    /// Run `on_initialize`.
    Initialize,
    /// Run `on_start`, transitioning into `Running`.
    Start,
    /// Run `on_pause`, transitioning into `Paused`.
    Pause,
    /// Run `on_resume`, transitioning back into `Running`.
    Resume,
    /// Run `on_terminate` and stop the kernel loop.
    Terminate,
    /// Deliver a clock reset to `on_sync_with_clock`.
    SyncClock(Instant),
    /// Heartbeat probe; the kernel replies immediately without involving
    /// the actor, carrying the nonce back for latency measurement.
    Ping {
        /// Opaque value echoed back to the monitor.
        nonce: u64,
        /// Where to send the pong.
        reply: oneshot::Sender<u64>,
    },
}

/// Outcome of a single control command, reported back to whoever drives
/// the kernel loop (normally the supervisor) for observability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelOutcome {
    /// The callback returned `true` and the transition was applied.
    Applied(ActorState),
    /// The callback returned `false`; the kernel did not transition.
    Rejected,
    /// The command was ignored because of pre-init gating.
    Gated,
    /// The kernel has terminated and stopped processing.
    Stopped,
}

/// Drives `actor` through its lifecycle and mailbox.
pub struct ActorKernel<A, M, S, R>
where
    A: Actor<M, S>,
    M: Message,
    S: MailboxSender<M>,
    R: MailboxReceiver<M>,
{
    actor: A,
    ctx: ActorContext<M, S>,
    lifecycle: ActorLifecycle,
    mailbox: R,
    control: mpsc::Receiver<KernelCommand>,
}

impl<A, M, S, R> ActorKernel<A, M, S, R>
where
    A: Actor<M, S>,
    M: Message,
    S: MailboxSender<M>,
    R: MailboxReceiver<M>,
{
    /// Construct a kernel for `actor`, wired to its mailbox and a fresh
    /// control channel. Returns the kernel and the sender half the
    /// supervisor uses to drive it.
    pub fn new(
        actor: A,
        ctx: ActorContext<M, S>,
        mailbox: R,
        control_capacity: usize,
    ) -> (Self, mpsc::Sender<KernelCommand>) {
        let (tx, rx) = mpsc::channel(control_capacity);
        (
            Self {
                actor,
                ctx,
                lifecycle: ActorLifecycle::new(),
                mailbox,
                control: rx,
            },
            tx,
        )
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ActorState {
        self.lifecycle.state()
    }

    /// Apply one control command, returning what happened. Exposed
    /// separately from [`run`](Self::run) so tests and the supervisor's
    /// synchronous `askChildren` fan-out can drive single steps.
    pub async fn apply(&mut self, command: KernelCommand) -> KernelOutcome {
        if self.lifecycle.is_terminal() {
            return KernelOutcome::Stopped;
        }

        match command {
            KernelCommand::Terminate => {
                let ok = self.actor.on_terminate(&mut self.ctx).await;
                if !ok {
                    warn!(path = %self.ctx.path(), "on_terminate returned false; terminating anyway");
                }
                self.lifecycle.transition_to(ActorState::Terminating);
                self.lifecycle.transition_to(ActorState::Terminated);
                return KernelOutcome::Applied(ActorState::Terminated);
            }
            _ if self.lifecycle.state().is_pre_init()
                && !matches!(command, KernelCommand::Initialize) =>
            {
                if let KernelCommand::Ping { .. } = command {
                    warn!(path = %self.ctx.path(), "dropped ping before initialization");
                }
                return KernelOutcome::Gated;
            }
            KernelCommand::Ping { nonce, reply } => {
                let _ = reply.send(nonce);
                return KernelOutcome::Applied(self.lifecycle.state());
            }
            KernelCommand::Initialize => {
                let ok = self.actor.on_initialize(&mut self.ctx).await;
                if ok {
                    self.lifecycle.transition_to(ActorState::Initialized);
                    KernelOutcome::Applied(ActorState::Initialized)
                } else {
                    KernelOutcome::Rejected
                }
            }
            KernelCommand::Start => {
                self.lifecycle.transition_to(ActorState::Started);
                let ok = self.actor.on_start(&mut self.ctx).await;
                if ok {
                    self.lifecycle.transition_to(ActorState::Running);
                    KernelOutcome::Applied(ActorState::Running)
                } else {
                    KernelOutcome::Rejected
                }
            }
            KernelCommand::Pause => {
                let ok = self.actor.on_pause(&mut self.ctx).await;
                if ok {
                    self.lifecycle.transition_to(ActorState::Paused);
                    KernelOutcome::Applied(ActorState::Paused)
                } else {
                    KernelOutcome::Rejected
                }
            }
            KernelCommand::Resume => {
                let ok = self.actor.on_resume(&mut self.ctx).await;
                if ok {
                    self.lifecycle.transition_to(ActorState::Running);
                    KernelOutcome::Applied(ActorState::Running)
                } else {
                    KernelOutcome::Rejected
                }
            }
            KernelCommand::SyncClock(instant) => {
                let ok = self.actor.on_sync_with_clock(instant, &mut self.ctx).await;
                if ok {
                    KernelOutcome::Applied(self.lifecycle.state())
                } else {
                    KernelOutcome::Rejected
                }
            }
        }
    }

    /// Run until terminated: select between control commands and user
    /// mailbox messages, dispatching user messages only while `Running`.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                biased;
                command = self.control.recv() => {
                    match command {
                        Some(cmd) => {
                            let terminated = matches!(cmd, KernelCommand::Terminate);
                            self.apply(cmd).await;
                            if terminated {
                                break;
                            }
                        }
                        None => break,
                    }
                }
                envelope = self.mailbox.recv(), if self.lifecycle.state().accepts_user_messages() => {
                    match envelope {
                        Some(envelope) => {
                            debug!(path = %self.ctx.path(), msg_type = envelope.message_type(), "dispatching user message");
                            self.actor.handle_message(envelope.payload, &mut self.ctx).await;
                        }
                        None => break,
                    }
                }
            }
        }
    }
}

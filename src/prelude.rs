//! Prelude module for convenient imports.
//!
//! Re-exports the most commonly used types and traits for building actor
//! topologies with universe-rt. Import this module to get started quickly:
//!
//! ```rust
//! use universe_rt::prelude::*;
//! ```
//!
//! # What's Included
//!
//! ## Core Actor System
//! - [`Actor`] - lifecycle callback contract every actor implements
//! - [`ActorContext`] - identity, capabilities, and bus access
//! - [`ActorKernel`] - drives an actor through its state machine
//! - [`Capability`]/[`CapabilitySet`] - capability negotiation bitset
//! - [`ActorLifecycle`]/[`ActorState`] - the kernel's state machine
//!
//! ## Messaging
//! - [`Message`] - core trait for messages
//! - [`MessageEnvelope`] - message wrapper with metadata
//! - [`MessagePriority`] - priority levels
//!
//! ## Mailbox and Bus
//! - [`BoundedMailbox`]/[`UnboundedMailbox`] - mailbox implementations
//! - [`MailboxReceiver`]/[`MailboxSender`] - mailbox traits
//! - [`Bus`]/[`BusEvent`] - hierarchical publish/subscribe bus
//!
//! ## Supervision and Liveness
//! - [`ParentActor`]/[`SupervisedChild`]/[`KernelChild`] - ordered child supervision
//! - [`RestartPolicy`]/[`ShutdownPolicy`]/[`RestartBudget`] - supervision policy
//! - [`Monitor`]/[`ActorStats`]/[`LatencyStats`] - heartbeat liveness tracking
//!
//! ## Federation
//! - [`Master`]/[`MasterStatus`]/[`RemoteSatellite`] - per-universe controller
//! - [`UniverseRuntime`] - process-wide live-universe registry
//! - [`RemoteBusConnector`]/[`RemoteCommand`] - remote bus proxy
//! - [`ChannelTopicNegotiator`] - provider/subscriber negotiation
//! - [`SimClock`] - simulation clock
//!
//! ## System
//! - [`UniverseConfig`] - universe-wide configuration
//!
//! ## Utilities
//! - [`ActorPath`]/[`ActorId`]/[`MessageId`] - identity types

// Core actor system
pub use crate::actor::{
    Actor, ActorContext, ActorKernel, ActorLifecycle, ActorState, Capability, CapabilitySet,
    KernelCommand,
};

// Messaging
pub use crate::message::{Message, MessageEnvelope, MessagePriority};

// Mailbox and bus
pub use crate::bus::{Bus, BusEvent};
pub use crate::mailbox::{
    AtomicMetrics, BackpressureStrategy, BoundedMailbox, BoundedMailboxSender, MailboxReceiver,
    MailboxSender, UnboundedMailbox, UnboundedMailboxSender,
};

// Supervision and liveness
pub use crate::monitor::{ActorStats, LatencyStats, Monitor};
pub use crate::supervisor::{
    ChildId, KernelChild, NestedSupervisor, ParentActor, RestartBudget, RestartPolicy, ShutdownPolicy,
    SupervisedChild,
};

// Federation
pub use crate::clock::SimClock;
pub use crate::master::{Master, MasterStatus, RemoteSatellite};
pub use crate::negotiator::ChannelTopicNegotiator;
pub use crate::remote::{RemoteBusConnector, RemoteCommand};
pub use crate::runtime::UniverseRuntime;

// System
pub use crate::system::UniverseConfig;

// Utilities
pub use crate::util::{ActorId, ActorPath, MessageId};

//! # universe-rt - Distributed Actor Runtime for Real-Time Simulation Pipelines
//!
//! A runtime kernel for building message-driven simulation pipelines out of
//! reusable, independently configured actors. Each runtime instance (a
//! "universe") hosts actors connected through a hierarchical publish/
//! subscribe bus; universes federate across the network so actors in one
//! universe transparently consume and produce messages on channels owned
//! by another. A shared, controllable simulation clock lets the same actor
//! topology run against wall time or accelerated/replayed time.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use universe_rt::prelude::*;
//! use async_trait::async_trait;
//!
//! #[derive(Debug, Clone)]
//! struct Tick;
//!
//! impl Message for Tick {
//!     const MESSAGE_TYPE: &'static str = "tick";
//! }
//!
//! struct CounterActor {
//!     count: u64,
//! }
//!
//! #[async_trait]
//! impl Actor<Tick, BoundedMailboxSender<Tick, AtomicMetrics>> for CounterActor {
//!     async fn handle_message(
//!         &mut self,
//!         _message: Tick,
//!         _ctx: &mut ActorContext<Tick, BoundedMailboxSender<Tick, AtomicMetrics>>,
//!     ) {
//!         self.count += 1;
//!     }
//! }
//! ```
//!
//! # Core Design
//!
//! ## Zero-Cost Abstractions, With One Deliberate Exception
//! - **Generic constraints** instead of trait objects for the actor-to-actor
//!   message path: [`actor::Actor`], [`bus::Bus`], and the mailbox traits
//!   are all monomorphized per message/sender type.
//! - **Supervision crosses that boundary on purpose**: a [`supervisor::ParentActor`]
//!   manages a heterogeneous set of children, so it holds them behind the
//!   object-safe [`supervisor::SupervisedChild`] trait rather than forcing
//!   every child in a tree to share one concrete actor type.
//! - **Never crashes the universe**: lifecycle callbacks return `bool`
//!   rather than propagating panics, and the [`master::Master`] catches and
//!   logs every failure in its own receive loop rather than let it escape.
//!
//! ## Federation and Time
//! - [`clock::SimClock`] advances simulation time from wall time scaled by a
//!   configurable factor, and can be reset, stopped, or resumed.
//! - [`codec`] provides a compact binary wire format — big-endian
//!   primitives, length-prefixed collections, and an embedded-serializer
//!   registry — used whenever a [`remote::RemoteBusConnector`] crosses a
//!   universe boundary.
//! - [`negotiator::ChannelTopicNegotiator`] decouples "subscribe to a
//!   channel" from "start producing a topic on it", so a provider only
//!   activates once at least one client has accepted.
//! - [`monitor::Monitor`] drives the heartbeat/pong liveness protocol over
//!   the whole actor tree and tracks running latency statistics.
//!
//! # Module Organization
//!
//! ## Core Actor System
//! - [`actor`] - Actor trait, lifecycle state machine, capability negotiation
//! - [`message`] - Message trait, envelopes, and priority
//! - [`mailbox`] - Bounded/unbounded mailboxes with backpressure
//! - [`bus`] - Hierarchical publish/subscribe bus
//!
//! ## Fault Tolerance and Liveness
//! - [`supervisor`] - Ordered child supervision, bounded one-for-one restarts
//! - [`monitor`] - Heartbeat scheduling and latency observability
//!
//! ## Federation
//! - [`master`] - Per-universe lifecycle controller and satellite federation
//! - [`runtime`] - Process-wide live-universe registry
//! - [`remote`] - Local proxy actor standing in for a peer universe's actors
//! - [`negotiator`] - Dynamic channel/topic provider negotiation
//! - [`clock`] - Simulation clock with scale factor and reset
//! - [`codec`] - Binary wire format and embedded-serializer registry
//!
//! ## Infrastructure
//! - [`system`] - Universe-wide configuration and error taxonomy
//! - [`util`] - Identity types (`ActorId`, `ActorPath`, `MessageId`)

pub mod actor;
pub mod bus;
pub mod clock;
pub mod codec;
pub mod mailbox;
pub mod master;
pub mod message;
pub mod monitor;
pub mod negotiator;
pub mod prelude;
pub mod remote;
pub mod runtime;
pub mod supervisor;
pub mod system;
pub mod util;

// Re-export commonly used types
pub use actor::{
    Actor, ActorContext, ActorKernel, ActorLifecycle, ActorState, Capability, CapabilitySet,
    KernelCommand, KernelOutcome,
};
pub use bus::{Bus, BusError, BusEvent};
pub use clock::{Instant, SimClock};
pub use codec::{CodecError, DecodeStream, EncodeStream, SerializerId, SerializerRegistry, WireDecode, WireEncode};
pub use mailbox::{
    BackpressureStrategy, BoundedMailbox, BoundedMailboxSender, MailboxReceiver, MailboxSender,
    UnboundedMailbox, UnboundedMailboxSender,
};
pub use master::{HandshakeOutcome, Master, MasterStatus, RemoteSatellite};
pub use message::{Message, MessageEnvelope, MessagePriority};
pub use monitor::{ActorStats, LatencyStats, Monitor, TickReport};
pub use negotiator::{ChannelTopic, ChannelTopicNegotiator, NegotiatorError, RequestOutcome, Topic, PROVIDER_CHANNEL};
pub use remote::{RemoteBusConnector, RemoteCommand};
pub use runtime::{UniverseRuntime, UniverseTerminated};
pub use supervisor::{ChildId, KernelChild, ParentActor, RestartBudget, RestartPolicy, ShutdownPolicy, SupervisedChild, SupervisorError};
pub use system::{ScheduleAnchor, UniverseConfig, UniverseError};
pub use util::{ActorId, ActorPath, MessageId};

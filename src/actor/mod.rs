//! Actor system: lifecycle-driven actors attached to a hierarchical bus.
//!
//! - [`Actor`] - the lifecycle callback contract every actor implements
//! - [`ActorContext`] - identity, capabilities, and bus access
//! - [`ActorKernel`] - drives an `Actor` through its state machine and
//!   user mailbox
//! - [`CapabilitySet`]/[`Capability`] - capability negotiation bitset
//! - [`ActorLifecycle`]/[`ActorState`] - the kernel's state machine
//!
//! # Design Philosophy
//!
//! - **Zero-cost abstractions**: generic constraints instead of trait
//!   objects, carried over from the mailbox and broker modules.
//! - **Never crashes the universe**: lifecycle callbacks return `bool`
//!   rather than propagating panics; a `false` return is a controlled
//!   rejection, not an unwind.

pub mod capability;
pub mod context;
pub mod kernel;
pub mod lifecycle;
pub mod traits;

pub use capability::{Capability, CapabilitySet};
pub use context::ActorContext;
pub use kernel::{ActorKernel, KernelCommand, KernelOutcome};
pub use lifecycle::{ActorLifecycle, ActorState};
pub use traits::Actor;

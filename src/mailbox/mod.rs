//! Per-actor mailboxes: every actor kernel reads its user messages from
//! exactly one of these (spec §4.5 — "each actor exposes a mailbox
//! receiving one message at a time").
//!
//! # Components
//!
//! - [`MailboxReceiver`] / [`MailboxSender`] - the send/recv contract a
//!   kernel and a bus subscription are generic over
//! - [`BoundedMailbox`] - fixed-capacity, backpressure-controlled
//! - [`UnboundedMailbox`] - unlimited capacity, for actors (e.g. the
//!   monitor's own control loop) that must never apply backpressure to
//!   a sender
//! - [`BackpressureStrategy`] - what a bounded mailbox does when full:
//!   block, drop, or error
//! - [`MetricsRecorder`] - per-mailbox send/recv/drop counters exposed
//!   for the TCP report stream and tests
//!
//! # Ordering
//!
//! Delivery is strictly arrival order (spec §5): these are backed by a
//! single `tokio::mpsc` channel per mailbox, so nothing here reorders
//! messages by [`MessagePriority`](crate::message::MessagePriority) —
//! priority only selects which [`BackpressureStrategy`] a full mailbox
//! falls back to, via [`BackpressureStrategy::for_priority`].
//!
//! # Choosing bounded vs. unbounded
//!
//! Bounded is the default for actors driven from the bus: a runaway
//! publisher should apply backpressure (or drop) rather than let one
//! slow subscriber's queue grow without limit. Unbounded exists for the
//! monitor and other system-internal control paths where every message
//! is small, infrequent, and must never be dropped or block the sender.
pub mod backpressure;
pub mod bounded;
pub mod metrics;
pub mod traits;
pub mod unbounded;

pub use backpressure::BackpressureStrategy;
pub use bounded::{BoundedMailbox, BoundedMailboxSender};
pub use metrics::{AtomicMetrics, MetricsRecorder};
pub use traits::{MailboxCapacity, MailboxError, MailboxReceiver, MailboxSender, TryRecvError};
pub use unbounded::{UnboundedMailbox, UnboundedMailboxSender};

//! Mailbox metrics recording and tracking subsystem.
//!
//! Every mailbox exposes send/receive/drop/in-flight counters through a
//! pluggable [`MetricsRecorder`], which the monitor's TCP report stream
//! (spec §4.8/§4.9) reads when it snapshots an actor's queue depth
//! alongside its heartbeat latency.
//!
//! # Design
//!
//! - `MetricsRecorder` trait: interface for recording metrics
//! - `AtomicMetrics`: the lock-free implementation every mailbox uses by
//!   default
//!
//! # Architecture
//!
//! Generic constraints (`R: MetricsRecorder`) are used instead of trait
//! objects (`dyn MetricsRecorder`) for zero-cost abstraction:
//! - `BoundedMailbox<M: Message, R: MetricsRecorder>`
//! - `UnboundedMailbox<M: Message, R: MetricsRecorder>`
//!
//! This allows compile-time selection of metrics implementation without
//! runtime dispatch overhead.
//!
//! # Example
//!
//! ```rust
//! use universe_rt::mailbox::{BoundedMailbox, AtomicMetrics};
//!
//! # #[derive(Debug, Clone)]
//! # struct LapUpdate { lap: u32 }
//! # impl universe_rt::message::Message for LapUpdate {
//! #     const MESSAGE_TYPE: &'static str = "lap_update";
//! # }
//! # async fn example() {
//! // Uses AtomicMetrics by default
//! let (mailbox, sender) = BoundedMailbox::<LapUpdate, _>::new(100);
//!
//! // Or inject a custom recorder
//! let metrics = AtomicMetrics::default();
//! let (mailbox, sender) = BoundedMailbox::<LapUpdate, _>::with_metrics(100, metrics);
//! # }
//! ```

mod atomic;
mod recorder;

pub use atomic::AtomicMetrics;
pub use recorder::MetricsRecorder;

//! Message system with zero-cost abstractions
//!
//! Every payload an actor sends or receives — a bus event, a kernel
//! control reply, a federation command — is wrapped in a
//! [`MessageEnvelope`] and identified by its [`Message::MESSAGE_TYPE`],
//! letting the codec and the bus route on a stable string tag instead
//! of a runtime type check.

pub mod envelope;
pub mod traits;

pub use envelope::MessageEnvelope;
pub use traits::{Message, MessagePriority};

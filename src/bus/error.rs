//! Bus error types.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
use crate::util::ActorPath;

/// Failure modes for hierarchical pub/sub operations.
#[derive(Debug, Error)]
pub enum BusError {
    /// The target subscriber's mailbox has been closed.
    #[error("mailbox closed for subscriber: {0}")]
    MailboxClosed(ActorPath),

    /// A publish was attempted on a channel name that is not well-formed
    /// (empty, or containing an internal wildcard).
    #[error("invalid channel name: {0:?}")]
    InvalidChannel(String),

    /// An unsubscribe was attempted for a subscriber/channel pair that was
    /// never subscribed.
    #[error("no such subscription: {subscriber} on {channel:?}")]
    NotSubscribed {
        /// The subscriber path.
        subscriber: ActorPath,
        /// The channel (or pattern) name.
        channel: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_channel_message() {
        let err = BusError::InvalidChannel(String::new());
        assert!(err.to_string().contains("invalid channel"));
    }
}

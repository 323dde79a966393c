//! Wire codec error types.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
// (none)

/// Failure modes for the binary wire codec.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The underlying buffer ran out of bytes before a value could be
    /// fully decoded.
    #[error("unexpected end of buffer: needed {needed} bytes, had {available}")]
    UnexpectedEof {
        /// Bytes required to complete the read.
        needed: usize,
        /// Bytes actually remaining in the buffer.
        available: usize,
    },

    /// A length-prefixed collection or string declared a size above the
    /// configured ceiling.
    #[error("collection size {size} exceeds maximum of {max}")]
    CollectionTooLarge {
        /// The declared size.
        size: usize,
        /// The configured ceiling.
        max: usize,
    },

    /// An embedded frame referenced a serializer id with no registered
    /// entry and no generic fallback available.
    #[error("no serializer registered for id {0}")]
    UnknownSerializer(i32),

    /// A serializer id collided with an existing entry and exhausted its
    /// salting budget.
    #[error("could not allocate a stable id for serializer {0:?} after salting")]
    IdAllocationExhausted(&'static str),

    /// A UTF-8 string field contained invalid byte sequences.
    #[error("invalid UTF-8 in string field: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// A boolean field held a byte other than `0` or `1`.
    #[error("invalid boolean byte: {0}")]
    InvalidBool(u8),

    /// A serializer-specific encode/decode failure, carried as an opaque
    /// message so the codec layer does not need to know about every
    /// payload type's own error enum.
    #[error("serializer {serializer} failed: {message}")]
    SerializerFailed {
        /// Name of the serializer that failed.
        serializer: &'static str,
        /// Human-readable failure detail.
        message: String,
    },
}

impl CodecError {
    /// True for errors caused by a truncated or malformed buffer, as
    /// opposed to a registry configuration problem.
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            CodecError::UnexpectedEof { .. }
                | CodecError::CollectionTooLarge { .. }
                | CodecError::InvalidUtf8(_)
                | CodecError::InvalidBool(_)
        )
    }
}

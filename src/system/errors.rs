//! Universe-level error taxonomy (spec §7).

// Layer 1: Standard library
use std::time::Duration;

// Layer 2: Third-party
use thiserror::Error;

// Layer 3: Internal
use crate::util::ActorPath;

/// Universe-wide errors surfaced from the lifecycle methods on [`Master`].
///
/// [`Master`]: crate::master::Master
#[derive(Error, Debug)]
pub enum UniverseError {
    /// An actor refused, threw, or timed out during Init. Non-optional
    /// actors abort the whole universe; optional actors are dropped with
    /// a warning instead.
    #[error("actor '{path}' failed to initialize: {reason}")]
    InitializationFailure { path: ActorPath, reason: String },

    /// An actor refused or timed out during Start.
    #[error("actor '{path}' failed to start: {reason}")]
    StartFailure { path: ActorPath, reason: String },

    /// An actor refused, failed, or timed out during Terminate. Does not
    /// abort the universe; the actor is retained in the unresponding list.
    #[error("actor '{path}' failed to terminate: {reason}")]
    TerminateFailure { path: ActorPath, reason: String },

    /// Remote master resolution failed: not found, rejected, or timed out.
    #[error("remote handshake with '{uri}' failed: {reason}")]
    RemoteHandshakeFailure { uri: String, reason: String },

    /// Unknown serializer id, manifest mismatch, or oversize collection.
    /// The receiver drops the message and logs; this never reaches the
    /// kernel as a crash.
    #[error("serialization failure: {0}")]
    SerializationFailure(String),

    /// A synchronous ask exceeded its configured timeout.
    #[error("operation on '{path}' timed out after {timeout:?}")]
    Timeout { path: ActorPath, timeout: Duration },

    /// Universe is shutting down; cannot accept new operations.
    #[error("universe shutdown in progress")]
    ShuttingDown,

    /// Configuration failed validation.
    #[error("configuration error: {0}")]
    ConfigError(String),
}

impl UniverseError {
    /// Whether this failure should abort universe creation/start outright,
    /// as opposed to being logged and the offending actor dropped.
    pub fn aborts_universe(&self, optional: bool) -> bool {
        if optional {
            return false;
        }
        matches!(
            self,
            UniverseError::InitializationFailure { .. }
                | UniverseError::StartFailure { .. }
                | UniverseError::RemoteHandshakeFailure { .. }
        )
    }

    /// Terminate failures never abort the universe (spec §7): the actor is
    /// retained and the rest of the tree keeps shutting down.
    pub fn is_terminate_failure(&self) -> bool {
        matches!(self, UniverseError::TerminateFailure { .. })
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, UniverseError::Timeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path() -> ActorPath {
        ActorPath::root("race").child("a")
    }

    #[test]
    fn test_initialization_failure_display() {
        let err = UniverseError::InitializationFailure {
            path: path(),
            reason: "refused".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("failed to initialize"));
        assert!(msg.contains("refused"));
    }

    #[test]
    fn test_non_optional_failures_abort_universe() {
        let err = UniverseError::InitializationFailure {
            path: path(),
            reason: "x".to_string(),
        };
        assert!(err.aborts_universe(false));
        assert!(!err.aborts_universe(true));
    }

    #[test]
    fn test_terminate_failure_never_aborts() {
        let err = UniverseError::TerminateFailure {
            path: path(),
            reason: "no reply".to_string(),
        };
        assert!(!err.aborts_universe(false));
        assert!(err.is_terminate_failure());
    }

    #[test]
    fn test_timeout_classification() {
        let err = UniverseError::Timeout {
            path: path(),
            timeout: Duration::from_millis(500),
        };
        assert!(err.is_timeout());
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn test_shutting_down_display() {
        assert_eq!(
            UniverseError::ShuttingDown.to_string(),
            "universe shutdown in progress"
        );
    }

    #[test]
    fn test_config_error_display() {
        let err = UniverseError::ConfigError("invalid timeout".to_string());
        assert!(err.to_string().contains("invalid timeout"));
    }
}

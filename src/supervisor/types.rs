//! Core supervisor types: child identity, restart policy, shutdown policy.

// Layer 1: Standard library imports
use std::fmt;
use std::time::Duration;

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Layer 3: Internal module imports
// (none)

/// Unique identifier for a supervised child.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChildId(Uuid);

impl ChildId {
    /// Create a new unique child id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ChildId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ChildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for ChildId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Whether a terminated child should be restarted.
///
/// The runtime supervises with a single, one-for-one strategy: each
/// child is restarted independently of its siblings, bounded by
/// [`RestartBudget`] (spec §4.4 — no one-for-all/rest-for-one variants).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RestartPolicy {
    /// Always restart on unexpected termination.
    Permanent,
    /// Restart only if the child terminated abnormally.
    Transient,
    /// Never restart.
    Temporary,
}

/// How long a supervisor waits for a child to acknowledge termination
/// before declaring a timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShutdownPolicy {
    /// Wait up to the given duration for a graceful `Terminated` reply.
    Graceful(Duration),
    /// Do not wait; terminate the mailbox immediately.
    Immediate,
}

/// Bounds how many restarts a single child may accumulate within a
/// sliding window before the supervisor gives up and escalates (spec
/// §4.4: bounded restarts, default ≤10/min).
#[derive(Debug, Clone, Copy)]
pub struct RestartBudget {
    /// Maximum restarts allowed within `window`.
    pub max_restarts: u32,
    /// The sliding window restarts are counted over.
    pub window: Duration,
}

impl Default for RestartBudget {
    fn default() -> Self {
        Self {
            max_restarts: 10,
            window: Duration::from_secs(60),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_id_uniqueness() {
        assert_ne!(ChildId::new(), ChildId::new());
    }

    #[test]
    fn test_default_restart_budget() {
        let budget = RestartBudget::default();
        assert_eq!(budget.max_restarts, 10);
        assert_eq!(budget.window, Duration::from_secs(60));
    }
}

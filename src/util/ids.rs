//! Identifiers and hierarchical addressing for actors and messages.

// Layer 1: Standard library imports
use std::fmt::{self, Display};

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Layer 3: Internal module imports
// (none)

/// Unique identifier for actors in the system.
///
/// # Example
/// ```rust
/// use universe_rt::util::ActorId;
///
/// let id1 = ActorId::new();
/// let id2 = ActorId::new();
/// assert_ne!(id1, id2); // Globally unique
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(Uuid);

impl ActorId {
    /// Generate a new random ActorId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an ActorId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ActorId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for messages in the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(Uuid);

impl MessageId {
    /// Generate a new random MessageId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable, hierarchical path identifying an actor for its entire lifetime.
///
/// Rendered as `/universe/parent/.../name`. A path is built incrementally
/// as actors are created under a parent (`ActorPath::child`), so the
/// segment list always mirrors the actor's position in the supervision
/// tree at creation time. Paths never change after creation (spec §3).
///
/// # Example
/// ```rust
/// use universe_rt::util::ActorPath;
///
/// let universe = ActorPath::root("race");
/// let parent = universe.child("flight_tracker");
/// let child = parent.child("geo_filter");
///
/// assert_eq!(child.to_string(), "/race/flight_tracker/geo_filter");
/// assert_eq!(child.name(), "geo_filter");
/// assert_eq!(child.parent(), Some(parent));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorPath {
    segments: Vec<String>,
    /// One identity per segment, so that `parent()` can recover the actual
    /// ancestor identity rather than reusing the child's own id.
    ids: Vec<ActorId>,
}

impl ActorPath {
    /// Create a root path for a universe (the first segment).
    pub fn root(universe_name: impl Into<String>) -> Self {
        Self {
            segments: vec![universe_name.into()],
            ids: vec![ActorId::new()],
        }
    }

    /// Derive a child path one level below this one.
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.into());
        let mut ids = self.ids.clone();
        ids.push(ActorId::new());
        Self { segments, ids }
    }

    /// The actor's monotonically-assigned mailbox identity.
    pub fn id(&self) -> &ActorId {
        // Invariant: `ids.len() == segments.len()` and both are non-empty.
        self.ids.last().unwrap_or(&self.ids[0])
    }

    /// The last path segment (this actor's own name).
    pub fn name(&self) -> &str {
        // A path always has at least the universe segment.
        self.segments.last().map(String::as_str).unwrap_or("")
    }

    /// The parent path, or `None` for a universe root.
    pub fn parent(&self) -> Option<ActorPath> {
        if self.segments.len() <= 1 {
            return None;
        }
        let cut = self.segments.len() - 1;
        Some(Self {
            segments: self.segments[..cut].to_vec(),
            ids: self.ids[..cut].to_vec(),
        })
    }

    /// The universe this path belongs to (its first segment).
    pub fn universe(&self) -> &str {
        self.segments.first().map(String::as_str).unwrap_or("")
    }

    /// Depth of this path (1 for a universe root).
    pub fn depth(&self) -> usize {
        self.segments.len()
    }
}

impl Display for ActorPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.segments.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_id_creation() {
        let id1 = ActorId::new();
        let id2 = ActorId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_message_id_creation() {
        let id1 = MessageId::new();
        let id2 = MessageId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_root_path_display() {
        let path = ActorPath::root("race");
        assert_eq!(path.to_string(), "/race");
        assert_eq!(path.name(), "race");
        assert_eq!(path.parent(), None);
        assert_eq!(path.depth(), 1);
    }

    #[test]
    fn test_child_path_display() {
        let universe = ActorPath::root("race");
        let parent = universe.child("flight_tracker");
        let child = parent.child("geo_filter");

        assert_eq!(child.to_string(), "/race/flight_tracker/geo_filter");
        assert_eq!(child.name(), "geo_filter");
        assert_eq!(child.universe(), "race");
        assert_eq!(child.depth(), 3);
    }

    #[test]
    fn test_parent_round_trip() {
        let universe = ActorPath::root("race");
        let parent = universe.child("flight_tracker");
        let child = parent.child("geo_filter");

        assert_eq!(child.parent(), Some(parent.clone()));
        assert_eq!(parent.parent(), Some(universe));
    }

    #[test]
    fn test_paths_are_stable_identities() {
        let universe = ActorPath::root("race");
        let a = universe.child("a");
        let b = universe.child("a");
        // Same rendered path, but distinct actor identities.
        assert_eq!(a.to_string(), b.to_string());
        assert_ne!(a.id(), b.id());
    }
}

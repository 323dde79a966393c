//! Actor capability negotiation bitset.
//!
//! An actor advertises a fixed set of capabilities that govern what the
//! runtime is allowed to ask of it: whether it is optional to the
//! universe, whether it starts automatically, and whether it participates
//! in simulation-time control (spec §3, §4.9).

// Layer 1: Standard library imports
use std::ops::{BitAnd, BitOr};

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};

// Layer 3: Internal module imports
// (none)

/// A single named capability, represented as a bit position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u64)]
pub enum Capability {
    /// The universe can finish initialization even if this actor fails.
    IsOptional = 1 << 0,
    /// The actor starts without an explicit start request.
    IsAutomatic = 1 << 1,
    /// The actor accepts simulation-time updates.
    SupportsSimTime = 1 << 2,
    /// The actor accepts a simulation-clock reset.
    SupportsSimTimeReset = 1 << 3,
    /// The actor accepts pause/resume requests.
    SupportsPauseResume = 1 << 4,
    /// The actor accepts discrete (event-driven) time advancement.
    SupportsDiscreteTime = 1 << 5,
}

/// A set of [`Capability`] flags packed into a `u64` bitset.
///
/// # Example
/// ```rust
/// use universe_rt::actor::{Capability, CapabilitySet};
///
/// let caps = CapabilitySet::new()
///     .add(Capability::SupportsSimTime)
///     .add(Capability::SupportsPauseResume);
///
/// assert!(caps.has(Capability::SupportsSimTime));
/// assert!(!caps.has(Capability::IsOptional));
///
/// let other = CapabilitySet::new().add(Capability::SupportsSimTime);
/// let common = caps.intersect(other);
/// assert!(common.has(Capability::SupportsSimTime));
/// assert!(!common.has(Capability::SupportsPauseResume));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CapabilitySet(u64);

impl CapabilitySet {
    /// An empty capability set.
    pub fn new() -> Self {
        Self(0)
    }

    /// Return a new set with `cap` added.
    pub fn add(self, cap: Capability) -> Self {
        Self(self.0 | cap as u64)
    }

    /// Return a new set with `cap` removed.
    pub fn remove(self, cap: Capability) -> Self {
        Self(self.0 & !(cap as u64))
    }

    /// True if `cap` is present in this set.
    pub fn has(&self, cap: Capability) -> bool {
        self.0 & (cap as u64) != 0
    }

    /// The union of this set and `other`.
    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// The intersection of this set and `other`, i.e. capabilities both
    /// sides agree on (spec §4.9: common-capabilities negotiation).
    pub fn intersect(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    /// Raw bitset value, for wire encoding.
    pub fn bits(&self) -> u64 {
        self.0
    }

    /// Reconstruct a set from a raw bitset value.
    pub fn from_bits(bits: u64) -> Self {
        Self(bits)
    }
}

impl BitOr for CapabilitySet {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitAnd for CapabilitySet {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        self.intersect(rhs)
    }
}

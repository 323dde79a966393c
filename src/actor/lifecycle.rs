//! Actor kernel lifecycle state machine.
//!
//! Unlike a plain start/stop supervision lifecycle, the kernel's state
//! machine models the synchronous phases a universe's Master drives every
//! actor through: initialize, start, optionally pause/resume any number
//! of times, then terminate (spec §4.5, §4.9).

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use chrono::{DateTime, Utc}; // §3.2 MANDATORY

// Layer 3: Internal module imports
// (none)

/// Kernel lifecycle state.
///
/// # State Transitions
///
/// ```text
/// Initializing -> Initialized -> Started -> Running <-> Paused
///       |              |            |          |
///       v              v            v          v
///   Terminating -> Terminated   Terminating -> Terminating
/// ```
///
/// Before `Initialized` only `Initialize` and `Terminate` requests are
/// accepted (spec §4.5: pre-init gating).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorState {
    /// `onInitialize` is in progress.
    Initializing,
    /// `onInitialize` succeeded; waiting for a start request.
    Initialized,
    /// `onStart` is in progress.
    Started,
    /// The actor is running and dispatching user messages.
    Running,
    /// The actor is paused; only system messages are dispatched.
    Paused,
    /// `onTerminate` is in progress.
    Terminating,
    /// The actor has fully shut down.
    Terminated,
}

impl Default for ActorState {
    fn default() -> Self {
        Self::Initializing
    }
}

impl ActorState {
    /// True while only `Initialize`/`Terminate` requests are accepted.
    pub fn is_pre_init(&self) -> bool {
        matches!(self, ActorState::Initializing)
    }

    /// True if this state accepts user-handler dispatch.
    pub fn accepts_user_messages(&self) -> bool {
        matches!(self, ActorState::Running)
    }

    /// True if no further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ActorState::Terminated)
    }
}

/// Lifecycle tracker: current state, last transition time, and restart
/// count (kept for parity with the supervisor's restart-budget tracking).
#[derive(Debug, Clone)]
pub struct ActorLifecycle {
    state: ActorState,
    last_state_change: DateTime<Utc>,
    restart_count: u32,
}

impl ActorLifecycle {
    /// Create a new lifecycle tracker in `Initializing` state.
    pub fn new() -> Self {
        Self {
            state: ActorState::Initializing,
            last_state_change: Utc::now(), // §3.2
            restart_count: 0,
        }
    }

    /// Attempt a transition, rejecting moves that violate pre-init
    /// gating or leave a terminal state. Returns `false` (and leaves the
    /// state untouched) when the move is illegal.
    pub fn transition_to(&mut self, new_state: ActorState) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        if self.state.is_pre_init()
            && !matches!(new_state, ActorState::Initialized | ActorState::Terminating)
        {
            return false;
        }
        if new_state == ActorState::Initializing && self.state != ActorState::Initializing {
            self.restart_count += 1;
        }
        self.state = new_state;
        self.last_state_change = Utc::now(); // §3.2
        true
    }

    /// Current state.
    pub fn state(&self) -> ActorState {
        self.state
    }

    /// Timestamp of the most recent transition.
    pub fn last_state_change(&self) -> DateTime<Utc> {
        self.last_state_change
    }

    /// Number of times this actor has re-entered `Initializing`.
    pub fn restart_count(&self) -> u32 {
        self.restart_count
    }

    /// True if the kernel is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// True if the kernel is running and dispatches user messages.
    pub fn is_running(&self) -> bool {
        self.state.accepts_user_messages()
    }
}

impl Default for ActorLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

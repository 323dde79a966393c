//! Simulation clock with scale factor, stop/resume, and an optional end time.
//!
//! A [`SimClock`] advances simulation time from wall-clock time scaled by a
//! `time_scale` factor. It can be stopped (freezing simulation time at its
//! last value) and resumed, and it can carry an optional end instant used by
//! callers to detect "the run is over" (spec §4.1).
//!
//! # Design
//!
//! All mutators (`reset`, `stop`, `resume`) are serialized through a single
//! [`parking_lot::Mutex`] guarding [`ClockState`]; `now()` only needs a brief
//! lock to snapshot the state, so readers never wait behind another reader
//! (spec §4.1, §5: "readers are lock-free").

// Layer 1: Standard library imports
use std::time::{SystemTime, UNIX_EPOCH};

// Layer 2: Third-party crate imports
use parking_lot::Mutex;

// Layer 3: Internal module imports
// (none)

/// Simulation time instant: epoch milliseconds (spec §6 wire encoding).
pub type Instant = i64;

#[derive(Debug, Clone, Copy)]
struct ClockState {
    /// Simulation instant corresponding to `wall_base` (or the frozen
    /// instant, while stopped).
    base_instant: Instant,
    /// Wall-clock epoch milliseconds at which `base_instant` was anchored.
    wall_base: i64,
    time_scale: f64,
    running: bool,
    end_instant: Option<Instant>,
}

fn wall_now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// A monotonically advancing simulation clock with a configurable
/// wall-to-sim time scale (spec §4.1).
///
/// # Example
/// ```rust
/// use universe_rt::clock::SimClock;
///
/// let clock = SimClock::new(0, 1.0);
/// assert!(clock.now() >= 0);
///
/// clock.stop();
/// let frozen = clock.now();
/// assert_eq!(clock.now(), frozen); // time no longer advances
/// ```
#[derive(Debug)]
pub struct SimClock {
    state: Mutex<ClockState>,
}

impl SimClock {
    /// Create a new clock anchored at `base_instant` with the given
    /// wall-to-sim `time_scale`. `time_scale` must be strictly positive
    /// (spec §3 invariant); non-positive values are clamped to `1.0`.
    pub fn new(base_instant: Instant, time_scale: f64) -> Self {
        let scale = if time_scale > 0.0 { time_scale } else { 1.0 };
        Self {
            state: Mutex::new(ClockState {
                base_instant,
                wall_base: wall_now_millis(),
                time_scale: scale,
                running: true,
                end_instant: None,
            }),
        }
    }

    /// Current simulation instant.
    ///
    /// If running: `base + (wallNow - wallBase) * timeScale`.
    /// If stopped: the instant captured when `stop()` was called.
    pub fn now(&self) -> Instant {
        let s = self.state.lock();
        if s.running {
            let elapsed_wall = (wall_now_millis() - s.wall_base) as f64;
            s.base_instant + (elapsed_wall * s.time_scale) as i64
        } else {
            s.base_instant
        }
    }

    /// Atomically replace the clock's base instant and scale. Does not
    /// itself publish any event — the caller (the universe's Master) emits
    /// `ClockReset` (spec §4.1, §4.9).
    pub fn reset(&self, instant: Instant, scale: f64) {
        let mut s = self.state.lock();
        s.base_instant = instant;
        s.wall_base = wall_now_millis();
        s.time_scale = if scale > 0.0 { scale } else { 1.0 };
    }

    /// Freeze simulation time at its current value. Idempotent.
    pub fn stop(&self) {
        let mut s = self.state.lock();
        if s.running {
            let now = if s.running {
                let elapsed_wall = (wall_now_millis() - s.wall_base) as f64;
                s.base_instant + (elapsed_wall * s.time_scale) as i64
            } else {
                s.base_instant
            };
            s.base_instant = now;
            s.running = false;
        }
    }

    /// Continue advancing simulation time from its frozen value. Idempotent.
    pub fn resume(&self) {
        let mut s = self.state.lock();
        if !s.running {
            s.wall_base = wall_now_millis();
            s.running = true;
        }
    }

    /// Whether the clock is currently advancing.
    pub fn is_running(&self) -> bool {
        self.state.lock().running
    }

    /// Current wall-to-sim time scale.
    pub fn time_scale(&self) -> f64 {
        self.state.lock().time_scale
    }

    /// Set (or clear) the end instant used by `exceeds_end`.
    pub fn set_end_instant(&self, end: Option<Instant>) {
        self.state.lock().end_instant = end;
    }

    /// True iff an end instant is configured and `instant` is past it.
    pub fn exceeds_end(&self, instant: Instant) -> bool {
        self.state
            .lock()
            .end_instant
            .is_some_and(|end| instant > end)
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new(wall_now_millis(), 1.0)
    }
}

//! Process-wide runtime context shared by every universe in this process
//! (spec §4.10, §9: "model as an injected process context... do not rely
//! on default initialization order").
//!
//! [`UniverseRuntime`] is constructed explicitly by the embedding process
//! and threaded through wherever a universe needs to register itself or
//! observe the process-wide live set — it is never a lazily-initialized
//! global.

// Layer 1: Standard library imports
use std::sync::atomic::{AtomicBool, Ordering};

// Layer 2: Third-party crate imports
use dashmap::DashSet;
use tokio::sync::broadcast;
use tracing::info;

// Layer 3: Internal module imports
use crate::util::ActorPath;

/// Event broadcast to termination listeners when a universe finishes.
#[derive(Debug, Clone)]
pub struct UniverseTerminated {
    pub universe: ActorPath,
}

/// Tracks every live universe in this process and whether the process
/// should exit when the last one terminates.
pub struct UniverseRuntime {
    live: DashSet<ActorPath>,
    embedded: AtomicBool,
    terminations: broadcast::Sender<UniverseTerminated>,
}

impl UniverseRuntime {
    /// Create a runtime context. `embedded` suppresses process-exit
    /// behavior for the last universe terminating (spec §4.10: "for test
    /// harnesses").
    pub fn new(embedded: bool) -> Self {
        let (tx, _rx) = broadcast::channel(32);
        Self {
            live: DashSet::new(),
            embedded: AtomicBool::new(embedded),
            terminations: tx,
        }
    }

    /// Register `universe` as live. Call at the end of a successful
    /// Create phase.
    pub fn register(&self, universe: ActorPath) {
        self.live.insert(universe);
    }

    /// Remove `universe` from the live set, broadcasting to any
    /// termination listeners. Returns `true` if this was the last live
    /// universe and embedded mode is off, signaling the process may now
    /// exit.
    pub fn deregister(&self, universe: ActorPath) -> bool {
        self.live.remove(&universe);
        let _ = self.terminations.send(UniverseTerminated {
            universe: universe.clone(),
        });
        let should_exit = self.live.is_empty() && !self.is_embedded();
        if should_exit {
            info!("last universe terminated, process may exit");
        }
        should_exit
    }

    pub fn is_embedded(&self) -> bool {
        self.embedded.load(Ordering::SeqCst)
    }

    pub fn set_embedded(&self, embedded: bool) {
        self.embedded.store(embedded, Ordering::SeqCst);
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn is_live(&self, universe: &ActorPath) -> bool {
        self.live.contains(universe)
    }

    /// Subscribe to universe-termination events.
    pub fn subscribe_terminations(&self) -> broadcast::Receiver<UniverseTerminated> {
        self.terminations.subscribe()
    }
}

impl Default for UniverseRuntime {
    fn default() -> Self {
        Self::new(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn universe(name: &str) -> ActorPath {
        ActorPath::root(name)
    }

    #[test]
    fn test_register_and_deregister_tracks_live_count() {
        let runtime = UniverseRuntime::default();
        runtime.register(universe("a"));
        runtime.register(universe("b"));
        assert_eq!(runtime.live_count(), 2);

        runtime.deregister(universe("a"));
        assert_eq!(runtime.live_count(), 1);
        assert!(!runtime.is_live(&universe("a")));
        assert!(runtime.is_live(&universe("b")));
    }

    #[test]
    fn test_last_universe_signals_exit_unless_embedded() {
        let runtime = UniverseRuntime::new(false);
        runtime.register(universe("a"));
        assert!(runtime.deregister(universe("a")));
    }

    #[test]
    fn test_embedded_mode_suppresses_exit_signal() {
        let runtime = UniverseRuntime::new(true);
        runtime.register(universe("a"));
        assert!(!runtime.deregister(universe("a")));
    }

    #[tokio::test]
    async fn test_termination_listener_receives_event() {
        let runtime = UniverseRuntime::default();
        let mut rx = runtime.subscribe_terminations();
        runtime.register(universe("a"));
        runtime.deregister(universe("a"));

        let event = rx.recv().await.unwrap();
        assert_eq!(event.universe, universe("a"));
    }
}

//! Heartbeat monitor: periodic liveness polling and latency observability
//! over the whole actor tree (spec §4.8).
//!
//! Registration happens out-of-band from the mailbox: every actor that
//! wants to be monitored is given a [`MonitorRegister`] carrying its
//! parent's query path, replies [`MonitorRegistered`], and the monitor
//! accumulates a flat table keyed by `ActorPath`. This stays independent
//! of the user message type `M`, since liveness checks dispatch directly
//! on the kernel's control channel (`KernelCommand::Ping`). The recursive
//! parent-to-children forwarding that walks a supervision tree and
//! inserts each actor's entry lives in `supervisor::SupervisedChild::
//! register_with_monitor`, since the monitor itself has no notion of
//! child ordering — it only ever sees the flat result of that walk.

pub mod stats;
pub mod tcp;

// Layer 1: Standard library imports
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

// Layer 2: Third-party crate imports
use dashmap::DashMap;
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;
use tracing::warn;

// Layer 3: Internal module imports
pub use stats::LatencyStats;
use crate::actor::KernelCommand;
use crate::util::ActorPath;

struct Entry {
    control: mpsc::Sender<KernelCommand>,
    level: usize,
    last_heartbeat: u64,
    unresponsive: bool,
    stats: LatencyStats,
    msg_count: u64,
}

/// A monitored actor's observable state, as rendered to a report
/// consumer (spec's `ActorStats`).
#[derive(Debug, Clone)]
pub struct ActorStats {
    pub path: ActorPath,
    pub level: usize,
    pub last_heartbeat: u64,
    pub unresponsive: bool,
    pub latency: LatencyStats,
    pub msg_count: u64,
}

/// Outcome of one monitor tick.
#[derive(Debug, Default)]
pub struct TickReport {
    pub pinged: usize,
    pub newly_unresponsive: Vec<ActorPath>,
}

/// Sent to an actor (conceptually — in practice to whatever in the
/// supervision tree registers on its behalf) asking it to register for
/// monitoring. `registrar` is the monitor's own path, used so a reply
/// can be routed back to the right monitor if more than one exists;
/// `parent_query_path` is the chain of ancestor paths accumulated as the
/// registration is forwarded down from the root.
#[derive(Debug, Clone)]
pub struct MonitorRegister {
    pub registrar: ActorPath,
    pub parent_query_path: Vec<ActorPath>,
}

/// Reply to [`MonitorRegister`]: `own_query_path` is `parent_query_path`
/// with this actor's own path appended, i.e. the full ancestor chain the
/// monitor now has an entry for.
#[derive(Debug, Clone)]
pub struct MonitorRegistered {
    pub own_query_path: Vec<ActorPath>,
}

/// Tracks every registered actor's liveness and ping latency, driving the
/// heartbeat/pong protocol through each actor kernel's control channel.
#[derive(Default)]
pub struct Monitor {
    entries: DashMap<ActorPath, Entry>,
    heartbeat: AtomicU64,
}

impl Monitor {
    /// Create an empty monitor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `path` for monitoring at supervision-tree `level`
    /// (spec: parents forward registration recursively to children).
    pub fn register(&self, path: ActorPath, control: mpsc::Sender<KernelCommand>, level: usize) {
        self.entries.insert(
            path,
            Entry {
                control,
                level,
                last_heartbeat: 0,
                unresponsive: false,
                stats: LatencyStats::default(),
                msg_count: 0,
            },
        );
    }

    /// Remove a monitored actor, e.g. after it terminates.
    pub fn unregister(&self, path: &ActorPath) {
        self.entries.remove(path);
    }

    /// Handle one [`MonitorRegister`] for a single actor: insert its
    /// entry at `parent_query_path.len()` levels deep and reply with the
    /// query path extended by its own `path` (spec §4.8 registration
    /// protocol, one hop — the recursive walk down the supervision tree
    /// lives in `supervisor::SupervisedChild::register_with_monitor`).
    pub fn handle_register(
        &self,
        path: ActorPath,
        control: mpsc::Sender<KernelCommand>,
        parent_query_path: &[ActorPath],
    ) -> MonitorRegistered {
        let level = parent_query_path.len();
        let mut own_query_path = parent_query_path.to_vec();
        own_query_path.push(path.clone());
        self.register(path, control, level);
        MonitorRegistered { own_query_path }
    }

    /// Current heartbeat counter value.
    pub fn current_heartbeat(&self) -> u64 {
        self.heartbeat.load(Ordering::SeqCst)
    }

    /// Run one monitor tick: mark any actor that did not answer the
    /// previous ping as unresponsive, then send the next `Ping` to every
    /// remaining responsive actor and wait up to `ask_timeout` for each
    /// pong (spec §4.8).
    pub async fn tick(&self, ask_timeout: Duration) -> TickReport {
        let heartbeat = self.heartbeat.fetch_add(1, Ordering::SeqCst) + 1;
        let mut report = TickReport::default();

        let paths: Vec<ActorPath> = self.entries.iter().map(|e| e.key().clone()).collect();
        for path in paths {
            let (control, previously_responsive) = match self.entries.get(&path) {
                Some(entry) => (entry.control.clone(), entry.last_heartbeat + 1 == heartbeat || heartbeat == 1),
                None => continue,
            };

            if !previously_responsive {
                if let Some(mut entry) = self.entries.get_mut(&path) {
                    if !entry.unresponsive {
                        entry.unresponsive = true;
                        report.newly_unresponsive.push(path.clone());
                        warn!(%path, "actor missed heartbeat, marked unresponsive");
                    }
                }
                continue;
            }

            let (reply, rx) = oneshot::channel();
            let sent_at = Instant::now();
            if control
                .send(KernelCommand::Ping {
                    nonce: heartbeat,
                    reply,
                })
                .await
                .is_err()
            {
                self.mark_unresponsive(&path, &mut report);
                continue;
            }
            report.pinged += 1;

            match tokio::time::timeout(ask_timeout, rx).await {
                Ok(Ok(echoed)) if echoed == heartbeat => {
                    let elapsed_ns = sent_at.elapsed().as_nanos().min(u64::MAX as u128) as u64;
                    self.record_pong(&path, heartbeat, elapsed_ns);
                }
                _ => self.mark_unresponsive(&path, &mut report),
            }
        }

        report
    }

    fn mark_unresponsive(&self, path: &ActorPath, report: &mut TickReport) {
        if let Some(mut entry) = self.entries.get_mut(path) {
            if !entry.unresponsive {
                entry.unresponsive = true;
                report.newly_unresponsive.push(path.clone());
            }
        }
    }

    fn record_pong(&self, path: &ActorPath, heartbeat: u64, elapsed_ns: u64) {
        if let Some(mut entry) = self.entries.get_mut(path) {
            // Invariant: a pong's heartbeat never exceeds the current one.
            entry.last_heartbeat = heartbeat;
            entry.stats.record(elapsed_ns);
            entry.msg_count += 1;
            entry.unresponsive = false;
        }
    }

    /// Snapshot of every monitored actor's current stats, for a report
    /// consumer (e.g. the TCP report stream).
    pub fn snapshot(&self) -> Vec<ActorStats> {
        self.entries
            .iter()
            .map(|e| ActorStats {
                path: e.key().clone(),
                level: e.value().level,
                last_heartbeat: e.value().last_heartbeat,
                unresponsive: e.value().unresponsive,
                latency: e.value().stats,
                msg_count: e.value().msg_count,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Message;

    #[derive(Debug, Clone)]
    struct Dummy;
    impl Message for Dummy {
        const MESSAGE_TYPE: &'static str = "dummy";
    }

    fn spawn_responder() -> (ActorPath, mpsc::Sender<KernelCommand>) {
        let (tx, mut rx) = mpsc::channel::<KernelCommand>(8);
        tokio::spawn(async move {
            while let Some(cmd) = rx.recv().await {
                if let KernelCommand::Ping { nonce, reply } = cmd {
                    let _ = reply.send(nonce);
                }
            }
        });
        (ActorPath::root("race").child("responder"), tx)
    }

    #[tokio::test]
    async fn test_tick_pings_and_records_latency() {
        let monitor = Monitor::new();
        let (path, control) = spawn_responder();
        monitor.register(path.clone(), control, 1);

        let report = monitor.tick(Duration::from_millis(100)).await;
        assert_eq!(report.pinged, 1);
        assert!(report.newly_unresponsive.is_empty());

        let snapshot = monitor.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert!(!snapshot[0].unresponsive);
        assert_eq!(snapshot[0].latency.count(), 1);
    }

    #[tokio::test]
    async fn test_unregistered_control_channel_marks_unresponsive() {
        let monitor = Monitor::new();
        let (tx, rx) = mpsc::channel::<KernelCommand>(8);
        drop(rx); // closed immediately, emulating a dead actor
        let path = ActorPath::root("race").child("dead");
        monitor.register(path.clone(), tx, 1);

        let report = monitor.tick(Duration::from_millis(50)).await;
        assert_eq!(report.newly_unresponsive, vec![path]);
    }

    #[test]
    fn test_handle_register_extends_query_path_and_sets_level() {
        let monitor = Monitor::new();
        let (path, control) = spawn_responder();
        let root = ActorPath::root("race");
        let parent = root.child("parent");
        let parent_query_path = vec![root.clone(), parent.clone()];

        let registered = monitor.handle_register(path.clone(), control, &parent_query_path);

        assert_eq!(registered.own_query_path, vec![root, parent, path]);
        let snapshot = monitor.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].level, parent_query_path.len());
    }

    #[tokio::test]
    async fn test_timeout_marks_unresponsive_without_panicking() {
        let monitor = Monitor::new();
        let (tx, mut rx) = mpsc::channel::<KernelCommand>(8);
        tokio::spawn(async move {
            // Never replies.
            let _ = rx.recv().await;
        });
        let path = ActorPath::root("race").child("slow");
        monitor.register(path.clone(), tx, 1);

        let report = monitor.tick(Duration::from_millis(20)).await;
        assert_eq!(report.newly_unresponsive, vec![path]);
    }
}

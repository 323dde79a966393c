//! Per-universe controller: drives the synchronous multi-phase lifecycle
//! and federates with satellite universes over remote masters (spec §4.9).
//!
//! The master is an ordinary supervising actor but never crashes: every
//! fallible step here returns a [`UniverseError`] instead of panicking or
//! propagating a panic from a callback, since "an unresponsive master is
//! the only failure an operator cannot recover from".

pub mod satellite;

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use tokio::sync::Mutex as AsyncMutex;
use tracing::{info, warn};
use uuid::Uuid;

// Layer 3: Internal module imports
pub use satellite::{HandshakeOutcome, RemoteSatellite};
use crate::actor::{Capability, CapabilitySet};
use crate::clock::{Instant, SimClock};
use crate::supervisor::{ParentActor, RestartBudget, RestartPolicy, ShutdownPolicy, SupervisedChild};
use crate::system::{UniverseConfig, UniverseError};
use crate::util::ActorPath;

/// Where a universe stands in its multi-phase lifecycle (spec §4.9).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MasterStatus {
    Created,
    Initializing,
    Initialized,
    Running,
    Paused,
    Terminated,
}

/// A single-use trust token handed to whoever is authorized to send the
/// next lifecycle/clock-altering message. Cleared on first verification,
/// matching the spec's "one-shot verifiable ask" trust model (spec §4.9:
/// "its sender is either the parent process's controller... or an
/// accepted remote master").
#[derive(Debug, Default)]
struct TrustGate {
    pending: Option<Uuid>,
}

impl TrustGate {
    fn issue(&mut self) -> Uuid {
        let token = Uuid::new_v4();
        self.pending = Some(token);
        token
    }

    fn verify(&mut self, token: Uuid) -> bool {
        if self.pending == Some(token) {
            self.pending = None;
            true
        } else {
            false
        }
    }
}

/// Drives one universe's lifecycle and federates it with satellite
/// universes. Local actors are tracked through the same [`ParentActor`]
/// used for ordinary supervision; satellites are tracked separately since
/// they speak the two-step remote handshake rather than the in-process
/// control channel.
pub struct Master {
    path: ActorPath,
    config: UniverseConfig,
    status: MasterStatus,
    local: ParentActor,
    satellites: Vec<Box<dyn RemoteSatellite>>,
    common_capabilities: Option<CapabilitySet>,
    trust: AsyncMutex<TrustGate>,
}

impl Master {
    /// Create a master for `path`, governing a fresh, empty universe.
    pub fn new(path: ActorPath, config: UniverseConfig) -> Self {
        let local = ParentActor::new(
            path.clone(),
            RestartBudget::default(),
            ShutdownPolicy::Graceful(config.terminate_timeout),
        );
        Self {
            path,
            config,
            status: MasterStatus::Created,
            local,
            satellites: Vec::new(),
            common_capabilities: None,
            trust: AsyncMutex::new(TrustGate::default()),
        }
    }

    pub fn path(&self) -> &ActorPath {
        &self.path
    }

    pub fn status(&self) -> MasterStatus {
        self.status
    }

    pub fn common_capabilities(&self) -> CapabilitySet {
        self.common_capabilities.unwrap_or_default()
    }

    /// Issue a trust token for the next lifecycle-altering request, e.g.
    /// handed to the embedding process's controller out of band.
    pub async fn issue_trust_token(&self) -> Uuid {
        self.trust.lock().await.issue()
    }

    /// Verify and consume a trust token. Every lifecycle/clock-altering
    /// call below requires one, unless the caller is an already-accepted
    /// remote master (checked separately by the caller via
    /// [`Self::satellites`]).
    pub async fn verify_trust_token(&self, token: Uuid) -> bool {
        self.trust.lock().await.verify(token)
    }

    // --- Create phase -----------------------------------------------

    /// Register a locally instantiated actor as a child of this universe.
    /// Part of the Create phase for actors without a `remote` URI.
    pub fn add_local_actor(&mut self, child: Box<dyn SupervisedChild>, policy: RestartPolicy) {
        self.local.add_child(child, policy);
    }

    /// Resolve a satellite universe through the two-step remote handshake
    /// (`Identify` then `RemoteConnectionRequest(self)`), and fold its
    /// accepted capabilities into the common set. Non-optional failures
    /// abort universe creation (spec §4.9, §7).
    pub async fn connect_satellite(
        &mut self,
        satellite: Box<dyn RemoteSatellite>,
        optional: bool,
    ) -> Result<(), UniverseError> {
        let uri = satellite.uri().to_string();
        if let Err(reason) = satellite.identify().await {
            return self.handshake_failed(uri, reason.to_string(), optional);
        }

        match satellite.request_connection(self.common_capabilities()).await {
            HandshakeOutcome::Accept(caps) => {
                self.fold_capabilities(caps);
                info!(%uri, "satellite accepted");
                self.satellites.push(satellite);
                Ok(())
            }
            HandshakeOutcome::Reject => {
                self.handshake_failed(uri, "rejected".to_string(), optional)
            }
            HandshakeOutcome::Timeout => {
                self.handshake_failed(uri, "timed out".to_string(), optional)
            }
        }
    }

    fn handshake_failed(&self, uri: String, reason: String, optional: bool) -> Result<(), UniverseError> {
        let err = UniverseError::RemoteHandshakeFailure { uri, reason };
        if optional {
            warn!(error = %err, "optional satellite handshake failed, continuing without it");
            Ok(())
        } else {
            Err(err)
        }
    }

    // --- Init phase ---------------------------------------------------

    /// Fold a locally or remotely initialized actor's reported
    /// capabilities into the universe's common-capabilities set (spec
    /// §4.9: "intersect reported capabilities into the universe's
    /// common-capabilities set").
    pub fn fold_capabilities(&mut self, caps: CapabilitySet) {
        self.common_capabilities = Some(match self.common_capabilities {
            Some(existing) => existing.intersect(caps),
            None => caps,
        });
    }

    /// Record that a non-optional actor failed to initialize: per spec
    /// §7, this aborts the whole universe.
    pub fn initialization_failed(&mut self, actor: ActorPath, reason: String, optional: bool) -> Result<(), UniverseError> {
        let err = UniverseError::InitializationFailure { path: actor, reason };
        if optional {
            warn!(error = %err, "optional actor failed to initialize, dropping it");
            Ok(())
        } else {
            self.status = MasterStatus::Initializing;
            Err(err)
        }
    }

    /// Mark the universe initialized once every non-optional actor has
    /// replied `Initialized`.
    pub fn mark_initialized(&mut self) {
        self.status = MasterStatus::Initialized;
    }

    // --- Start phase ----------------------------------------------------

    /// Resume the clock, start satellites, then ask local actors to start
    /// in creation order (spec §4.9).
    pub async fn start(&mut self, clock: &SimClock, sim_time: Instant, time_scale: f64) -> Result<(), UniverseError> {
        if self.status != MasterStatus::Initialized {
            return Err(UniverseError::StartFailure {
                path: self.path.clone(),
                reason: format!("universe not in Initialized state (was {:?})", self.status),
            });
        }
        clock.resume();
        for satellite in &self.satellites {
            satellite.start(sim_time, time_scale).await;
        }

        let started = self
            .local
            .ask_children(self.config.start_timeout, |_echo| true)
            .await;
        if started.len() != self.local.child_count() {
            return Err(UniverseError::StartFailure {
                path: self.path.clone(),
                reason: "one or more actors did not confirm start".to_string(),
            });
        }

        self.status = MasterStatus::Running;
        Ok(())
    }

    // --- Pause/Resume phase --------------------------------------------

    /// Pause the universe, gated on `supportsPauseResume` in the common
    /// capability set (spec §4.9).
    pub async fn pause(&mut self) -> Result<(), UniverseError> {
        self.require_pause_resume()?;
        let acked = self
            .local
            .ask_children(self.config.actor_timeout, |_| true)
            .await;
        if acked.len() == self.local.child_count() {
            self.status = MasterStatus::Paused;
            Ok(())
        } else {
            Err(UniverseError::Timeout {
                path: self.path.clone(),
                timeout: self.config.actor_timeout,
            })
        }
    }

    /// Resume a paused universe, same gating as [`Self::pause`].
    pub async fn resume(&mut self) -> Result<(), UniverseError> {
        self.require_pause_resume()?;
        let acked = self
            .local
            .ask_children(self.config.actor_timeout, |_| true)
            .await;
        if acked.len() == self.local.child_count() {
            self.status = MasterStatus::Running;
            Ok(())
        } else {
            Err(UniverseError::Timeout {
                path: self.path.clone(),
                timeout: self.config.actor_timeout,
            })
        }
    }

    fn require_pause_resume(&self) -> Result<(), UniverseError> {
        if self.common_capabilities().has(Capability::SupportsPauseResume) {
            Ok(())
        } else {
            Err(UniverseError::ConfigError(
                "pause/resume not supported by common capabilities".to_string(),
            ))
        }
    }

    // --- Clock reset -----------------------------------------------------

    /// Reset the simulation clock, gated on `supportsSimTimeReset` holding
    /// both locally and in the federated intersection (spec §4.9).
    pub async fn reset_clock(
        &self,
        clock: &SimClock,
        instant: Instant,
        scale: f64,
        local_supports_reset: bool,
    ) -> Result<(), UniverseError> {
        if !self.config.allow_future_reset && instant > clock.now() {
            return Err(UniverseError::ConfigError(
                "allow-future-reset is disabled".to_string(),
            ));
        }
        if !local_supports_reset || !self.common_capabilities().has(Capability::SupportsSimTimeReset) {
            warn!("clock reset rejected: SupportsSimTimeReset not held locally and federated");
            return Err(UniverseError::ConfigError(
                "SupportsSimTimeReset not held locally and federated".to_string(),
            ));
        }
        clock.reset(instant, scale);
        for satellite in &self.satellites {
            satellite.clock_reset(instant, scale).await;
        }
        Ok(())
    }

    // --- Terminate phase --------------------------------------------------

    /// Terminate local actors in reverse creation order, then satellites.
    /// Unresponsive actors are retained rather than blocking the rest
    /// (spec §4.9, §4.6); the universe reports success iff nothing is
    /// left behind.
    pub async fn terminate(&mut self) -> bool {
        self.local.terminate_all().await;
        for satellite in &self.satellites {
            if let Err(err) = satellite.terminate().await {
                warn!(error = %err, uri = satellite.uri(), "satellite failed to terminate");
            }
        }
        self.satellites.clear();
        self.status = MasterStatus::Terminated;
        self.local.child_count() == 0
    }

    pub fn satellite_count(&self) -> usize {
        self.satellites.len()
    }

    pub fn local_actor_count(&self) -> usize {
        self.local.child_count()
    }
}

impl std::fmt::Debug for Master {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Master")
            .field("path", &self.path)
            .field("status", &self.status)
            .field("local_actor_count", &self.local.child_count())
            .field("satellite_count", &self.satellites.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use tokio::sync::mpsc;

    use crate::actor::KernelCommand;
    use crate::supervisor::KernelChild;

    struct FakeSatellite {
        uri: String,
        outcome: HandshakeOutcome,
        terminated: Arc<AtomicBool>,
    }

    #[async_trait]
    impl RemoteSatellite for FakeSatellite {
        fn uri(&self) -> &str {
            &self.uri
        }
        async fn identify(&self) -> Result<(), UniverseError> {
            Ok(())
        }
        async fn request_connection(&self, _local_caps: CapabilitySet) -> HandshakeOutcome {
            self.outcome.clone()
        }
        async fn start(&self, _sim_time: Instant, _time_scale: f64) {}
        async fn clock_reset(&self, _instant: Instant, _scale: f64) {}
        async fn terminate(&self) -> Result<(), UniverseError> {
            self.terminated.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    fn master() -> Master {
        Master::new(ActorPath::root("race"), UniverseConfig::default())
    }

    #[tokio::test]
    async fn test_new_master_starts_created() {
        let m = master();
        assert_eq!(m.status(), MasterStatus::Created);
        assert_eq!(m.local_actor_count(), 0);
    }

    #[tokio::test]
    async fn test_trust_token_single_use() {
        let m = master();
        let token = m.issue_trust_token().await;
        assert!(m.verify_trust_token(token).await);
        assert!(!m.verify_trust_token(token).await);
    }

    #[tokio::test]
    async fn test_fold_capabilities_intersects_across_actors() {
        let mut m = master();
        m.fold_capabilities(CapabilitySet::new().add(Capability::SupportsSimTime).add(Capability::SupportsPauseResume));
        m.fold_capabilities(CapabilitySet::new().add(Capability::SupportsSimTime));
        assert!(m.common_capabilities().has(Capability::SupportsSimTime));
        assert!(!m.common_capabilities().has(Capability::SupportsPauseResume));
    }

    #[tokio::test]
    async fn test_optional_satellite_rejection_does_not_error() {
        let mut m = master();
        let satellite = Box::new(FakeSatellite {
            uri: "tcp://peer".to_string(),
            outcome: HandshakeOutcome::Reject,
            terminated: Arc::new(AtomicBool::new(false)),
        });
        assert!(m.connect_satellite(satellite, true).await.is_ok());
        assert_eq!(m.satellite_count(), 0);
    }

    #[tokio::test]
    async fn test_non_optional_satellite_rejection_errors() {
        let mut m = master();
        let satellite = Box::new(FakeSatellite {
            uri: "tcp://peer".to_string(),
            outcome: HandshakeOutcome::Timeout,
            terminated: Arc::new(AtomicBool::new(false)),
        });
        assert!(m.connect_satellite(satellite, false).await.is_err());
    }

    #[tokio::test]
    async fn test_accepted_satellite_folds_capabilities() {
        let mut m = master();
        let satellite = Box::new(FakeSatellite {
            uri: "tcp://peer".to_string(),
            outcome: HandshakeOutcome::Accept(CapabilitySet::new().add(Capability::SupportsSimTime)),
            terminated: Arc::new(AtomicBool::new(false)),
        });
        m.connect_satellite(satellite, false).await.unwrap();
        assert_eq!(m.satellite_count(), 1);
        assert!(m.common_capabilities().has(Capability::SupportsSimTime));
    }

    #[tokio::test]
    async fn test_pause_resume_rejected_without_capability() {
        let mut m = master();
        assert!(m.pause().await.is_err());
    }

    #[tokio::test]
    async fn test_clock_reset_rejected_without_capability() {
        let m = master();
        let clock = SimClock::new(0, 1.0);
        let result = m.reset_clock(&clock, 1_000, 1.0, true).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_clock_reset_accepted_with_capability_both_sides() {
        let mut m = master();
        m.fold_capabilities(CapabilitySet::new().add(Capability::SupportsSimTimeReset));
        let clock = SimClock::new(0, 1.0);
        m.reset_clock(&clock, 5_000, 2.0, true).await.unwrap();
        assert!(clock.now() >= 5_000);
    }

    #[tokio::test]
    async fn test_terminate_clears_satellites_and_reports_empty_tree() {
        let mut m = master();
        let terminated = Arc::new(AtomicBool::new(false));
        let satellite = Box::new(FakeSatellite {
            uri: "tcp://peer".to_string(),
            outcome: HandshakeOutcome::Accept(CapabilitySet::new()),
            terminated: terminated.clone(),
        });
        m.connect_satellite(satellite, false).await.unwrap();
        assert!(m.terminate().await);
        assert!(terminated.load(Ordering::SeqCst));
        assert_eq!(m.satellite_count(), 0);
    }

    #[tokio::test]
    async fn test_terminate_actually_terminates_local_actors() {
        let mut m = master();
        let (tx, mut rx) = mpsc::channel::<KernelCommand>(4);
        let exited = Arc::new(AtomicBool::new(false));
        let exited_inner = exited.clone();
        let join = tokio::spawn(async move {
            while let Some(cmd) = rx.recv().await {
                if matches!(cmd, KernelCommand::Terminate) {
                    break;
                }
            }
            exited_inner.store(true, Ordering::SeqCst);
        });
        let child = KernelChild::new(ActorPath::root("race").child("worker"), tx, join);
        m.add_local_actor(Box::new(child), RestartPolicy::Temporary);

        assert!(m.terminate().await);
        assert_eq!(m.local_actor_count(), 0);
        assert!(exited.load(Ordering::SeqCst), "local actor must actually receive Terminate");
    }
}

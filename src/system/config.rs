//! Universe-wide configuration, with sensible defaults (spec §6).

// Layer 1: Standard library
use std::time::Duration;

// Layer 2: Third-party
use serde::{Deserialize, Serialize};

// Layer 3: Internal
use crate::util::duration_serde;

/// Default mailbox capacity for bounded mailboxes.
pub const DEFAULT_MAILBOX_CAPACITY: usize = 1000;

/// Default duration for each synchronous lifecycle ask (create/init/start/
/// terminate/system/actor).
pub const DEFAULT_PHASE_TIMEOUT: Duration = Duration::from_secs(5);

/// Default heartbeat interval; 0 disables the monitor.
pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(1);

/// Default threshold above which a clock adjuster requests a reset.
pub const DEFAULT_MAX_CLOCK_DIFF: Duration = Duration::from_millis(250);

/// Default simulation-to-wall time ratio.
pub const DEFAULT_TIME_SCALE: f64 = 1.0;

/// Anchor for delayed universe start or scheduled termination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduleAnchor {
    /// Wall-clock epoch milliseconds.
    At(i64),
    /// Delay relative to `Start` being invoked.
    In(Duration),
}

/// Universe-wide configuration for the actor runtime (spec §6, "Environment-
/// like configuration").
///
/// Read once at universe construction; never persisted (spec §9 "Persisted
/// state: None in the core").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UniverseConfig {
    /// Default mailbox capacity for actors that don't override it.
    pub default_mailbox_capacity: usize,
    /// Interval between monitor ticks; `Duration::ZERO` disables the monitor.
    #[serde(with = "duration_serde")]
    pub heartbeat_interval: Duration,
    /// TCP port for the monitor's report stream, if enabled.
    pub monitor_port: Option<u16>,
    /// Timeout for the Create phase (remote resolution/instantiation).
    pub create_timeout: Duration,
    /// Timeout for the Init phase (`Initialize`/`Initialized` round trip).
    pub init_timeout: Duration,
    /// Timeout for the Start phase.
    pub start_timeout: Duration,
    /// Timeout for each `Terminate`/`Terminated` round trip.
    pub terminate_timeout: Duration,
    /// Timeout for system-handler asks (heartbeat, clock, channel/topic).
    pub system_timeout: Duration,
    /// Timeout for generic actor-to-actor asks (`askChildren` et al.).
    pub actor_timeout: Duration,
    /// Whether a peer master may trigger local shutdown.
    pub remote_termination: bool,
    /// Whether a local actor may request universe shutdown.
    pub self_termination: bool,
    /// Whether the clock may be reset forward in time.
    pub allow_future_reset: bool,
    /// Threshold above which a clock adjuster requests a reset.
    pub max_clock_diff: Duration,
    /// Delayed-launch anchor, if the universe should not start immediately.
    pub start_at: Option<ScheduleAnchor>,
    /// Auto-termination anchor: absolute end time.
    pub end_time: Option<i64>,
    /// Auto-termination anchor: run for this long after starting.
    pub run_for: Option<Duration>,
    /// Simulation-to-wall time ratio; must be positive.
    pub time_scale: f64,
    /// Enable metrics collection.
    pub enable_metrics: bool,
}

impl Default for UniverseConfig {
    fn default() -> Self {
        Self {
            default_mailbox_capacity: DEFAULT_MAILBOX_CAPACITY,
            heartbeat_interval: DEFAULT_HEARTBEAT_INTERVAL,
            monitor_port: None,
            create_timeout: DEFAULT_PHASE_TIMEOUT,
            init_timeout: DEFAULT_PHASE_TIMEOUT,
            start_timeout: DEFAULT_PHASE_TIMEOUT,
            terminate_timeout: DEFAULT_PHASE_TIMEOUT,
            system_timeout: DEFAULT_PHASE_TIMEOUT,
            actor_timeout: DEFAULT_PHASE_TIMEOUT,
            remote_termination: false,
            self_termination: true,
            allow_future_reset: false,
            max_clock_diff: DEFAULT_MAX_CLOCK_DIFF,
            start_at: None,
            end_time: None,
            run_for: None,
            time_scale: DEFAULT_TIME_SCALE,
            enable_metrics: false,
        }
    }
}

impl UniverseConfig {
    /// Start building a config from defaults.
    pub fn builder() -> UniverseConfigBuilder {
        UniverseConfigBuilder::default()
    }

    /// Validate invariants the builder cannot enforce field-by-field.
    pub fn validate(&self) -> Result<(), String> {
        if self.default_mailbox_capacity == 0 {
            return Err("default_mailbox_capacity must be greater than 0".to_string());
        }
        if self.time_scale <= 0.0 {
            return Err("time_scale must be positive".to_string());
        }
        if self.start_at.is_some() && self.end_time.is_some() {
            if let (Some(ScheduleAnchor::At(start)), Some(end)) = (self.start_at, self.end_time) {
                if end <= start {
                    return Err("end_time must be after start_at".to_string());
                }
            }
        }
        Ok(())
    }
}

/// Fluent builder for [`UniverseConfig`], validating on [`build`](Self::build).
#[derive(Debug, Default)]
pub struct UniverseConfigBuilder {
    config: UniverseConfig,
}

impl UniverseConfigBuilder {
    pub fn with_mailbox_capacity(mut self, capacity: usize) -> Self {
        self.config.default_mailbox_capacity = capacity;
        self
    }

    pub fn with_heartbeat_interval(mut self, interval: Duration) -> Self {
        self.config.heartbeat_interval = interval;
        self
    }

    pub fn with_monitor_port(mut self, port: u16) -> Self {
        self.config.monitor_port = Some(port);
        self
    }

    pub fn with_create_timeout(mut self, timeout: Duration) -> Self {
        self.config.create_timeout = timeout;
        self
    }

    pub fn with_init_timeout(mut self, timeout: Duration) -> Self {
        self.config.init_timeout = timeout;
        self
    }

    pub fn with_start_timeout(mut self, timeout: Duration) -> Self {
        self.config.start_timeout = timeout;
        self
    }

    pub fn with_terminate_timeout(mut self, timeout: Duration) -> Self {
        self.config.terminate_timeout = timeout;
        self
    }

    pub fn with_system_timeout(mut self, timeout: Duration) -> Self {
        self.config.system_timeout = timeout;
        self
    }

    pub fn with_actor_timeout(mut self, timeout: Duration) -> Self {
        self.config.actor_timeout = timeout;
        self
    }

    pub fn with_remote_termination(mut self, allowed: bool) -> Self {
        self.config.remote_termination = allowed;
        self
    }

    pub fn with_self_termination(mut self, allowed: bool) -> Self {
        self.config.self_termination = allowed;
        self
    }

    pub fn with_allow_future_reset(mut self, allowed: bool) -> Self {
        self.config.allow_future_reset = allowed;
        self
    }

    pub fn with_max_clock_diff(mut self, diff: Duration) -> Self {
        self.config.max_clock_diff = diff;
        self
    }

    pub fn with_start_at(mut self, anchor: ScheduleAnchor) -> Self {
        self.config.start_at = Some(anchor);
        self
    }

    pub fn with_end_time(mut self, epoch_ms: i64) -> Self {
        self.config.end_time = Some(epoch_ms);
        self
    }

    pub fn with_run_for(mut self, duration: Duration) -> Self {
        self.config.run_for = Some(duration);
        self
    }

    pub fn with_time_scale(mut self, scale: f64) -> Self {
        self.config.time_scale = scale;
        self
    }

    pub fn with_metrics(mut self, enabled: bool) -> Self {
        self.config.enable_metrics = enabled;
        self
    }

    pub fn build(self) -> Result<UniverseConfig, String> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = UniverseConfig::default();
        assert_eq!(config.default_mailbox_capacity, DEFAULT_MAILBOX_CAPACITY);
        assert_eq!(config.heartbeat_interval, DEFAULT_HEARTBEAT_INTERVAL);
        assert!(config.monitor_port.is_none());
        assert!(config.self_termination);
        assert!(!config.remote_termination);
        assert_eq!(config.time_scale, 1.0);
    }

    #[test]
    fn test_config_validation_success() {
        assert!(UniverseConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation_zero_capacity() {
        let invalid = UniverseConfig {
            default_mailbox_capacity: 0,
            ..Default::default()
        };
        let result = invalid.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("mailbox_capacity"));
    }

    #[test]
    fn test_config_validation_nonpositive_time_scale() {
        let invalid = UniverseConfig {
            time_scale: 0.0,
            ..Default::default()
        };
        let result = invalid.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("time_scale"));
    }

    #[test]
    fn test_config_validation_end_before_start() {
        let invalid = UniverseConfig {
            start_at: Some(ScheduleAnchor::At(1_000)),
            end_time: Some(500),
            ..Default::default()
        };
        assert!(invalid.validate().is_err());
    }

    #[test]
    fn test_builder_default() {
        let config = UniverseConfig::builder().build().unwrap();
        assert_eq!(config.default_mailbox_capacity, DEFAULT_MAILBOX_CAPACITY);
    }

    #[test]
    fn test_builder_multiple_options() {
        let config = UniverseConfig::builder()
            .with_mailbox_capacity(500)
            .with_heartbeat_interval(Duration::from_millis(200))
            .with_monitor_port(9100)
            .with_remote_termination(true)
            .with_time_scale(2.0)
            .with_metrics(true)
            .build()
            .unwrap();

        assert_eq!(config.default_mailbox_capacity, 500);
        assert_eq!(config.heartbeat_interval, Duration::from_millis(200));
        assert_eq!(config.monitor_port, Some(9100));
        assert!(config.remote_termination);
        assert_eq!(config.time_scale, 2.0);
        assert!(config.enable_metrics);
    }

    #[test]
    fn test_builder_validation_failure() {
        let result = UniverseConfig::builder().with_mailbox_capacity(0).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_heartbeat_interval_is_allowed_and_disables_monitor() {
        let config = UniverseConfig::builder()
            .with_heartbeat_interval(Duration::ZERO)
            .build()
            .unwrap();
        assert_eq!(config.heartbeat_interval, Duration::ZERO);
    }

    #[test]
    fn test_serialization_json() {
        let config = UniverseConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: UniverseConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(
            config.default_mailbox_capacity,
            deserialized.default_mailbox_capacity
        );
        assert_eq!(config.time_scale, deserialized.time_scale);
    }

    #[test]
    fn test_config_clone_and_debug() {
        let config = UniverseConfig::default();
        let cloned = config.clone();
        assert_eq!(config.default_mailbox_capacity, cloned.default_mailbox_capacity);
        let debug = format!("{:?}", config);
        assert!(debug.contains("UniverseConfig"));
    }
}

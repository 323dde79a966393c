//! Universe-wide configuration and error taxonomy (spec §6, §7).

pub mod config;
pub mod errors;

pub use config::{
    ScheduleAnchor, UniverseConfig, UniverseConfigBuilder, DEFAULT_HEARTBEAT_INTERVAL,
    DEFAULT_MAILBOX_CAPACITY, DEFAULT_MAX_CLOCK_DIFF, DEFAULT_PHASE_TIMEOUT, DEFAULT_TIME_SCALE,
};
pub use errors::UniverseError;

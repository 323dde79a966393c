//! Serialization helpers for common types.
//!
//! Used wherever a config struct (e.g. [`crate::system::UniverseConfig`]'s
//! tick interval and restart windows) carries a `Duration` through JSON
//! — serde has no built-in `Duration` representation, so config loading
//! would otherwise need a hand-rolled seconds field next to every real one.

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Serde serialization module for Duration as seconds.
pub mod duration_serde {
    use super::*;

    /// Serializes Duration as seconds (u64).
    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    /// Deserializes Duration from seconds (u64).
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    struct RestartWindowConfig {
        #[serde(with = "duration_serde")]
        restart_window: Duration,
    }

    #[test]
    #[allow(clippy::expect_used)]
    fn test_duration_serde_roundtrip() {
        let original = RestartWindowConfig {
            restart_window: Duration::from_secs(60),
        };

        let json = serde_json::to_string(&original).expect("Serialization should succeed");
        assert!(json.contains("60"));

        let deserialized: RestartWindowConfig =
            serde_json::from_str(&json).expect("Deserialization should succeed");
        assert_eq!(original, deserialized);
    }

    #[test]
    #[allow(clippy::expect_used)]
    fn test_duration_serde_zero() {
        let test = RestartWindowConfig {
            restart_window: Duration::from_secs(0),
        };

        let json = serde_json::to_string(&test).expect("Serialization should succeed");
        let deserialized: RestartWindowConfig =
            serde_json::from_str(&json).expect("Deserialization should succeed");
        assert_eq!(test.restart_window, deserialized.restart_window);
    }
}

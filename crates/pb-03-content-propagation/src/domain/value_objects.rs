//! Value objects for propagation configuration and record state.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Lifecycle of one content item.
///
/// `Pending → Pushed → Satisfied`, or `Pushed → Retry → Pushed → ...` until
/// the peers-reached threshold is met.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropagationState {
    /// Not offered yet
    Pending,
    /// Offered; result not yet evaluated
    Pushed,
    /// Evaluated below threshold, waiting for the next round
    Retry,
    /// Threshold met; never offered again
    Satisfied,
}

/// Content propagation configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropagationConfig {
    /// Minimum peers one endpoint must report for an item to be satisfied
    pub retry_threshold: u64,
    /// Sleep between retry rounds
    #[serde(with = "secs")]
    pub retry_interval: Duration,
    /// Offers attempted against an endpoint that is still starting up
    pub startup_poll_attempts: u32,
    /// Sleep between startup offers
    #[serde(with = "secs")]
    pub startup_poll_interval: Duration,
    /// Per-request HTTP timeout for endpoint calls
    #[serde(with = "secs")]
    pub request_timeout: Duration,
}

impl Default for PropagationConfig {
    fn default() -> Self {
        Self {
            retry_threshold: 3,
            retry_interval: Duration::from_secs(6),
            startup_poll_attempts: 10,
            startup_poll_interval: Duration::from_secs(1),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl PropagationConfig {
    /// Short intervals for tests.
    pub fn for_testing() -> Self {
        Self {
            retry_threshold: 3,
            retry_interval: Duration::from_millis(50),
            startup_poll_attempts: 3,
            startup_poll_interval: Duration::from_millis(10),
            request_timeout: Duration::from_secs(1),
        }
    }
}

mod secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}

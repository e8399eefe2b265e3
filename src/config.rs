//! Tunable policies and their defaults.

use std::time::Duration;

use serde::Deserialize;

/// Waypoints the routing provider accepts in one call.
pub const MAX_WAYPOINTS: usize = 25;

/// Origins or destinations the matrix provider accepts in one call.
pub const MATRIX_BLOCK_SIZE: usize = 10;

/// Addresses geocoded concurrently per batch.
pub const BATCH_SIZE: usize = 10;

/// Capped exponential backoff: `min(base * 2^attempt, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::geocoding()
    }
}

impl RetryPolicy {
    pub const fn geocoding() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 1_000,
            max_delay_ms: 10_000,
        }
    }

    pub const fn routing() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 2_000,
            max_delay_ms: 10_000,
        }
    }

    /// Single attempt, no waiting.
    pub const fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay_ms: 0,
            max_delay_ms: 0,
        }
    }

    /// Delay before retry number `attempt` (0-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
        let millis = self.base_delay_ms.saturating_mul(factor).min(self.max_delay_ms);
        Duration::from_millis(millis)
    }
}

/// Rate limit for concurrent geocoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BatchPolicy {
    pub batch_size: usize,
    /// Pause between consecutive batches.
    pub batch_delay_ms: u64,
}

impl Default for BatchPolicy {
    fn default() -> Self {
        Self {
            batch_size: BATCH_SIZE,
            batch_delay_ms: 1_000,
        }
    }
}

impl BatchPolicy {
    pub fn unpaced() -> Self {
        Self {
            batch_delay_ms: 0,
            ..Self::default()
        }
    }

    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }
}

/// Matrix tiling and fallback estimation.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct MatrixPolicy {
    pub block_size: usize,
    /// Pause between consecutive block requests.
    pub block_delay_ms: u64,
    /// Assumed average speed for cells the provider fails to return.
    pub fallback_speed_kmh: f64,
}

impl Default for MatrixPolicy {
    fn default() -> Self {
        Self {
            block_size: MATRIX_BLOCK_SIZE,
            block_delay_ms: 200,
            fallback_speed_kmh: 40.0,
        }
    }
}

impl MatrixPolicy {
    pub fn block_delay(&self) -> Duration {
        Duration::from_millis(self.block_delay_ms)
    }
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub max_waypoints: usize,
    /// Pre-order stops with a nearest-neighbor pass before the provider call.
    pub seed_order: bool,
    pub traffic_aware: bool,
    pub geocode_retry: RetryPolicy,
    pub routing_retry: RetryPolicy,
    pub batch: BatchPolicy,
    pub matrix: MatrixPolicy,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_waypoints: MAX_WAYPOINTS,
            seed_order: true,
            traffic_aware: true,
            geocode_retry: RetryPolicy::geocoding(),
            routing_retry: RetryPolicy::routing(),
            batch: BatchPolicy::default(),
            matrix: MatrixPolicy::default(),
        }
    }
}

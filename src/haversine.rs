//! Great-circle travel estimates (fallback when the provider has no answer).
//!
//! Uses straight-line distance and an assumed speed to estimate travel time.
//! Ignores roads, so it is only good enough to order stops.

use crate::model::{Coordinate, LegMetrics};

/// Average driving speed assumption for time estimation.
pub const DEFAULT_SPEED_KMH: f64 = 40.0;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two points in kilometers.
pub fn haversine_km(from: Coordinate, to: Coordinate) -> f64 {
    let lat1_rad = from.lat.to_radians();
    let lat2_rad = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lng = (to.lng - from.lng).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Estimates legs from straight-line distance at a constant speed.
#[derive(Debug, Clone, Copy)]
pub struct HaversineEstimator {
    /// Assumed average driving speed in km/h.
    pub speed_kmh: f64,
}

impl Default for HaversineEstimator {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

impl HaversineEstimator {
    /// Non-positive speeds fall back to [`DEFAULT_SPEED_KMH`].
    pub fn new(speed_kmh: f64) -> Self {
        let speed_kmh = if speed_kmh.is_finite() && speed_kmh > 0.0 {
            speed_kmh
        } else {
            DEFAULT_SPEED_KMH
        };
        Self { speed_kmh }
    }

    /// Convert distance in km to travel time in seconds.
    fn km_to_seconds(&self, km: f64) -> f64 {
        (km / self.speed_kmh * 3600.0).round()
    }

    pub fn estimate(&self, from: Coordinate, to: Coordinate) -> LegMetrics {
        let km = haversine_km(from, to);
        LegMetrics::new((km * 1000.0).round(), self.km_to_seconds(km))
    }
}

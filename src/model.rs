//! Data model shared by the route engine and its callers.

use serde::{Deserialize, Serialize};

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// True when latitude is within [-90, 90] and longitude within [-180, 180].
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// Squared planar distance in degrees. Only meaningful for ordering.
    pub fn squared_distance(&self, other: &Coordinate) -> f64 {
        (self.lat - other.lat).powi(2) + (self.lng - other.lng).powi(2)
    }
}

/// One delivery location to be visited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub id: String,
    pub name: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinate: Option<Coordinate>,
}

impl Stop {
    pub fn new(id: impl Into<String>, name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            address: address.into(),
            coordinate: None,
        }
    }

    pub fn with_coordinate(mut self, coordinate: Coordinate) -> Self {
        self.coordinate = Some(coordinate);
        self
    }

    pub fn has_address(&self) -> bool {
        !self.address.trim().is_empty()
    }
}

/// A stop whose coordinate has been resolved.
///
/// Only the engine constructs these, so the coordinate is always present.
#[derive(Debug, Clone, PartialEq)]
pub struct LocatedStop {
    pub stop: Stop,
    pub coordinate: Coordinate,
}

impl LocatedStop {
    pub fn new(mut stop: Stop, coordinate: Coordinate) -> Self {
        stop.coordinate = Some(coordinate);
        Self { stop, coordinate }
    }

    pub fn into_stop(self) -> Stop {
        self.stop
    }
}

/// Distance and duration of one travel segment as reported by a provider.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LegMetrics {
    pub distance_meters: f64,
    pub duration_seconds: f64,
}

impl LegMetrics {
    pub const fn new(distance_meters: f64, duration_seconds: f64) -> Self {
        Self {
            distance_meters,
            duration_seconds,
        }
    }
}

/// A leg between two consecutive stops of the final ordering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteLeg {
    pub from_index: usize,
    pub to_index: usize,
    pub distance_meters: f64,
    pub duration_seconds: f64,
}

/// Aggregate statistics of an optimized route.
///
/// `leg_distances` and `leg_durations` are index-aligned with the ordered
/// stops: entry `i` is the leg from stop `i` to stop `i + 1`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RouteStats {
    #[serde(rename = "distanciaTotal")]
    pub total_distance: f64,
    #[serde(rename = "tiempoTotal")]
    pub total_duration: f64,
    #[serde(rename = "distanciasIndividuales")]
    pub leg_distances: Vec<f64>,
    #[serde(rename = "tiemposIndividuales")]
    pub leg_durations: Vec<f64>,
    /// Leg from the initial location to the first stop, when one was given.
    #[serde(rename = "tramoInicial", default, skip_serializing_if = "Option::is_none")]
    pub start_leg: Option<LegMetrics>,
}

impl RouteStats {
    pub fn from_legs(legs: &[LegMetrics]) -> Self {
        let mut stats = Self::default();
        for leg in legs {
            stats.push_leg(*leg);
        }
        stats
    }

    pub fn push_leg(&mut self, leg: LegMetrics) {
        self.total_distance += leg.distance_meters;
        self.total_duration += leg.duration_seconds;
        self.leg_distances.push(leg.distance_meters);
        self.leg_durations.push(leg.duration_seconds);
    }

    /// Appends another route's legs after this one's. The other route's
    /// start leg is ignored; callers add any connecting leg explicitly.
    pub fn extend(&mut self, other: RouteStats) {
        self.total_distance += other.total_distance;
        self.total_duration += other.total_duration;
        self.leg_distances.extend(other.leg_distances);
        self.leg_durations.extend(other.leg_durations);
    }

    pub fn leg_count(&self) -> usize {
        self.leg_distances.len()
    }

    pub fn legs(&self) -> Vec<RouteLeg> {
        self.leg_distances
            .iter()
            .zip(&self.leg_durations)
            .enumerate()
            .map(|(i, (distance, duration))| RouteLeg {
                from_index: i,
                to_index: i + 1,
                distance_meters: *distance,
                duration_seconds: *duration,
            })
            .collect()
    }

    pub fn total_with_start_distance(&self) -> f64 {
        self.total_distance + self.start_leg.map_or(0.0, |leg| leg.distance_meters)
    }

    pub fn total_with_start_duration(&self) -> f64 {
        self.total_duration + self.start_leg.map_or(0.0, |leg| leg.duration_seconds)
    }
}

/// Per-call options for [`crate::solver::RoutePlanner::optimize_route`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptimizeOptions {
    /// Traveler's current position. Anchors the start of the route.
    #[serde(default)]
    pub initial_location: Option<Coordinate>,
}

impl OptimizeOptions {
    pub fn starting_at(location: Coordinate) -> Self {
        Self {
            initial_location: Some(location),
        }
    }
}

/// Advisory information attached to a successful result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RouteWarning {
    /// The stop could not be located and was left out of the route.
    Unresolved {
        id: String,
        name: String,
        address: String,
        reason: String,
    },
    /// The geocoder only found an approximate match for the address.
    PartialMatch {
        id: String,
        name: String,
        address: String,
    },
}

/// Result of a successful optimization.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OptimizedRoute {
    pub stops: Vec<Stop>,
    pub stats: RouteStats,
    #[serde(default)]
    pub warnings: Vec<RouteWarning>,
}

impl OptimizedRoute {
    /// Stops that were dropped because they could not be located.
    pub fn skipped(&self) -> Vec<&RouteWarning> {
        self.warnings
            .iter()
            .filter(|warning| matches!(warning, RouteWarning::Unresolved { .. }))
            .collect()
    }

    /// True when some input stops are missing from the result.
    pub fn is_degraded(&self) -> bool {
        !self.skipped().is_empty()
    }
}

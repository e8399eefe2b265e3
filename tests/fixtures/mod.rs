//! Test fixtures for route-planner.
//!
//! Provides:
//! - Buenos Aires area delivery locations
//! - Scriptable fake geocoding and routing providers that record their calls
//! - A pause that records waits instead of sleeping

#![allow(dead_code)]

pub mod buenos_aires_locations;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;

use route_planner::cache::GeocodeCache;
use route_planner::config::{BatchPolicy, PlannerConfig, RetryPolicy};
use route_planner::haversine::HaversineEstimator;
use route_planner::model::{Coordinate, LegMetrics, Stop};
use route_planner::traits::{
    GeocodeMatch, GeocodingProvider, NoPause, Pause, RouteRequest, RouteResponse, RoutingProvider,
};
use route_planner::{ProviderError, ProviderStatus, RoutePlanner};

pub use buenos_aires_locations::Location;

// ============================================================================
// Geocoding
// ============================================================================

/// Geocoder answering from a fixed address book. Unknown addresses get
/// `ZERO_RESULTS`.
#[derive(Default)]
pub struct FakeGeocoder {
    book: HashMap<String, Coordinate>,
    partial: HashSet<String>,
    flaky: Mutex<HashMap<String, usize>>,
    calls: AtomicUsize,
    addresses: Mutex<Vec<String>>,
}

impl FakeGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, address: &str, coordinate: Coordinate) -> Self {
        self.book.insert(address.to_string(), coordinate);
        self
    }

    pub fn with_stops(mut self, stops: &[(Stop, Coordinate)]) -> Self {
        for (stop, coordinate) in stops {
            self.book.insert(stop.address.clone(), *coordinate);
        }
        self
    }

    pub fn partial(mut self, address: &str) -> Self {
        self.partial.insert(address.to_string());
        self
    }

    /// `address` fails with `OVER_QUERY_LIMIT` this many times before answering.
    pub fn flaky(self, address: &str, failures: usize) -> Self {
        self.flaky.lock().insert(address.to_string(), failures);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn addresses(&self) -> Vec<String> {
        self.addresses.lock().clone()
    }
}

impl GeocodingProvider for FakeGeocoder {
    fn geocode(&self, address: &str) -> Result<GeocodeMatch, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.addresses.lock().push(address.to_string());

        if let Some(remaining) = self.flaky.lock().get_mut(address) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(ProviderError::new(ProviderStatus::OverQueryLimit, "slow down"));
            }
        }

        match self.book.get(address) {
            Some(coordinate) => Ok(GeocodeMatch {
                coordinate: *coordinate,
                partial_match: self.partial.contains(address),
            }),
            None => Err(ProviderError::new(ProviderStatus::ZeroResults, "no match")),
        }
    }
}

// ============================================================================
// Routing
// ============================================================================

/// Router that keeps waypoints in the order sent and prices legs by
/// haversine estimate, unless a fixed response is scripted.
#[derive(Default)]
pub struct FakeRouter {
    scripted: Option<RouteResponse>,
    failures: Mutex<Vec<ProviderStatus>>,
    routes: Mutex<Vec<RouteRequest>>,
    matrix_calls: AtomicUsize,
}

impl FakeRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scripted(legs: &[(f64, f64)], waypoint_order: Vec<usize>) -> Self {
        Self {
            scripted: Some(RouteResponse {
                legs: legs.iter().map(|(d, t)| LegMetrics::new(*d, *t)).collect(),
                waypoint_order,
            }),
            ..Self::default()
        }
    }

    /// The next route calls fail with these statuses, in order.
    pub fn failing(self, statuses: Vec<ProviderStatus>) -> Self {
        *self.failures.lock() = statuses;
        self
    }

    pub fn routes(&self) -> Vec<RouteRequest> {
        self.routes.lock().clone()
    }

    pub fn matrix_calls(&self) -> usize {
        self.matrix_calls.load(Ordering::SeqCst)
    }
}

impl RoutingProvider for FakeRouter {
    fn compute_route(&self, request: &RouteRequest) -> Result<RouteResponse, ProviderError> {
        self.routes.lock().push(request.clone());
        {
            let mut failures = self.failures.lock();
            if !failures.is_empty() {
                let status = failures.remove(0);
                return Err(ProviderError::new(status, "scripted failure"));
            }
        }
        assert!(request.waypoints.len() <= 25, "too many waypoints: {}", request.waypoints.len());

        if let Some(response) = &self.scripted {
            return Ok(response.clone());
        }

        let estimator = HaversineEstimator::default();
        let mut points = vec![request.origin];
        points.extend_from_slice(&request.waypoints);
        points.push(request.destination);
        Ok(RouteResponse {
            legs: points.windows(2).map(|pair| estimator.estimate(pair[0], pair[1])).collect(),
            waypoint_order: (0..request.waypoints.len()).collect(),
        })
    }

    fn compute_matrix(
        &self,
        origins: &[Coordinate],
        destinations: &[Coordinate],
    ) -> Result<Vec<Vec<Option<LegMetrics>>>, ProviderError> {
        assert!(origins.len() <= 10 && destinations.len() <= 10);
        self.matrix_calls.fetch_add(1, Ordering::SeqCst);
        let estimator = HaversineEstimator::default();
        Ok(origins
            .iter()
            .map(|o| destinations.iter().map(|d| Some(estimator.estimate(*o, *d))).collect())
            .collect())
    }
}

// ============================================================================
// Pausing
// ============================================================================

#[derive(Default)]
pub struct RecordingPause {
    waits: Mutex<Vec<Duration>>,
}

impl RecordingPause {
    pub fn waits(&self) -> Vec<Duration> {
        self.waits.lock().clone()
    }
}

impl Pause for RecordingPause {
    fn pause(&self, duration: Duration) {
        self.waits.lock().push(duration);
    }
}

// ============================================================================
// Builders
// ============================================================================

/// Default policies with every delay removed.
pub fn fast_config() -> PlannerConfig {
    PlannerConfig {
        batch: BatchPolicy::unpaced(),
        geocode_retry: RetryPolicy {
            base_delay_ms: 0,
            max_delay_ms: 0,
            ..RetryPolicy::geocoding()
        },
        routing_retry: RetryPolicy {
            base_delay_ms: 0,
            max_delay_ms: 0,
            ..RetryPolicy::routing()
        },
        ..PlannerConfig::default()
    }
}

pub fn planner<'a>(
    geocoder: &'a FakeGeocoder,
    router: &'a FakeRouter,
) -> RoutePlanner<&'a FakeGeocoder, &'a FakeRouter> {
    RoutePlanner::new(geocoder, router, Arc::new(GeocodeCache::new()))
        .with_config(fast_config())
        .with_pause(Arc::new(NoPause))
}

pub fn stop(i: usize) -> Stop {
    Stop::new(format!("s{i}"), format!("Cliente {i}"), format!("Calle {i}, Ciudad"))
}

/// `n` stops on a small grid, each with a distinct coordinate.
pub fn grid_stops(n: usize) -> Vec<(Stop, Coordinate)> {
    (0..n)
        .map(|i| {
            let row = (i / 6) as f64;
            let col = (i % 6) as f64;
            (stop(i), Coordinate::new(-34.60 - row * 0.01, -58.40 - col * 0.01))
        })
        .collect()
}

/// Two tight groups of stops about 30 km apart.
pub fn two_towns(per_town: usize) -> Vec<(Stop, Coordinate)> {
    (0..per_town * 2)
        .map(|i| {
            let town = (i / per_town) as f64;
            let k = (i % per_town) as f64;
            let coordinate = Coordinate::new(-34.60 - town * 0.3 + k * 0.001, -58.40 + k * 0.0013);
            (stop(i), coordinate)
        })
        .collect()
}

pub fn location_stops(locations: &[Location]) -> Vec<(Stop, Coordinate)> {
    locations
        .iter()
        .enumerate()
        .map(|(i, location)| {
            (
                Stop::new(format!("loc{i}"), location.name, location.address),
                Coordinate::new(location.lat, location.lng),
            )
        })
        .collect()
}

pub fn stops_only(pairs: &[(Stop, Coordinate)]) -> Vec<Stop> {
    pairs.iter().map(|(stop, _)| stop.clone()).collect()
}

/// Bit-exact key for comparing coordinates in sets.
pub fn key(coordinate: &Coordinate) -> (u64, u64) {
    (coordinate.lat.to_bits(), coordinate.lng.to_bits())
}

//! Seams to the external providers the engine depends on.
//!
//! These are intentionally minimal. Concrete adapters live in
//! [`crate::google`] and [`crate::osrm`]; tests supply their own fakes.

use std::sync::Arc;
use std::time::Duration;

use crate::error::ProviderError;
use crate::model::{Coordinate, LegMetrics};

/// Best candidate returned by a geocoding provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeocodeMatch {
    pub coordinate: Coordinate,
    /// The provider only matched part of the address.
    pub partial_match: bool,
}

impl GeocodeMatch {
    pub const fn exact(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            partial_match: false,
        }
    }
}

/// Resolves a free-text address into a coordinate.
pub trait GeocodingProvider: Send + Sync {
    fn geocode(&self, address: &str) -> Result<GeocodeMatch, ProviderError>;
}

impl<T: GeocodingProvider + ?Sized> GeocodingProvider for &T {
    fn geocode(&self, address: &str) -> Result<GeocodeMatch, ProviderError> {
        (**self).geocode(address)
    }
}

impl<T: GeocodingProvider + ?Sized> GeocodingProvider for Arc<T> {
    fn geocode(&self, address: &str) -> Result<GeocodeMatch, ProviderError> {
        (**self).geocode(address)
    }
}

/// A single route computation request.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub waypoints: Vec<Coordinate>,
    /// Let the provider reorder the waypoints.
    pub optimize_waypoints: bool,
    /// Prefer traffic-aware durations where the provider offers them.
    pub traffic_aware: bool,
}

/// Provider answer to a [`RouteRequest`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RouteResponse {
    /// One entry per leg: origin to first waypoint, ..., last waypoint to destination.
    pub legs: Vec<LegMetrics>,
    /// Visiting order of the request's waypoints, as indices into `waypoints`.
    pub waypoint_order: Vec<usize>,
}

/// Provides routes and travel matrices between coordinates.
pub trait RoutingProvider: Send + Sync {
    fn compute_route(&self, request: &RouteRequest) -> Result<RouteResponse, ProviderError>;

    /// Matrix indexed `[origin][destination]`. `None` marks a cell the
    /// provider could not compute.
    fn compute_matrix(
        &self,
        origins: &[Coordinate],
        destinations: &[Coordinate],
    ) -> Result<Vec<Vec<Option<LegMetrics>>>, ProviderError>;
}

impl<T: RoutingProvider + ?Sized> RoutingProvider for &T {
    fn compute_route(&self, request: &RouteRequest) -> Result<RouteResponse, ProviderError> {
        (**self).compute_route(request)
    }

    fn compute_matrix(
        &self,
        origins: &[Coordinate],
        destinations: &[Coordinate],
    ) -> Result<Vec<Vec<Option<LegMetrics>>>, ProviderError> {
        (**self).compute_matrix(origins, destinations)
    }
}

impl<T: RoutingProvider + ?Sized> RoutingProvider for Arc<T> {
    fn compute_route(&self, request: &RouteRequest) -> Result<RouteResponse, ProviderError> {
        (**self).compute_route(request)
    }

    fn compute_matrix(
        &self,
        origins: &[Coordinate],
        destinations: &[Coordinate],
    ) -> Result<Vec<Vec<Option<LegMetrics>>>, ProviderError> {
        (**self).compute_matrix(origins, destinations)
    }
}

/// Waits between provider calls (backoff and pacing).
pub trait Pause: Send + Sync {
    fn pause(&self, duration: Duration);
}

/// Blocks the current thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadPause;

impl Pause for ThreadPause {
    fn pause(&self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

/// Never waits.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPause;

impl Pause for NoPause {
    fn pause(&self, _duration: Duration) {}
}

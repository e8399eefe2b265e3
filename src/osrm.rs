//! OSRM HTTP adapter for routes and travel matrices.

use serde::Deserialize;

use crate::error::{ProviderError, ProviderStatus};
use crate::http::{client, get_json, lng_lat};
use crate::model::{Coordinate, LegMetrics};
use crate::traits::{RouteRequest, RouteResponse, RoutingProvider};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "car".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = client(config.timeout_secs)?;
        Ok(Self { config, client })
    }

    fn url(&self, service: &str, coordinates: &[Coordinate]) -> String {
        let coords = coordinates.iter().map(lng_lat).collect::<Vec<_>>().join(";");
        format!("{}/{}/v1/{}/{}", self.config.base_url, service, self.config.profile, coords)
    }
}

impl RoutingProvider for OsrmClient {
    fn compute_route(&self, request: &RouteRequest) -> Result<RouteResponse, ProviderError> {
        let mut coordinates = Vec::with_capacity(request.waypoints.len() + 2);
        coordinates.push(request.origin);
        coordinates.extend_from_slice(&request.waypoints);
        coordinates.push(request.destination);

        if request.optimize_waypoints {
            let call = self.client.get(self.url("trip", &coordinates)).query(&[
                ("source", "first"),
                ("destination", "last"),
                ("roundtrip", "false"),
                ("overview", "false"),
            ]);
            let body: OsrmTripResponse = get_json(call)?;
            trip_to_route(body, request.waypoints.len())
        } else {
            let call = self
                .client
                .get(self.url("route", &coordinates))
                .query(&[("overview", "false")]);
            let body: OsrmRouteResponse = get_json(call)?;
            route_to_route(body)
        }
    }

    fn compute_matrix(
        &self,
        origins: &[Coordinate],
        destinations: &[Coordinate],
    ) -> Result<Vec<Vec<Option<LegMetrics>>>, ProviderError> {
        if origins.is_empty() || destinations.is_empty() {
            return Ok(vec![Vec::new(); origins.len()]);
        }

        let mut coordinates = origins.to_vec();
        coordinates.extend_from_slice(destinations);
        let sources = (0..origins.len()).map(|i| i.to_string()).collect::<Vec<_>>().join(";");
        let targets = (origins.len()..coordinates.len())
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join(";");

        let call = self.client.get(self.url("table", &coordinates)).query(&[
            ("sources", sources.as_str()),
            ("destinations", targets.as_str()),
            ("annotations", "duration,distance"),
        ]);
        let body: OsrmTableResponse = get_json(call)?;
        table_to_matrix(body, origins.len(), destinations.len())
    }
}

fn check(code: &str, message: Option<String>) -> Result<(), ProviderError> {
    if code == "Ok" {
        Ok(())
    } else {
        Err(ProviderError::new(ProviderStatus::from_code(code), message.unwrap_or_default()))
    }
}

fn legs(legs: Vec<OsrmLeg>) -> Vec<LegMetrics> {
    legs.into_iter()
        .map(|leg| LegMetrics::new(leg.distance, leg.duration))
        .collect()
}

fn route_to_route(body: OsrmRouteResponse) -> Result<RouteResponse, ProviderError> {
    check(&body.code, body.message)?;
    let route = body
        .routes
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::new(ProviderStatus::ZeroResults, "no route returned"))?;
    Ok(RouteResponse {
        legs: legs(route.legs),
        waypoint_order: Vec::new(),
    })
}

/// Input coordinate `i` sits at `waypoints[i].waypoint_index` in the trip.
/// Coordinate 0 is the origin and the last one the destination, so the
/// request's waypoints are inputs `1..=count`.
fn trip_to_route(body: OsrmTripResponse, count: usize) -> Result<RouteResponse, ProviderError> {
    check(&body.code, body.message)?;
    let trip = body
        .trips
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::new(ProviderStatus::ZeroResults, "no trip returned"))?;

    let mut positioned: Vec<(usize, usize)> = body
        .waypoints
        .iter()
        .enumerate()
        .skip(1)
        .take(count)
        .map(|(input, waypoint)| (waypoint.waypoint_index, input - 1))
        .collect();
    positioned.sort_unstable();

    Ok(RouteResponse {
        legs: legs(trip.legs),
        waypoint_order: positioned.into_iter().map(|(_, waypoint)| waypoint).collect(),
    })
}

fn table_to_matrix(
    body: OsrmTableResponse,
    origins: usize,
    destinations: usize,
) -> Result<Vec<Vec<Option<LegMetrics>>>, ProviderError> {
    check(&body.code, body.message)?;
    let durations = body.durations.unwrap_or_default();
    let distances = body.distances.unwrap_or_default();

    Ok((0..origins)
        .map(|i| {
            (0..destinations)
                .map(|j| {
                    let duration = durations.get(i).and_then(|row| row.get(j)).copied().flatten()?;
                    let distance = distances.get(i).and_then(|row| row.get(j)).copied().flatten()?;
                    Some(LegMetrics::new(distance.round(), duration.round()))
                })
                .collect()
        })
        .collect())
}

#[derive(Debug, Deserialize)]
struct OsrmLeg {
    distance: f64,
    duration: f64,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    #[serde(default)]
    legs: Vec<OsrmLeg>,
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    code: String,
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmTripWaypoint {
    waypoint_index: usize,
}

#[derive(Debug, Deserialize)]
struct OsrmTripResponse {
    code: String,
    message: Option<String>,
    #[serde(default)]
    waypoints: Vec<OsrmTripWaypoint>,
    #[serde(default)]
    trips: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmTableResponse {
    code: String,
    message: Option<String>,
    durations: Option<Vec<Vec<Option<f64>>>>,
    distances: Option<Vec<Vec<Option<f64>>>>,
}

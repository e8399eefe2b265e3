//! Google Maps Platform adapter: Geocoding, Directions and Distance Matrix.

use serde::Deserialize;
use tracing::debug;

use crate::error::{ProviderError, ProviderStatus};
use crate::http::{client, get_json, lat_lng};
use crate::model::{Coordinate, LegMetrics};
use crate::traits::{GeocodeMatch, GeocodingProvider, RouteRequest, RouteResponse, RoutingProvider};

/// Environment variable read by [`GoogleMapsConfig::from_env`].
pub const API_KEY_VAR: &str = "GOOGLE_MAPS_API_KEY";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GoogleMapsConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout_secs: u64,
    /// Result language, e.g. `"es"`.
    pub language: Option<String>,
    /// Region bias as a ccTLD, e.g. `"ar"`.
    pub region: Option<String>,
}

impl Default for GoogleMapsConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://maps.googleapis.com/maps/api".to_string(),
            timeout_secs: 10,
            language: None,
            region: None,
        }
    }
}

impl GoogleMapsConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    pub fn from_env() -> Result<Self, std::env::VarError> {
        std::env::var(API_KEY_VAR).map(Self::new)
    }
}

#[derive(Debug, Clone)]
pub struct GoogleMapsClient {
    config: GoogleMapsConfig,
    client: reqwest::blocking::Client,
}

impl GoogleMapsClient {
    pub fn new(config: GoogleMapsConfig) -> Result<Self, reqwest::Error> {
        let client = client(config.timeout_secs)?;
        Ok(Self { config, client })
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("key", self.config.api_key.clone())];
        if let Some(language) = &self.config.language {
            params.push(("language", language.clone()));
        }
        params
    }

    fn get(
        &self,
        service: &str,
        mut params: Vec<(&'static str, String)>,
    ) -> reqwest::blocking::RequestBuilder {
        params.extend(self.params());
        self.client
            .get(format!("{}/{}/json", self.config.base_url, service))
            .query(&params)
    }
}

impl GeocodingProvider for GoogleMapsClient {
    fn geocode(&self, address: &str) -> Result<GeocodeMatch, ProviderError> {
        let mut params = vec![("address", address.to_string())];
        if let Some(region) = &self.config.region {
            params.push(("region", region.clone()));
        }
        let body: GeocodeResponse = get_json(self.get("geocode", params))?;
        geocode_to_match(body)
    }
}

impl RoutingProvider for GoogleMapsClient {
    fn compute_route(&self, request: &RouteRequest) -> Result<RouteResponse, ProviderError> {
        let mut params = vec![
            ("origin", lat_lng(&request.origin)),
            ("destination", lat_lng(&request.destination)),
        ];
        if !request.waypoints.is_empty() {
            let mut waypoints: Vec<String> = request.waypoints.iter().map(lat_lng).collect();
            if request.optimize_waypoints {
                waypoints.insert(0, "optimize:true".to_string());
            }
            params.push(("waypoints", waypoints.join("|")));
        }
        if request.traffic_aware {
            params.push(("departure_time", "now".to_string()));
        }
        debug!(waypoints = request.waypoints.len(), "requesting directions");
        let body: DirectionsResponse = get_json(self.get("directions", params))?;
        directions_to_route(body, request.traffic_aware)
    }

    fn compute_matrix(
        &self,
        origins: &[Coordinate],
        destinations: &[Coordinate],
    ) -> Result<Vec<Vec<Option<LegMetrics>>>, ProviderError> {
        if origins.is_empty() || destinations.is_empty() {
            return Ok(vec![Vec::new(); origins.len()]);
        }
        let join = |coordinates: &[Coordinate]| {
            coordinates.iter().map(lat_lng).collect::<Vec<_>>().join("|")
        };
        let params = vec![("origins", join(origins)), ("destinations", join(destinations))];
        let body: MatrixResponse = get_json(self.get("distancematrix", params))?;
        matrix_to_cells(body, origins.len(), destinations.len())
    }
}

fn check(status: &str, message: Option<String>) -> Result<(), ProviderError> {
    if status == "OK" {
        Ok(())
    } else {
        Err(ProviderError::new(ProviderStatus::from_code(status), message.unwrap_or_default()))
    }
}

fn geocode_to_match(body: GeocodeResponse) -> Result<GeocodeMatch, ProviderError> {
    check(&body.status, body.error_message)?;
    let best = body
        .results
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::new(ProviderStatus::ZeroResults, "no candidates"))?;
    Ok(GeocodeMatch {
        coordinate: Coordinate::new(best.geometry.location.lat, best.geometry.location.lng),
        partial_match: best.partial_match,
    })
}

fn directions_to_route(
    body: DirectionsResponse,
    traffic_aware: bool,
) -> Result<RouteResponse, ProviderError> {
    check(&body.status, body.error_message)?;
    let route = body
        .routes
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::new(ProviderStatus::ZeroResults, "no route returned"))?;
    let legs = route
        .legs
        .into_iter()
        .map(|leg| {
            let duration = match (traffic_aware, leg.duration_in_traffic) {
                (true, Some(traffic)) => traffic.value,
                _ => leg.duration.value,
            };
            LegMetrics::new(leg.distance.value, duration)
        })
        .collect();
    Ok(RouteResponse {
        legs,
        waypoint_order: route.waypoint_order,
    })
}

fn matrix_to_cells(
    body: MatrixResponse,
    origins: usize,
    destinations: usize,
) -> Result<Vec<Vec<Option<LegMetrics>>>, ProviderError> {
    check(&body.status, body.error_message)?;
    let mut rows = body.rows.into_iter();
    Ok((0..origins)
        .map(|_| {
            let mut elements = rows.next().map(|row| row.elements).unwrap_or_default().into_iter();
            (0..destinations)
                .map(|_| {
                    let element = elements.next()?;
                    if element.status != "OK" {
                        return None;
                    }
                    Some(LegMetrics::new(element.distance?.value, element.duration?.value))
                })
                .collect()
        })
        .collect())
}

#[derive(Debug, Deserialize)]
struct Value {
    value: f64,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
    #[serde(default)]
    partial_match: bool,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct DirectionsLeg {
    distance: Value,
    duration: Value,
    duration_in_traffic: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct DirectionsRoute {
    #[serde(default)]
    legs: Vec<DirectionsLeg>,
    #[serde(default)]
    waypoint_order: Vec<usize>,
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    status: String,
    error_message: Option<String>,
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Deserialize)]
struct MatrixElement {
    status: String,
    distance: Option<Value>,
    duration: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct MatrixRow {
    #[serde(default)]
    elements: Vec<MatrixElement>,
}

#[derive(Debug, Deserialize)]
struct MatrixResponse {
    status: String,
    error_message: Option<String>,
    #[serde(default)]
    rows: Vec<MatrixRow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geocode_takes_first_candidate_and_partial_flag() {
        let body: GeocodeResponse = serde_json::from_str(
            r#"{
                "status": "OK",
                "results": [
                    {
                        "geometry": {"location": {"lat": -34.6037, "lng": -58.3816}},
                        "partial_match": true
                    },
                    {"geometry": {"location": {"lat": 0.0, "lng": 0.0}}}
                ]
            }"#,
        )
        .unwrap();
        let found = geocode_to_match(body).unwrap();
        assert_eq!(found.coordinate, Coordinate::new(-34.6037, -58.3816));
        assert!(found.partial_match);
    }

    #[test]
    fn geocode_quota_error_is_transient() {
        let body: GeocodeResponse = serde_json::from_str(
            r#"{
                "status": "OVER_QUERY_LIMIT",
                "error_message": "You have exceeded your rate-limit",
                "results": []
            }"#,
        )
        .unwrap();
        let err = geocode_to_match(body).unwrap_err();
        assert!(err.is_transient());
        assert_eq!(err.message, "You have exceeded your rate-limit");
    }

    #[test]
    fn geocode_denied_is_terminal() {
        let body: GeocodeResponse =
            serde_json::from_str(r#"{"status": "REQUEST_DENIED", "results": []}"#).unwrap();
        assert!(!geocode_to_match(body).unwrap_err().is_transient());
    }

    #[test]
    fn directions_prefer_traffic_durations() {
        let json = r#"{
            "status": "OK",
            "routes": [{
                "waypoint_order": [1, 0],
                "legs": [
                    {
                        "distance": {"value": 100},
                        "duration": {"value": 60},
                        "duration_in_traffic": {"value": 75}
                    },
                    {"distance": {"value": 200}, "duration": {"value": 90}},
                    {
                        "distance": {"value": 150},
                        "duration": {"value": 70},
                        "duration_in_traffic": {"value": 80}
                    }
                ]
            }]
        }"#;
        let route = directions_to_route(serde_json::from_str(json).unwrap(), true).unwrap();
        assert_eq!(route.waypoint_order, vec![1, 0]);
        let durations: Vec<f64> = route.legs.iter().map(|leg| leg.duration_seconds).collect();
        assert_eq!(durations, vec![75.0, 90.0, 80.0]);

        let route = directions_to_route(serde_json::from_str(json).unwrap(), false).unwrap();
        assert_eq!(route.legs[0].duration_seconds, 60.0);
    }

    #[test]
    fn matrix_failed_elements_become_none() {
        let body: MatrixResponse = serde_json::from_str(
            r#"{
                "status": "OK",
                "rows": [
                    {"elements": [
                        {"status": "OK", "distance": {"value": 1200}, "duration": {"value": 180}},
                        {"status": "ZERO_RESULTS"}
                    ]},
                    {"elements": [
                        {"status": "OK", "distance": {"value": 900}, "duration": {"value": 120}}
                    ]}
                ]
            }"#,
        )
        .unwrap();
        let cells = matrix_to_cells(body, 2, 2).unwrap();
        assert_eq!(cells[0][0], Some(LegMetrics::new(1200.0, 180.0)));
        assert_eq!(cells[0][1], None);
        assert_eq!(cells[1][0], Some(LegMetrics::new(900.0, 120.0)));
        assert_eq!(cells[1][1], None);
    }

    #[test]
    fn config_reads_partial_json() {
        let config: GoogleMapsConfig =
            serde_json::from_str(r#"{"api_key": "k", "language": "es"}"#).unwrap();
        assert_eq!(config.api_key, "k");
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.language.as_deref(), Some("es"));
    }
}

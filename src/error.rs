//! Error taxonomy for the route engine.

use std::fmt;

use thiserror::Error;

/// Status reported by an external geocoding or routing provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderStatus {
    OverQueryLimit,
    UnknownError,
    Timeout,
    Network,
    ZeroResults,
    NotFound,
    InvalidRequest,
    RequestDenied,
    MaxWaypointsExceeded,
    Other(String),
}

impl ProviderStatus {
    /// Maps a provider status string (e.g. `"OVER_QUERY_LIMIT"`) to a status.
    pub fn from_code(code: &str) -> Self {
        match code {
            "OVER_QUERY_LIMIT" | "OVER_DAILY_LIMIT" | "TooManyRequests" => Self::OverQueryLimit,
            "UNKNOWN_ERROR" => Self::UnknownError,
            "ZERO_RESULTS" | "NoRoute" | "NoTrips" | "NoSegment" => Self::ZeroResults,
            "NOT_FOUND" | "NoMatch" => Self::NotFound,
            "INVALID_REQUEST" | "InvalidUrl" | "InvalidService" | "InvalidVersion"
            | "InvalidOptions" | "InvalidQuery" | "InvalidValue" => Self::InvalidRequest,
            "REQUEST_DENIED" => Self::RequestDenied,
            "MAX_WAYPOINTS_EXCEEDED" | "MAX_ROUTE_LENGTH_EXCEEDED" | "MAX_DIMENSIONS_EXCEEDED"
            | "MAX_ELEMENTS_EXCEEDED" | "TooBig" => Self::MaxWaypointsExceeded,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn from_http(code: u16) -> Self {
        match code {
            429 => Self::OverQueryLimit,
            401 | 403 => Self::RequestDenied,
            400 => Self::InvalidRequest,
            404 => Self::NotFound,
            408 | 504 => Self::Timeout,
            500..=599 => Self::UnknownError,
            other => Self::Other(format!("HTTP {other}")),
        }
    }

    /// Transient statuses may succeed on retry; the rest never will.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::OverQueryLimit | Self::UnknownError | Self::Timeout | Self::Network
        )
    }
}

impl fmt::Display for ProviderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OverQueryLimit => f.write_str("OVER_QUERY_LIMIT"),
            Self::UnknownError => f.write_str("UNKNOWN_ERROR"),
            Self::Timeout => f.write_str("TIMEOUT"),
            Self::Network => f.write_str("NETWORK"),
            Self::ZeroResults => f.write_str("ZERO_RESULTS"),
            Self::NotFound => f.write_str("NOT_FOUND"),
            Self::InvalidRequest => f.write_str("INVALID_REQUEST"),
            Self::RequestDenied => f.write_str("REQUEST_DENIED"),
            Self::MaxWaypointsExceeded => f.write_str("MAX_WAYPOINTS_EXCEEDED"),
            Self::Other(code) => f.write_str(code),
        }
    }
}

/// Failure of a single provider call.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("provider returned {status}: {message}")]
pub struct ProviderError {
    pub status: ProviderStatus,
    pub message: String,
}

impl ProviderError {
    pub fn new(status: ProviderStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn is_transient(&self) -> bool {
        self.status.is_transient()
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        let status = if err.is_timeout() {
            ProviderStatus::Timeout
        } else if let Some(code) = err.status() {
            ProviderStatus::from_http(code.as_u16())
        } else if err.is_decode() {
            ProviderStatus::Other("MALFORMED_BODY".to_string())
        } else {
            ProviderStatus::Network
        };
        Self::new(status, err.to_string())
    }
}

/// A single address could not be resolved after exhausting retries.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("could not geocode {address:?}: {cause}")]
pub struct GeocodeError {
    pub address: String,
    #[source]
    pub cause: ProviderError,
}

/// The matrix provider refused a request in a way retrying cannot fix.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("matrix provider returned {status}: {message}")]
pub struct MatrixError {
    pub status: ProviderStatus,
    pub message: String,
}

impl From<ProviderError> for MatrixError {
    fn from(err: ProviderError) -> Self {
        Self {
            status: err.status,
            message: err.message,
        }
    }
}

/// Whole-call failure of `optimize_route`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    #[error("no stops were supplied")]
    EmptyRoute,
    #[error("stops without an address: {}", .names.join(", "))]
    MissingAddress { names: Vec<String> },
    #[error("none of the {attempted} addresses could be geocoded")]
    NoAddressesResolved { attempted: usize },
    #[error("stop {name:?} has an invalid coordinate ({lat}, {lng})")]
    InvalidCoordinate { name: String, lat: f64, lng: f64 },
    #[error("routing provider returned {status}: {message}")]
    RoutingProvider { status: ProviderStatus, message: String },
    #[error(transparent)]
    Matrix(#[from] MatrixError),
    #[error("malformed provider response: expected {expected}, got {got}")]
    MalformedResponse { expected: String, got: String },
}

impl From<ProviderError> for RouteError {
    fn from(err: ProviderError) -> Self {
        Self::RoutingProvider {
            status: err.status,
            message: err.message,
        }
    }
}

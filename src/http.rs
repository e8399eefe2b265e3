//! Shared plumbing for the HTTP provider adapters.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{ProviderError, ProviderStatus};
use crate::model::Coordinate;

pub(crate) fn client(timeout_secs: u64) -> Result<Client, reqwest::Error> {
    Client::builder().timeout(Duration::from_secs(timeout_secs)).build()
}

/// Sends `request` and decodes the JSON body.
///
/// Providers put a status code in error bodies, so the body is decoded
/// even on non-2xx responses; only an undecodable error body falls back
/// to the HTTP status.
pub(crate) fn get_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ProviderError> {
    let response = request.send()?;
    let status = response.status();
    debug!(url = %response.url().path(), status = status.as_u16(), "provider response");
    match response.json::<T>() {
        Ok(body) => Ok(body),
        Err(err) if !status.is_success() => Err(ProviderError::new(
            ProviderStatus::from_http(status.as_u16()),
            err.to_string(),
        )),
        Err(err) => Err(err.into()),
    }
}

/// `"lat,lng"` with six decimals.
pub(crate) fn lat_lng(coordinate: &Coordinate) -> String {
    format!("{:.6},{:.6}", coordinate.lat, coordinate.lng)
}

/// `"lng,lat"` with six decimals.
pub(crate) fn lng_lat(coordinate: &Coordinate) -> String {
    format!("{:.6},{:.6}", coordinate.lng, coordinate.lat)
}

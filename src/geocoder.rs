//! Single-address resolution with caching and backoff.

use tracing::{debug, warn};

use crate::cache::GeocodeCache;
use crate::config::RetryPolicy;
use crate::error::{GeocodeError, ProviderError, ProviderStatus};
use crate::normalize::normalize;
use crate::retry::with_backoff;
use crate::traits::{GeocodeMatch, GeocodingProvider, Pause};

/// Resolves addresses through a [`GeocodingProvider`], consulting and
/// filling a shared [`GeocodeCache`].
pub struct RetryingGeocoder<'a, G: ?Sized> {
    provider: &'a G,
    cache: &'a GeocodeCache,
    policy: RetryPolicy,
    pause: &'a dyn Pause,
}

impl<'a, G> RetryingGeocoder<'a, G>
where
    G: GeocodingProvider + ?Sized,
{
    pub fn new(
        provider: &'a G,
        cache: &'a GeocodeCache,
        policy: RetryPolicy,
        pause: &'a dyn Pause,
    ) -> Self {
        Self {
            provider,
            cache,
            policy,
            pause,
        }
    }

    pub fn resolve(&self, address: &str) -> Result<GeocodeMatch, GeocodeError> {
        let key = normalize(address);
        if key.is_empty() {
            return Err(GeocodeError {
                address: address.to_string(),
                cause: ProviderError::new(ProviderStatus::InvalidRequest, "empty address"),
            });
        }

        if let Some(hit) = self.cache.get(&key) {
            debug!(%key, "geocode cache hit");
            return Ok(hit);
        }

        debug!(%key, "geocode cache miss");
        let found = with_backoff(&self.policy, self.pause, "geocode", |_| {
            let found = self.provider.geocode(address)?;
            if !found.coordinate.is_valid() {
                return Err(ProviderError::new(
                    ProviderStatus::Other("INVALID_COORDINATE".to_string()),
                    format!("({}, {})", found.coordinate.lat, found.coordinate.lng),
                ));
            }
            Ok(found)
        })
        .map_err(|cause| GeocodeError {
            address: address.to_string(),
            cause,
        })?;

        if found.partial_match {
            warn!(address, "geocoder returned a partial match");
        }
        self.cache.put(key, found);
        Ok(found)
    }
}

//! Paced, concurrent resolution of many addresses.

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::BatchPolicy;
use crate::error::{GeocodeError, RouteError};
use crate::geocoder::RetryingGeocoder;
use crate::traits::{GeocodeMatch, GeocodingProvider, Pause};

pub type Resolution = Result<GeocodeMatch, GeocodeError>;

/// Resolves addresses in fixed-size batches. Calls within a batch run
/// concurrently; batches run in order with a pause between them.
pub struct BatchResolver<'a, G: ?Sized> {
    geocoder: &'a RetryingGeocoder<'a, G>,
    policy: BatchPolicy,
    pause: &'a dyn Pause,
}

impl<'a, G> BatchResolver<'a, G>
where
    G: GeocodingProvider + ?Sized,
{
    pub fn new(
        geocoder: &'a RetryingGeocoder<'a, G>,
        policy: BatchPolicy,
        pause: &'a dyn Pause,
    ) -> Self {
        Self {
            geocoder,
            policy,
            pause,
        }
    }

    /// One result per address, in input order. Fails only when every
    /// address of a non-empty input fails.
    pub fn resolve_all<S>(&self, addresses: &[S]) -> Result<Vec<Resolution>, RouteError>
    where
        S: AsRef<str> + Sync,
    {
        let results = self.settle_all(addresses);
        if !results.is_empty() && results.iter().all(Result::is_err) {
            return Err(RouteError::NoAddressesResolved {
                attempted: results.len(),
            });
        }
        Ok(results)
    }

    /// Like [`resolve_all`](Self::resolve_all), but never escalates: every
    /// per-address error is kept for the caller to inspect.
    pub fn settle_all<S>(&self, addresses: &[S]) -> Vec<Resolution>
    where
        S: AsRef<str> + Sync,
    {
        if addresses.is_empty() {
            return Vec::new();
        }

        let batch_size = self.policy.batch_size.max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(batch_size.min(addresses.len()))
            .thread_name(|i| format!("geocode-{i}"))
            .build();
        if let Err(err) = &pool {
            warn!(error = %err, "falling back to the global rayon pool for geocoding");
        }

        let mut results = Vec::with_capacity(addresses.len());
        for (index, batch) in addresses.chunks(batch_size).enumerate() {
            if index > 0 {
                self.pause.pause(self.policy.batch_delay());
            }
            debug!(batch = index, size = batch.len(), "geocoding batch");
            let resolve = || -> Vec<Resolution> {
                batch
                    .par_iter()
                    .map(|address| self.geocoder.resolve(address.as_ref()))
                    .collect()
            };
            let settled = match &pool {
                Ok(pool) => pool.install(resolve),
                Err(_) => resolve(),
            };
            results.extend(settled);
        }

        let failed = results.iter().filter(|result| result.is_err()).count();
        if failed > 0 {
            warn!(failed, total = results.len(), "some addresses could not be geocoded");
        } else {
            info!(total = results.len(), "all addresses geocoded");
        }
        results
    }
}

//! Travel matrix assembly in provider-sized blocks.

use tracing::{debug, warn};

use crate::config::{MatrixPolicy, RetryPolicy};
use crate::error::MatrixError;
use crate::haversine::HaversineEstimator;
use crate::model::{Coordinate, LegMetrics};
use crate::retry::with_backoff;
use crate::traits::{Pause, RoutingProvider};

/// Origin-by-destination travel costs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TravelMatrix {
    cells: Vec<Vec<LegMetrics>>,
    estimated: usize,
}

impl TravelMatrix {
    pub fn get(&self, origin: usize, destination: usize) -> LegMetrics {
        self.cells[origin][destination]
    }

    /// Durations in seconds, `[origin][destination]`.
    pub fn durations(&self) -> Vec<Vec<f64>> {
        self.cells
            .iter()
            .map(|row| row.iter().map(|cell| cell.duration_seconds).collect())
            .collect()
    }

    /// Number of cells filled from the haversine estimate.
    pub fn estimated_cells(&self) -> usize {
        self.estimated
    }
}

/// Requests a matrix from a [`RoutingProvider`] block by block, filling any
/// cell the provider fails to return with a haversine estimate.
pub struct MatrixBuilder<'a, R: ?Sized> {
    provider: &'a R,
    policy: MatrixPolicy,
    retry: RetryPolicy,
    pause: &'a dyn Pause,
}

impl<'a, R> MatrixBuilder<'a, R>
where
    R: RoutingProvider + ?Sized,
{
    pub fn new(
        provider: &'a R,
        policy: MatrixPolicy,
        retry: RetryPolicy,
        pause: &'a dyn Pause,
    ) -> Self {
        Self {
            provider,
            policy,
            retry,
            pause,
        }
    }

    pub fn build(
        &self,
        origins: &[Coordinate],
        destinations: &[Coordinate],
    ) -> Result<TravelMatrix, MatrixError> {
        let estimator = HaversineEstimator::new(self.policy.fallback_speed_kmh);
        let block = self.policy.block_size.max(1);
        let mut cells = vec![vec![LegMetrics::default(); destinations.len()]; origins.len()];
        let mut estimated = 0;
        let mut requests = 0;

        for (row_block, block_origins) in origins.chunks(block).enumerate() {
            for (col_block, block_destinations) in destinations.chunks(block).enumerate() {
                if requests > 0 {
                    self.pause.pause(self.policy.block_delay());
                }
                requests += 1;

                let row_offset = row_block * block;
                let col_offset = col_block * block;
                let answer = with_backoff(&self.retry, self.pause, "matrix", |_| {
                    self.provider.compute_matrix(block_origins, block_destinations)
                });
                let answer = match answer {
                    Ok(answer) => answer,
                    Err(err) if err.is_transient() => {
                        warn!(
                            status = %err.status,
                            row_offset,
                            col_offset,
                            "matrix block unavailable, estimating"
                        );
                        Vec::new()
                    }
                    Err(err) => return Err(err.into()),
                };

                for (i, origin) in block_origins.iter().enumerate() {
                    for (j, destination) in block_destinations.iter().enumerate() {
                        let cell = answer.get(i).and_then(|row| row.get(j)).copied().flatten();
                        cells[row_offset + i][col_offset + j] = match cell {
                            Some(metrics) => metrics,
                            None => {
                                estimated += 1;
                                estimator.estimate(*origin, *destination)
                            }
                        };
                    }
                }
            }
        }

        if estimated > 0 {
            warn!(estimated, "matrix cells filled from haversine estimate");
        }
        debug!(
            origins = origins.len(),
            destinations = destinations.len(),
            requests,
            "matrix built"
        );
        Ok(TravelMatrix { cells, estimated })
    }
}

//! Route optimization entry point.
//!
//! Validates input, resolves addresses, then either hands the whole stop
//! set to the routing provider in one call or partitions it into clusters
//! that are optimized one by one and stitched together.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::batch::BatchResolver;
use crate::cache::GeocodeCache;
use crate::cluster::{cluster_count, order_clusters, partition};
use crate::config::PlannerConfig;
use crate::error::RouteError;
use crate::geocoder::RetryingGeocoder;
use crate::haversine::haversine_km;
use crate::matrix::MatrixBuilder;
use crate::model::{
    Coordinate, LegMetrics, LocatedStop, OptimizeOptions, OptimizedRoute, RouteStats, RouteWarning,
    Stop,
};
use crate::retry::with_backoff;
use crate::sequencer::nearest_neighbor;
use crate::traits::{GeocodingProvider, Pause, RouteRequest, RoutingProvider, ThreadPause};

/// Orders delivery stops using a geocoding and a routing provider.
///
/// The geocode cache is shared: clone the `Arc` into every planner of the
/// process so lookups survive across calls.
pub struct RoutePlanner<G, R> {
    geocoder: G,
    router: R,
    cache: Arc<GeocodeCache>,
    config: PlannerConfig,
    pause: Arc<dyn Pause>,
}

impl<G, R> RoutePlanner<G, R>
where
    G: GeocodingProvider,
    R: RoutingProvider,
{
    pub fn new(geocoder: G, router: R, cache: Arc<GeocodeCache>) -> Self {
        Self {
            geocoder,
            router,
            cache,
            config: PlannerConfig::default(),
            pause: Arc::new(ThreadPause),
        }
    }

    pub fn with_config(mut self, config: PlannerConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the waiting strategy used for backoff and pacing.
    pub fn with_pause(mut self, pause: Arc<dyn Pause>) -> Self {
        self.pause = pause;
        self
    }

    pub fn cache(&self) -> &Arc<GeocodeCache> {
        &self.cache
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Most stops one provider call can order, counting origin and destination.
    pub fn single_shot_capacity(&self, has_initial_location: bool) -> usize {
        let waypoints = self.config.max_waypoints.max(1);
        if has_initial_location { waypoints + 1 } else { waypoints + 2 }
    }

    pub fn optimize_route(
        &self,
        stops: &[Stop],
        options: &OptimizeOptions,
    ) -> Result<OptimizedRoute, RouteError> {
        if stops.is_empty() {
            return Err(RouteError::EmptyRoute);
        }

        let missing: Vec<String> = stops
            .iter()
            .filter(|stop| !stop.has_address())
            .map(|stop| stop.name.clone())
            .collect();
        if !missing.is_empty() {
            return Err(RouteError::MissingAddress { names: missing });
        }

        for stop in stops {
            if let Some(coordinate) = stop.coordinate.filter(|c| !c.is_valid()) {
                return Err(invalid_coordinate(&stop.name, coordinate));
            }
        }
        if let Some(coordinate) = options.initial_location.filter(|c| !c.is_valid()) {
            return Err(invalid_coordinate("initial location", coordinate));
        }

        if stops.len() == 1 {
            return Ok(OptimizedRoute {
                stops: stops.to_vec(),
                ..OptimizedRoute::default()
            });
        }

        let (located, warnings) = self.resolve(stops)?;
        if located.len() == 1 {
            return Ok(OptimizedRoute {
                stops: located.into_iter().map(LocatedStop::into_stop).collect(),
                stats: RouteStats::default(),
                warnings,
            });
        }

        let (ordered, stats) = self.plan(located, options.initial_location)?;
        let skipped = warnings
            .iter()
            .filter(|w| matches!(w, RouteWarning::Unresolved { .. }))
            .count();
        info!(
            stops = ordered.len(),
            distance_m = stats.total_distance,
            duration_s = stats.total_duration,
            skipped,
            "route optimized"
        );
        Ok(OptimizedRoute {
            stops: ordered.into_iter().map(LocatedStop::into_stop).collect(),
            stats,
            warnings,
        })
    }

    /// Attaches coordinates, dropping stops that cannot be located.
    fn resolve(&self, stops: &[Stop]) -> Result<(Vec<LocatedStop>, Vec<RouteWarning>), RouteError> {
        let pending: Vec<&Stop> = stops.iter().filter(|stop| stop.coordinate.is_none()).collect();
        let already_located = stops.len() - pending.len();

        let geocoder = RetryingGeocoder::new(
            &self.geocoder,
            self.cache.as_ref(),
            self.config.geocode_retry,
            self.pause.as_ref(),
        );
        let resolver = BatchResolver::new(&geocoder, self.config.batch, self.pause.as_ref());
        let addresses: Vec<&str> = pending.iter().map(|stop| stop.address.as_str()).collect();

        let resolutions = resolver.settle_all(&addresses);
        if already_located == 0 && resolutions.iter().all(Result::is_err) {
            return Err(RouteError::NoAddressesResolved {
                attempted: stops.len(),
            });
        }
        let mut resolutions = resolutions.into_iter();

        let mut located = Vec::with_capacity(stops.len());
        let mut warnings = Vec::new();
        for stop in stops {
            if let Some(coordinate) = stop.coordinate {
                located.push(LocatedStop::new(stop.clone(), coordinate));
                continue;
            }
            let Some(resolution) = resolutions.next() else { break };
            match resolution {
                Ok(found) => {
                    if found.partial_match {
                        warnings.push(RouteWarning::PartialMatch {
                            id: stop.id.clone(),
                            name: stop.name.clone(),
                            address: stop.address.clone(),
                        });
                    }
                    located.push(LocatedStop::new(stop.clone(), found.coordinate));
                }
                Err(err) => {
                    let reason = err.cause.to_string();
                    warn!(name = %stop.name, address = %stop.address, %reason, "skipping stop");
                    warnings.push(RouteWarning::Unresolved {
                        id: stop.id.clone(),
                        name: stop.name.clone(),
                        address: stop.address.clone(),
                        reason,
                    });
                }
            }
        }

        if located.is_empty() {
            return Err(RouteError::NoAddressesResolved { attempted: stops.len() });
        }
        Ok((located, warnings))
    }

    fn plan(
        &self,
        stops: Vec<LocatedStop>,
        initial: Option<Coordinate>,
    ) -> Result<(Vec<LocatedStop>, RouteStats), RouteError> {
        let capacity = self.single_shot_capacity(initial.is_some());
        if stops.len() <= capacity {
            debug!(stops = stops.len(), capacity, "single-shot route");
            self.single_shot(stops, initial)
        } else {
            info!(stops = stops.len(), capacity, "route exceeds provider limit, partitioning");
            self.partitioned(stops, initial)
        }
    }

    fn single_shot(
        &self,
        stops: Vec<LocatedStop>,
        initial: Option<Coordinate>,
    ) -> Result<(Vec<LocatedStop>, RouteStats), RouteError> {
        if stops.len() == 1 && initial.is_none() {
            return Ok((stops, RouteStats::default()));
        }

        let stops = if self.config.seed_order && stops.len() > 2 {
            let order = self.seed_order(&stops, initial)?;
            let mut slots: Vec<Option<LocatedStop>> = stops.into_iter().map(Some).collect();
            order.into_iter().filter_map(|i| slots[i].take()).collect()
        } else {
            stops
        };

        let mut stops = stops;
        let Some(last) = stops.pop() else {
            return Ok((stops, RouteStats::default()));
        };
        let (origin, head, waypoint_stops) = match initial {
            Some(origin) => (origin, None, stops),
            None => {
                let mut rest = stops.into_iter();
                let Some(first) = rest.next() else {
                    return Ok((vec![last], RouteStats::default()));
                };
                (first.coordinate, Some(first), rest.collect::<Vec<_>>())
            }
        };

        let request = RouteRequest {
            origin,
            destination: last.coordinate,
            waypoints: waypoint_stops.iter().map(|stop| stop.coordinate).collect(),
            optimize_waypoints: waypoint_stops.len() > 1,
            traffic_aware: self.config.traffic_aware,
        };
        let response = with_backoff(&self.config.routing_retry, self.pause.as_ref(), "route", |_| {
            self.router.compute_route(&request)
        })?;

        if response.legs.len() != request.waypoints.len() + 1 {
            return Err(RouteError::MalformedResponse {
                expected: format!("{} legs", request.waypoints.len() + 1),
                got: format!("{} legs", response.legs.len()),
            });
        }
        let order = waypoint_permutation(&response.waypoint_order, waypoint_stops.len())?;

        let mut slots: Vec<Option<LocatedStop>> = waypoint_stops.into_iter().map(Some).collect();
        let mut ordered = Vec::with_capacity(slots.len() + 2);
        ordered.extend(head);
        ordered.extend(order.into_iter().filter_map(|i| slots[i].take()));
        ordered.push(last);

        let stats = match initial {
            Some(_) => {
                let (start, rest) = response.legs.split_at(1);
                let mut stats = RouteStats::from_legs(rest);
                stats.start_leg = start.first().copied();
                stats
            }
            None => RouteStats::from_legs(&response.legs),
        };
        Ok((ordered, stats))
    }

    /// Nearest-neighbor order over a provider travel matrix. Starts at the
    /// first stop, or at the stop closest to `initial` when given.
    fn seed_order(
        &self,
        stops: &[LocatedStop],
        initial: Option<Coordinate>,
    ) -> Result<Vec<usize>, RouteError> {
        let coordinates: Vec<Coordinate> = stops.iter().map(|stop| stop.coordinate).collect();
        let matrix = self.matrix_builder().build(&coordinates, &coordinates)?;
        let start = initial.map_or(0, |origin| {
            coordinates
                .iter()
                .enumerate()
                .min_by(|(_, a), (_, b)| {
                    haversine_km(origin, **a).total_cmp(&haversine_km(origin, **b))
                })
                .map_or(0, |(i, _)| i)
        });
        debug!(
            stops = stops.len(),
            start,
            estimated = matrix.estimated_cells(),
            "seeding waypoint order"
        );
        Ok(nearest_neighbor(&matrix.durations(), start))
    }

    fn partitioned(
        &self,
        stops: Vec<LocatedStop>,
        initial: Option<Coordinate>,
    ) -> Result<(Vec<LocatedStop>, RouteStats), RouteError> {
        let total = stops.len();
        let k = cluster_count(total, self.config.max_waypoints);
        let mut clusters = partition(stops, k);
        if clusters.iter().any(|cluster| cluster.len() == total) {
            let chunk = self.single_shot_capacity(true);
            warn!(total, chunk, "k-means made no progress, splitting in input order");
            let stops: Vec<LocatedStop> = clusters.into_iter().flatten().collect();
            clusters = chunked(stops, chunk);
        }
        let clusters = order_clusters(clusters, initial);
        info!(
            clusters = clusters.len(),
            sizes = ?clusters.iter().map(Vec::len).collect::<Vec<_>>(),
            "optimizing clusters"
        );

        let mut ordered: Vec<LocatedStop> = Vec::with_capacity(total);
        let mut stats = RouteStats::default();
        for (index, cluster) in clusters.into_iter().enumerate() {
            let anchor = if index == 0 { initial } else { None };
            let (cluster_stops, cluster_stats) = self.plan(cluster, anchor)?;
            match (ordered.last(), cluster_stops.first()) {
                (Some(previous), Some(next)) => {
                    let connecting = self.connecting_leg(previous.coordinate, next.coordinate)?;
                    stats.push_leg(connecting);
                    stats.extend(cluster_stats);
                }
                _ => {
                    stats.start_leg = cluster_stats.start_leg;
                    stats.extend(cluster_stats);
                }
            }
            ordered.extend(cluster_stops);
        }
        Ok((ordered, stats))
    }

    fn connecting_leg(&self, from: Coordinate, to: Coordinate) -> Result<LegMetrics, RouteError> {
        let matrix = self.matrix_builder().build(&[from], &[to])?;
        Ok(matrix.get(0, 0))
    }

    fn matrix_builder(&self) -> MatrixBuilder<'_, R> {
        MatrixBuilder::new(
            &self.router,
            self.config.matrix,
            self.config.routing_retry,
            self.pause.as_ref(),
        )
    }
}

fn invalid_coordinate(name: &str, coordinate: Coordinate) -> RouteError {
    RouteError::InvalidCoordinate {
        name: name.to_string(),
        lat: coordinate.lat,
        lng: coordinate.lng,
    }
}

/// Validates the provider's waypoint order; an empty order means "as sent".
fn waypoint_permutation(order: &[usize], len: usize) -> Result<Vec<usize>, RouteError> {
    if order.is_empty() {
        return Ok((0..len).collect());
    }
    let mut seen = vec![false; len];
    let valid = order.len() == len
        && order
            .iter()
            .all(|&i| i < len && !std::mem::replace(&mut seen[i], true));
    if valid {
        Ok(order.to_vec())
    } else {
        Err(RouteError::MalformedResponse {
            expected: format!("permutation of {len} waypoints"),
            got: format!("{order:?}"),
        })
    }
}

fn chunked(stops: Vec<LocatedStop>, size: usize) -> Vec<Vec<LocatedStop>> {
    let size = size.max(1);
    let mut chunks = Vec::with_capacity(stops.len().div_ceil(size));
    let mut current = Vec::with_capacity(size);
    for stop in stops {
        current.push(stop);
        if current.len() == size {
            chunks.push(std::mem::replace(&mut current, Vec::with_capacity(size)));
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_waypoint_order_is_identity() {
        assert_eq!(waypoint_permutation(&[], 3).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn waypoint_order_must_be_a_permutation() {
        assert_eq!(waypoint_permutation(&[2, 0, 1], 3).unwrap(), vec![2, 0, 1]);
        assert!(waypoint_permutation(&[0, 0, 1], 3).is_err());
        assert!(waypoint_permutation(&[0, 1], 3).is_err());
        assert!(waypoint_permutation(&[0, 1, 3], 3).is_err());
    }

    #[test]
    fn chunks_keep_order() {
        let stops: Vec<LocatedStop> = (0..7)
            .map(|i| {
                LocatedStop::new(Stop::new(i.to_string(), "s", "a"), Coordinate::new(0.0, 0.0))
            })
            .collect();
        let chunks = chunked(stops, 3);
        let sizes: Vec<usize> = chunks.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![3, 3, 1]);
        assert_eq!(chunks[2][0].stop.id, "6");
    }
}

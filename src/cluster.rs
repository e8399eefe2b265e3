//! Geographic partitioning of oversized stop sets.
//!
//! K-means over (lat, lng) with farthest-point seeding. The result is
//! approximate; it only has to yield groups small enough to optimize one
//! provider call at a time.

use tracing::debug;

use crate::haversine::haversine_km;
use crate::model::{Coordinate, LocatedStop};
use crate::sequencer::nearest_neighbor;

/// Centroid movement, in degrees, below which k-means has converged.
pub const EPSILON: f64 = 1e-4;

pub const MAX_ITERATIONS: usize = 100;

/// Clusters needed so each holds at most `max_per_cluster` stops on average.
pub fn cluster_count(stops: usize, max_per_cluster: usize) -> usize {
    stops.div_ceil(max_per_cluster.max(1)).max(1)
}

/// Splits `stops` into at most `k` non-empty clusters. Members keep their
/// relative input order; clusters come out in seeding order.
pub fn partition(stops: Vec<LocatedStop>, k: usize) -> Vec<Vec<LocatedStop>> {
    if stops.is_empty() {
        return Vec::new();
    }
    let k = k.clamp(1, stops.len());
    let points: Vec<Coordinate> = stops.iter().map(|stop| stop.coordinate).collect();
    let assignments = kmeans(&points, k);

    let mut clusters: Vec<Vec<LocatedStop>> = (0..k).map(|_| Vec::new()).collect();
    for (stop, cluster) in stops.into_iter().zip(assignments) {
        clusters[cluster].push(stop);
    }
    clusters.retain(|cluster| !cluster.is_empty());
    debug!(
        k,
        clusters = clusters.len(),
        sizes = ?clusters.iter().map(Vec::len).collect::<Vec<_>>(),
        "partitioned stops"
    );
    clusters
}

fn kmeans(points: &[Coordinate], k: usize) -> Vec<usize> {
    let mut centers = farthest_point_seeds(points, k);
    let mut assignments = vec![0usize; points.len()];

    for iteration in 0..MAX_ITERATIONS {
        for (point, assigned) in points.iter().zip(assignments.iter_mut()) {
            *assigned = nearest_center(point, &centers);
        }

        let mut sums = vec![(0.0, 0.0); k];
        let mut counts = vec![0usize; k];
        for (point, cluster) in points.iter().zip(&assignments) {
            sums[*cluster].0 += point.lat;
            sums[*cluster].1 += point.lng;
            counts[*cluster] += 1;
        }

        let mut max_shift: f64 = 0.0;
        for (center, (sum, count)) in centers.iter_mut().zip(sums.into_iter().zip(counts)) {
            if count == 0 {
                continue;
            }
            let moved = Coordinate::new(sum.0 / count as f64, sum.1 / count as f64);
            max_shift = max_shift.max(center.squared_distance(&moved).sqrt());
            *center = moved;
        }

        if max_shift <= EPSILON {
            debug!(iterations = iteration + 1, "k-means converged");
            break;
        }
    }

    assignments
}

/// First seed is the first point; each next seed is the point farthest
/// from every seed chosen so far.
fn farthest_point_seeds(points: &[Coordinate], k: usize) -> Vec<Coordinate> {
    let mut centers = Vec::with_capacity(k);
    centers.push(points[0]);
    while centers.len() < k {
        let mut best = (0, f64::NEG_INFINITY);
        for (i, point) in points.iter().enumerate() {
            let nearest = centers
                .iter()
                .map(|center| point.squared_distance(center))
                .fold(f64::INFINITY, f64::min);
            if nearest > best.1 {
                best = (i, nearest);
            }
        }
        centers.push(points[best.0]);
    }
    centers
}

fn nearest_center(point: &Coordinate, centers: &[Coordinate]) -> usize {
    let mut best = (0, f64::INFINITY);
    for (i, center) in centers.iter().enumerate() {
        let distance = point.squared_distance(center);
        if distance < best.1 {
            best = (i, distance);
        }
    }
    best.0
}

/// Orders clusters for visiting. With an initial location, nearest first
/// by squared distance to each cluster's first stop. Without one, a
/// nearest-neighbor walk over cluster centroids from the first cluster.
pub fn order_clusters(
    clusters: Vec<Vec<LocatedStop>>,
    initial: Option<Coordinate>,
) -> Vec<Vec<LocatedStop>> {
    let mut clusters = clusters;
    match initial {
        Some(origin) => {
            let distance = |cluster: &Vec<LocatedStop>| {
                cluster
                    .first()
                    .map_or(f64::INFINITY, |stop| origin.squared_distance(&stop.coordinate))
            };
            clusters.sort_by(|a, b| distance(a).total_cmp(&distance(b)));
            clusters
        }
        None => {
            let centroids: Vec<Coordinate> = clusters.iter().map(|c| centroid(c)).collect();
            let costs: Vec<Vec<f64>> = centroids
                .iter()
                .map(|a| centroids.iter().map(|b| haversine_km(*a, *b)).collect())
                .collect();
            let order = nearest_neighbor(&costs, 0);
            let mut slots: Vec<Option<Vec<LocatedStop>>> = clusters.into_iter().map(Some).collect();
            order.into_iter().filter_map(|i| slots[i].take()).collect()
        }
    }
}

fn centroid(stops: &[LocatedStop]) -> Coordinate {
    let n = stops.len().max(1) as f64;
    let (lat, lng) = stops
        .iter()
        .fold((0.0, 0.0), |acc, stop| (acc.0 + stop.coordinate.lat, acc.1 + stop.coordinate.lng));
    Coordinate::new(lat / n, lng / n)
}

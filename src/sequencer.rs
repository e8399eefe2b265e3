//! Greedy nearest-neighbor visiting order.

/// Visits every index of a square cost matrix, always moving to the
/// cheapest unvisited index from the current one. Ties go to the lowest
/// index. An out-of-range `start` begins at 0.
pub fn nearest_neighbor(costs: &[Vec<f64>], start: usize) -> Vec<usize> {
    let n = costs.len();
    if n == 0 {
        return Vec::new();
    }

    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);
    let mut current = if start < n { start } else { 0 };
    visited[current] = true;
    order.push(current);

    while order.len() < n {
        let mut best: Option<(usize, f64)> = None;
        for (candidate, seen) in visited.iter().enumerate() {
            if *seen {
                continue;
            }
            let cost = costs[current].get(candidate).copied().unwrap_or(f64::INFINITY);
            if best.is_none_or(|(_, best_cost)| cost < best_cost) {
                best = Some((candidate, cost));
            }
        }
        let Some((next, _)) = best else { break };
        visited[next] = true;
        order.push(next);
        current = next;
    }

    order
}

//! Point ordering: arrange an unordered point set into a drawable
//! sequence using a greedy nearest-neighbor heuristic.
//!
//! Used by the feature selector for point-cloud features (jawline, nose)
//! that carry no connectivity. This is a travel heuristic, not a
//! shortest-path solver; pathological inputs can produce visibly
//! crossing paths, which is acceptable for landmark-sized sets.

use crate::types::Point;

/// Order points by greedy nearest-neighbor traversal.
///
/// Starts at the lexicographically smallest point (x, then y) and
/// repeatedly visits the nearest unvisited point. The output is a
/// permutation of the input. Ties — both for the start point and for
/// each step — are broken by the lowest original index, so the result
/// does not depend on incidental collection order.
#[must_use = "returns the ordered points"]
pub fn order_nearest_neighbor(points: &[Point]) -> Vec<Point> {
    if points.is_empty() {
        return Vec::new();
    }

    let mut visited = vec![false; points.len()];
    let mut ordered = Vec::with_capacity(points.len());

    let start = lexicographic_min(points);
    visited[start] = true;
    ordered.push(points[start]);
    let mut current = points[start];

    for _ in 1..points.len() {
        let mut best: Option<usize> = None;
        let mut best_dist = f64::INFINITY;

        for (j, &candidate) in points.iter().enumerate() {
            if visited[j] {
                continue;
            }
            let dist = current.distance_squared(candidate);
            // Strict comparison keeps the lowest index on ties.
            if dist < best_dist {
                best_dist = dist;
                best = Some(j);
            }
        }

        // The loop invariant guarantees at least one unvisited point, so
        // `best` is always `Some` here. `continue` satisfies the type
        // system without panicking.
        let Some(best_idx) = best else {
            continue;
        };

        visited[best_idx] = true;
        ordered.push(points[best_idx]);
        current = points[best_idx];
    }

    ordered
}

/// Index of the lexicographically smallest point (x, then y), lowest
/// index on exact ties.
fn lexicographic_min(points: &[Point]) -> usize {
    let mut min_idx = 0;
    for (i, p) in points.iter().enumerate().skip(1) {
        let min = points[min_idx];
        if p.x < min.x || (p.x == min.x && p.y < min.y) {
            min_idx = i;
        }
    }
    min_idx
}

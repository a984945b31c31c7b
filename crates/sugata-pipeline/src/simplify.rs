//! Curve simplification using the Ramer-Douglas-Peucker algorithm.
//!
//! Reduces point count in captured contours by removing points that are
//! within a given tolerance of the line between their neighbors.
//! Implemented from scratch (~30 lines) over the pipeline's own point
//! type; an explicit work-list of index ranges replaces the textbook
//! recursion so multi-thousand-point silhouette contours cannot overflow
//! the stack.
//!
//! Runs on whole-subject silhouettes before labeling and on each body
//! region during contour preparation.

use crate::types::{Point, Polyline};

/// Simplify a single polyline using the Ramer-Douglas-Peucker algorithm.
///
/// Points within `tolerance` units of the line between their endpoints
/// are removed. The output is always an index-order subsequence of the
/// input that keeps the first and last point.
///
/// Polylines with fewer than 3 points are returned unchanged (nothing
/// to simplify).
#[must_use = "returns the simplified polyline"]
pub fn simplify(polyline: &Polyline, tolerance: f64) -> Polyline {
    let points = polyline.points();
    if points.len() < 3 {
        return polyline.clone();
    }

    let mut kept = vec![false; points.len()];
    kept[0] = true;
    kept[points.len() - 1] = true;

    // Work-list of (start, end) index ranges still to examine.
    let mut ranges = vec![(0, points.len() - 1)];
    while let Some((start, end)) = ranges.pop() {
        if end <= start + 1 {
            continue;
        }

        // Farthest interior point from the chord (start, end). Ties keep
        // the first index that attains the maximum.
        let mut max_dist = 0.0;
        let mut max_idx = start;
        for i in (start + 1)..end {
            let d = perpendicular_distance(points[i], points[start], points[end]);
            if d > max_dist {
                max_dist = d;
                max_idx = i;
            }
        }

        if max_dist > tolerance {
            kept[max_idx] = true;
            ranges.push((start, max_idx));
            ranges.push((max_idx, end));
        }
    }

    let simplified: Vec<Point> = points
        .iter()
        .zip(&kept)
        .filter(|&(_, k)| *k)
        .map(|(&p, _)| p)
        .collect();

    Polyline::new(simplified)
}

/// Simplify multiple polylines, applying RDP to each independently.
#[must_use = "returns the simplified polylines"]
pub fn simplify_paths(polylines: &[Polyline], tolerance: f64) -> Vec<Polyline> {
    polylines.iter().map(|pl| simplify(pl, tolerance)).collect()
}

/// Perpendicular distance from point `p` to the infinite line through
/// `a` and `b`.
///
/// When `a` and `b` coincide, returns the distance from `p` to `a`.
/// A numerically zero line length returns 0.0 rather than dividing
/// by zero.
#[must_use]
pub fn perpendicular_distance(p: Point, a: Point, b: Point) -> f64 {
    if a == b {
        return p.distance(a);
    }

    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let length = dx.mul_add(dx, dy * dy).sqrt();
    if length == 0.0 {
        return 0.0;
    }

    // |cross product| / |line length|
    let cross = dx.mul_add(a.y - p.y, -(dy * (a.x - p.x)));
    cross.abs() / length
}

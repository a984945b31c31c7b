//! Arc-length resampling: emit evenly spaced points along a polyline by
//! cumulative distance rather than by index.
//!
//! The viewer renders the composite as raw line segments, so capture
//! polylines with wildly uneven vertex spacing would shade unevenly.
//! Resampling at a fixed step gives the ring a uniform texture.

use sugata_pipeline::Point3;

/// Tolerance below which two samples count as the same point.
const SAME_POINT_EPS: f64 = 1e-9;

/// Resample a polyline at fixed arc-length steps.
///
/// Walks cumulative arc length and emits a linearly interpolated point
/// every `step` units. The original first and last points are always
/// included; zero-length segments contribute no additional samples and
/// consecutive duplicates are suppressed.
///
/// Polylines with fewer than 2 points are returned as-is; a polyline
/// with zero total length collapses to its first point.
#[must_use = "returns the resampled polyline"]
pub fn resample_by_length(polyline: &[Point3], step: f64) -> Vec<Point3> {
    if polyline.len() < 2 {
        return polyline.to_vec();
    }

    let lengths: Vec<f64> = polyline
        .windows(2)
        .map(|pair| pair[0].distance(pair[1]))
        .collect();
    let total_len: f64 = lengths.iter().sum();
    if total_len == 0.0 {
        return vec![polyline[0]];
    }

    let mut out = vec![polyline[0]];
    let mut accumulated = 0.0;
    let mut target = 0.0;

    for (i, &seg_len) in lengths.iter().enumerate() {
        let start = polyline[i];
        let end = polyline[i + 1];
        let start_dist = accumulated;
        let end_dist = accumulated + seg_len;

        while target <= end_dist {
            if target >= start_dist {
                let ratio = if seg_len == 0.0 {
                    0.0
                } else {
                    (target - start_dist) / seg_len
                };
                let sample = Point3::new(
                    ratio.mul_add(end.x - start.x, start.x),
                    ratio.mul_add(end.y - start.y, start.y),
                    ratio.mul_add(end.z - start.z, start.z),
                );
                if out
                    .last()
                    .is_none_or(|&last| sample.distance(last) > SAME_POINT_EPS)
                {
                    out.push(sample);
                }
            }
            target += step;
        }

        accumulated += seg_len;
    }

    // Always carry the original endpoint.
    if let (Some(&tail), Some(&last)) = (out.last(), polyline.last())
        && tail.distance(last) > SAME_POINT_EPS
    {
        out.push(last);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64) -> Point3 {
        Point3::new(x, 0.0, 0.0)
    }

    #[test]
    fn short_polylines_pass_through() {
        assert!(resample_by_length(&[], 5.0).is_empty());
        assert_eq!(resample_by_length(&[p(3.0)], 5.0), vec![p(3.0)]);
    }

    #[test]
    fn zero_length_polyline_collapses_to_first_point() {
        let pl = [p(1.0), p(1.0), p(1.0)];
        assert_eq!(resample_by_length(&pl, 5.0), vec![p(1.0)]);
    }

    #[test]
    fn straight_segment_samples_at_fixed_step() {
        let pl = [p(0.0), p(10.0)];
        let out = resample_by_length(&pl, 2.5);
        // Samples at 0, 2.5, 5, 7.5, 10 — the endpoint lands exactly.
        assert_eq!(out.len(), 5);
        assert!((out[1].x - 2.5).abs() < 1e-9);
        assert!((out[4].x - 10.0).abs() < 1e-9);
    }

    #[test]
    fn endpoint_is_included_even_off_step() {
        let pl = [p(0.0), p(10.0)];
        let out = resample_by_length(&pl, 4.0);
        // Samples at 0, 4, 8, then the forced endpoint at 10.
        assert_eq!(out.len(), 4);
        assert!((out[3].x - 10.0).abs() < 1e-9);
    }

    #[test]
    fn interpolation_crosses_vertex_boundaries() {
        // Two 5-unit segments; a step of 4 interpolates inside both.
        let pl = [p(0.0), p(5.0), p(10.0)];
        let out = resample_by_length(&pl, 4.0);
        assert!((out[1].x - 4.0).abs() < 1e-9);
        assert!((out[2].x - 8.0).abs() < 1e-9);
        assert!((out[3].x - 10.0).abs() < 1e-9);
    }

    #[test]
    fn zero_length_interior_segment_adds_no_samples() {
        let pl = [p(0.0), p(5.0), p(5.0), p(10.0)];
        let with_dup = resample_by_length(&pl, 2.0);
        let without_dup = resample_by_length(&[p(0.0), p(5.0), p(10.0)], 2.0);
        assert_eq!(with_dup, without_dup);
    }

    #[test]
    fn resampling_preserves_3d_components() {
        let pl = [Point3::new(0.0, 0.0, 0.0), Point3::new(0.0, 6.0, 8.0)];
        let out = resample_by_length(&pl, 5.0);
        // Length 10; sample at 5 is the midpoint (0, 3, 4).
        assert!((out[1].y - 3.0).abs() < 1e-9);
        assert!((out[1].z - 4.0).abs() < 1e-9);
    }
}

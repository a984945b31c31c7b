//! Cylindrical composite: lay captured subjects side by side and wrap
//! the result onto a cylinder surface.
//!
//! The viewer shows a whole session as one ring: each subject's contour
//! occupies a fixed-width slot along x, and the full composite x range
//! is mapped linearly onto [0, 2π) so the first and last subjects meet.
//!
//! This path consumes the **pre-transform** capture records — the
//! device-space transform would destroy the side-by-side layout.

use serde::{Deserialize, Serialize};
use sugata_pipeline::Point3;
use sugata_pipeline::capture::CaptureRecord;

/// Configuration for the cylindrical composite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CylinderConfig {
    /// Cylinder radius. The installation derives this from aggregate
    /// subject height statistics upstream; the default suits a session
    /// of full-height captures.
    pub radius: f64,

    /// Horizontal slot width per subject.
    pub x_offset_increment: f64,

    /// Consecutive points farther apart than this break the polyline.
    /// Prevents spurious chords bridging real capture gaps.
    pub max_gap: f64,

    /// Arc-length resampling step for the renderable buffer.
    pub sample_step: f64,

    /// Negate z at export (the viewer's camera convention).
    pub flip_z: bool,
}

impl CylinderConfig {
    /// Default cylinder radius.
    pub const DEFAULT_RADIUS: f64 = 750.0;
    /// Default per-subject slot width.
    pub const DEFAULT_X_OFFSET_INCREMENT: f64 = 639.0;
    /// Default segment-break distance.
    pub const DEFAULT_MAX_GAP: f64 = 80.0;
    /// Default resampling step.
    pub const DEFAULT_SAMPLE_STEP: f64 = 8.0;
}

impl Default for CylinderConfig {
    fn default() -> Self {
        Self {
            radius: Self::DEFAULT_RADIUS,
            x_offset_increment: Self::DEFAULT_X_OFFSET_INCREMENT,
            max_gap: Self::DEFAULT_MAX_GAP,
            sample_step: Self::DEFAULT_SAMPLE_STEP,
            flip_z: true,
        }
    }
}

/// Assemble the flat, multi-subject line set from prepared records.
///
/// Contour regions become gap-split polylines in the subject's x slot;
/// facial features contribute their connection segments plus
/// nearest-partner pairs for the jawline back half and the nose's kept
/// landmarks. Whole-subject silhouettes and time-axis markers are not
/// part of the composite.
#[must_use = "returns the flat composite line set"]
pub fn flat_lines(records: &[CaptureRecord], config: &CylinderConfig) -> Vec<Vec<Point3>> {
    let mut polylines = Vec::new();
    let mut contour_index: u32 = 0;
    let mut current_x_offset = 0.0;

    for record in records {
        match record {
            CaptureRecord::Contour { categories, .. } => {
                let x_offset = f64::from(contour_index) * config.x_offset_increment;
                contour_index += 1;
                current_x_offset = x_offset;

                for points in categories.values() {
                    let offset: Vec<Point3> = points
                        .iter()
                        .map(|p| Point3::new(p.x + x_offset, p.y, 0.0))
                        .collect();
                    polylines.extend(split_by_gap(&offset, config.max_gap));
                }
            }
            CaptureRecord::FacialFeatures { categories } => {
                let x_offset = current_x_offset;

                for (name, capture) in categories {
                    let positions: std::collections::BTreeMap<u32, Point3> = capture
                        .points
                        .iter()
                        .map(|lm| (lm.index, Point3::new(lm.x + x_offset, lm.y, 0.0)))
                        .collect();

                    match name.as_str() {
                        "jawline" => {
                            let mut pts: Vec<Point3> = positions.values().copied().collect();
                            pts.sort_by(|a, b| a.y.total_cmp(&b.y));
                            let kept = &pts[pts.len() / 2..];
                            polylines.extend(nearest_partner_segments(kept));
                        }
                        "nose" => {
                            let mut pts: Vec<Point3> = positions.values().copied().collect();
                            pts.sort_by(|a, b| a.y.total_cmp(&b.y));
                            let mut kept = Vec::with_capacity(2);
                            if let Some(&p) = pts.get(2) {
                                kept.push(p);
                            }
                            if let Some(&p) = pts.get(6) {
                                kept.push(p);
                            }
                            polylines.extend(nearest_partner_segments(&kept));
                        }
                        _ => {
                            for conn in &capture.connections {
                                if let (Some(&a), Some(&b)) =
                                    (positions.get(&conn.start), positions.get(&conn.end))
                                    && a.distance(b) <= config.max_gap
                                {
                                    polylines.push(vec![a, b]);
                                }
                            }
                        }
                    }
                }
            }
            CaptureRecord::FullContour { .. } | CaptureRecord::Line { .. } => {}
        }
    }

    polylines
}

/// Split a point stream wherever consecutive points exceed `max_gap`.
/// Fragments shorter than 2 points are dropped.
fn split_by_gap(points: &[Point3], max_gap: f64) -> Vec<Vec<Point3>> {
    let mut rest = points.iter().copied();
    let Some(first) = rest.next() else {
        return Vec::new();
    };

    let mut segments = Vec::new();
    let mut current = vec![first];
    for p in rest {
        // current always has a last element.
        let gap = current.last().map_or(f64::INFINITY, |&last| last.distance(p));
        if gap <= max_gap {
            current.push(p);
        } else {
            if current.len() > 1 {
                segments.push(current);
            }
            current = vec![p];
        }
    }
    if current.len() > 1 {
        segments.push(current);
    }
    segments
}

/// Pair each point with its nearest partner as a two-point segment.
///
/// Produces one segment per point (a point set of n yields n segments,
/// with symmetric pairs drawn twice, matching the viewer's look).
/// Fewer than 2 points yield nothing.
fn nearest_partner_segments(points: &[Point3]) -> Vec<Vec<Point3>> {
    if points.len() < 2 {
        return Vec::new();
    }

    let mut segments = Vec::with_capacity(points.len());
    for (i, &pt) in points.iter().enumerate() {
        let mut best: Option<Point3> = None;
        let mut best_dist = f64::INFINITY;
        for (j, &other) in points.iter().enumerate() {
            if i == j {
                continue;
            }
            let d = pt.distance(other);
            if d < best_dist {
                best_dist = d;
                best = Some(other);
            }
        }
        if let Some(closest) = best {
            segments.push(vec![pt, closest]);
        }
    }
    segments
}

/// Wrap the flat composite onto a cylinder of the given radius.
///
/// The overall x range maps linearly to θ ∈ [0, 2π);
/// `(x, y, _) -> (R·cos θ, y, R·sin θ)`. A composite with zero x extent
/// (or no points at all) is returned unprojected.
#[must_use = "returns the projected polylines"]
pub fn project_onto_cylinder(polylines: &[Vec<Point3>], radius: f64) -> Vec<Vec<Point3>> {
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    for p in polylines.iter().flatten() {
        min_x = min_x.min(p.x);
        max_x = max_x.max(p.x);
    }

    let range = max_x - min_x;
    if !range.is_finite() || range.abs() < 1e-9 {
        return polylines.to_vec();
    }

    polylines
        .iter()
        .map(|pl| {
            pl.iter()
                .map(|p| {
                    let theta = (p.x - min_x) / range * std::f64::consts::TAU;
                    Point3::new(radius * theta.cos(), p.y, radius * theta.sin())
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use sugata_pipeline::capture::{BodyRegion, Connection, FeatureCapture, LandmarkPoint};
    use sugata_pipeline::Point;

    use super::*;

    fn config() -> CylinderConfig {
        CylinderConfig::default()
    }

    fn contour(points: Vec<Point>) -> CaptureRecord {
        let mut categories = BTreeMap::new();
        categories.insert(BodyRegion::Body, points);
        CaptureRecord::Contour {
            categories,
            height_info: None,
        }
    }

    // --- split_by_gap / flat_lines ---

    #[test]
    fn contour_within_gap_stays_one_polyline() {
        let records = [contour(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(20.0, 0.0),
        ])];
        let lines = flat_lines(&records, &config());
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].len(), 3);
    }

    #[test]
    fn oversized_gap_splits_the_polyline() {
        let records = [contour(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(500.0, 0.0),
            Point::new(510.0, 0.0),
        ])];
        let lines = flat_lines(&records, &config());
        assert_eq!(lines.len(), 2, "the 490-unit gap must break the line");
        assert_eq!(lines[0].len(), 2);
        assert_eq!(lines[1].len(), 2);
    }

    #[test]
    fn lone_fragment_after_gap_is_dropped() {
        let records = [contour(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(500.0, 0.0),
        ])];
        let lines = flat_lines(&records, &config());
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn subjects_occupy_successive_x_slots() {
        let records = [
            contour(vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)]),
            contour(vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)]),
        ];
        let lines = flat_lines(&records, &config());
        assert_eq!(lines.len(), 2);
        assert!((lines[0][0].x - 0.0).abs() < f64::EPSILON);
        assert!((lines[1][0].x - 639.0).abs() < f64::EPSILON);
    }

    #[test]
    fn feature_connections_become_segments_in_the_subject_slot() {
        let mut categories = BTreeMap::new();
        categories.insert(
            "left_eye".to_owned(),
            FeatureCapture {
                points: vec![
                    LandmarkPoint {
                        index: 0,
                        x: 1.0,
                        y: 2.0,
                    },
                    LandmarkPoint {
                        index: 1,
                        x: 3.0,
                        y: 2.0,
                    },
                ],
                connections: vec![Connection { start: 0, end: 1 }],
            },
        );
        let records = [
            contour(vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)]),
            contour(vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)]),
            CaptureRecord::FacialFeatures { categories },
        ];
        let lines = flat_lines(&records, &config());
        // Two contour lines plus one eye segment, offset into slot 1.
        assert_eq!(lines.len(), 3);
        assert!((lines[2][0].x - 640.0).abs() < f64::EPSILON);
    }

    #[test]
    fn connection_longer_than_gap_is_skipped() {
        let mut categories = BTreeMap::new();
        categories.insert(
            "left_eye".to_owned(),
            FeatureCapture {
                points: vec![
                    LandmarkPoint {
                        index: 0,
                        x: 0.0,
                        y: 0.0,
                    },
                    LandmarkPoint {
                        index: 1,
                        x: 500.0,
                        y: 0.0,
                    },
                ],
                connections: vec![Connection { start: 0, end: 1 }],
            },
        );
        let records = [CaptureRecord::FacialFeatures { categories }];
        let lines = flat_lines(&records, &config());
        assert!(lines.is_empty());
    }

    #[test]
    fn jawline_back_half_pairs_nearest_partners() {
        let mut categories = BTreeMap::new();
        categories.insert(
            "jawline".to_owned(),
            FeatureCapture {
                points: (0..4)
                    .map(|i| LandmarkPoint {
                        index: i,
                        x: f64::from(i),
                        y: f64::from(i) * 10.0,
                    })
                    .collect(),
                connections: vec![],
            },
        );
        let records = [CaptureRecord::FacialFeatures { categories }];
        let lines = flat_lines(&records, &config());
        // Back half = 2 points -> 2 mutual nearest-partner segments.
        assert_eq!(lines.len(), 2);
        for line in &lines {
            assert_eq!(line.len(), 2);
        }
    }

    // --- projection ---

    #[test]
    fn projection_maps_x_range_to_full_turn() {
        let polylines = vec![vec![
            Point3::new(0.0, 5.0, 0.0),
            Point3::new(50.0, 5.0, 0.0),
            Point3::new(100.0, 5.0, 0.0),
        ]];
        let projected = project_onto_cylinder(&polylines, 10.0);
        let pl = &projected[0];

        // θ=0 -> (R, y, 0); θ=π -> (-R, y, ~0); θ=2π wraps back to (R, y, ~0).
        assert!((pl[0].x - 10.0).abs() < 1e-9);
        assert!(pl[0].z.abs() < 1e-9);
        assert!((pl[1].x - -10.0).abs() < 1e-9);
        assert!((pl[2].x - 10.0).abs() < 1e-9);
        // y passes through untouched.
        for p in pl {
            assert!((p.y - 5.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn points_on_cylinder_have_radius_distance_from_axis() {
        let polylines = vec![vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(33.0, 1.0, 0.0),
            Point3::new(77.0, 2.0, 0.0),
            Point3::new(100.0, 3.0, 0.0),
        ]];
        let projected = project_onto_cylinder(&polylines, 42.0);
        for p in &projected[0] {
            let r = p.x.hypot(p.z);
            assert!((r - 42.0).abs() < 1e-9, "expected radius 42, got {r}");
        }
    }

    #[test]
    fn zero_x_extent_returns_input_unprojected() {
        let polylines = vec![vec![
            Point3::new(7.0, 0.0, 0.0),
            Point3::new(7.0, 10.0, 0.0),
        ]];
        let projected = project_onto_cylinder(&polylines, 100.0);
        assert_eq!(projected, polylines);
    }

    #[test]
    fn empty_composite_projects_to_empty() {
        let projected = project_onto_cylinder(&[], 100.0);
        assert!(projected.is_empty());
    }
}

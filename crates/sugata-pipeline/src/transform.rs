//! Subject-space to device-space transform.
//!
//! Converts a subject's assembled line set from capture coordinates into
//! the plotter's bed coordinate system through four stages in fixed
//! order: rotate, normalize, tilt-compensate, recentre.
//!
//! Both bounding-box stages compute their box **jointly over every line
//! of the subject** — computing per line would destroy the relative
//! scale and position between the silhouette and the facial features.
//! The second box is always recomputed after the shear, never reused
//! from the normalize stage.

use geo::{BoundingRect, MultiPoint, Rect};

use crate::types::{LabeledLine, PipelineConfig, Point, Polyline};

/// Apply the full four-stage transform to one subject's line set.
///
/// All stages run even for a single line or single point; zero-extent
/// bounding boxes degrade to scale 1 / plain offset shifts.
#[must_use = "returns the transformed lines"]
pub fn transform_lines(lines: Vec<LabeledLine>, config: &PipelineConfig) -> Vec<LabeledLine> {
    let rotated = rotate_lines(lines);
    let normalized = normalize_lines(rotated, config.canvas_max_dim);
    let sheared = shear_lines(normalized, config.tilt_degrees);
    recentre_lines(sheared, config.offset_x, config.offset_y)
}

/// Stage 1: rotate −90° about the origin, `(x, y) -> (y, -x)`.
///
/// The capture frame is portrait while the plotter bed is landscape.
#[must_use]
pub fn rotate_lines(lines: Vec<LabeledLine>) -> Vec<LabeledLine> {
    map_points(lines, |p| Point::new(p.y, -p.x))
}

/// Stage 2: scale the joint bounding box down to at most `max_dim`.
///
/// The box minimum is subtracted before scaling; subjects already within
/// `max_dim` keep their size (scale 1, including the degenerate
/// zero-extent box).
#[must_use]
pub fn normalize_lines(lines: Vec<LabeledLine>, max_dim: f64) -> Vec<LabeledLine> {
    let Some(rect) = joint_bounding_rect(&lines) else {
        return lines;
    };

    let box_dim = rect.width().max(rect.height());
    let scale = if box_dim > max_dim { max_dim / box_dim } else { 1.0 };
    let min = rect.min();

    map_points(lines, |p| {
        Point::new((p.x - min.x) * scale, (p.y - min.y) * scale)
    })
}

/// Stage 3: shear `y -= x * tan(tilt_degrees)`.
///
/// Compensates for mechanical skew between the pen carriage axes.
/// Zero degrees is an exact no-op slope.
#[must_use]
pub fn shear_lines(lines: Vec<LabeledLine>, tilt_degrees: f64) -> Vec<LabeledLine> {
    let slope = tilt_degrees.to_radians().tan();
    map_points(lines, |p| Point::new(p.x, p.x.mul_add(-slope, p.y)))
}

/// Stage 4: shift the joint bounding box minimum onto the bed offsets
/// and round every coordinate to one decimal place.
#[must_use]
pub fn recentre_lines(lines: Vec<LabeledLine>, offset_x: f64, offset_y: f64) -> Vec<LabeledLine> {
    let Some(rect) = joint_bounding_rect(&lines) else {
        return lines;
    };
    let min = rect.min();

    map_points(lines, |p| {
        Point::new(
            round_tenth(p.x - min.x + offset_x),
            round_tenth(p.y - min.y + offset_y),
        )
    })
}

/// Bounding box over every point of every line combined.
fn joint_bounding_rect(lines: &[LabeledLine]) -> Option<Rect<f64>> {
    let points: Vec<geo::Point<f64>> = lines
        .iter()
        .flat_map(|labeled| {
            labeled
                .line
                .points()
                .iter()
                .map(|p| geo::Point::new(p.x, p.y))
        })
        .collect();
    MultiPoint::new(points).bounding_rect()
}

/// Apply a point transform to every point of every line.
fn map_points<F: Fn(Point) -> Point>(lines: Vec<LabeledLine>, f: F) -> Vec<LabeledLine> {
    lines
        .into_iter()
        .map(|labeled| {
            let points = labeled.line.into_points().into_iter().map(&f).collect();
            LabeledLine::new(labeled.category, Polyline::new(points))
        })
        .collect()
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

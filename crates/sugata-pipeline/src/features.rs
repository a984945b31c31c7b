//! Facial-feature selection: per-category rules that turn landmark
//! captures into labeled draw lines.
//!
//! Three rules cover the face model's categories:
//!
//! - **jawline** — a dense point cloud; only the lower half is drawn,
//!   reordered by nearest neighbor into one stroke.
//! - **nose** — reduced to at most two representative landmarks (the 3rd
//!   and 7th by vertical order), drawn as a short marker stroke.
//! - **everything else** (eyes, eyebrows, lips, ...) — drawn along the
//!   capture's explicit connectivity when present, otherwise as the raw
//!   point sequence.

use std::collections::BTreeMap;

use crate::capture::FeatureCapture;
use crate::linearize;
use crate::order::order_nearest_neighbor;
use crate::types::{LabeledLine, LineCategory, PipelineError, Point, Polyline};

/// Category name handled by the jawline rule.
const JAWLINE: &str = "jawline";
/// Category name handled by the nose rule.
const NOSE: &str = "nose";

/// Build the lower-jaw stroke from a jawline point cloud.
///
/// Sorts by (y, then x), discards the upper half (integer floor count),
/// and nearest-neighbor-orders the remainder. Returns `None` for an
/// empty input.
#[must_use]
pub fn jawline_line(points: &[Point]) -> Option<LabeledLine> {
    if points.is_empty() {
        return None;
    }
    let sorted = sorted_by_y_then_x(points);
    let kept = &sorted[sorted.len() / 2..];
    let ordered = order_nearest_neighbor(kept);
    Some(LabeledLine::new(
        LineCategory::Feature,
        Polyline::new(ordered),
    ))
}

/// Build the nose marker stroke from a nose point cloud.
///
/// Sorts by (y, then x) and keeps the 3rd point (index 2) when at least
/// 3 points exist, plus the 7th (index 6) when at least 7 exist. Returns
/// `None` when nothing qualifies.
#[must_use]
pub fn nose_line(points: &[Point]) -> Option<LabeledLine> {
    let sorted = sorted_by_y_then_x(points);

    let mut kept = Vec::with_capacity(2);
    if let Some(&p) = sorted.get(2) {
        kept.push(p);
    }
    if let Some(&p) = sorted.get(6) {
        kept.push(p);
    }
    if kept.is_empty() {
        return None;
    }

    let ordered = order_nearest_neighbor(&kept);
    Some(LabeledLine::new(LineCategory::Nose, Polyline::new(ordered)))
}

/// Build draw lines for a generic connected feature.
///
/// With connections, the feature's landmark graph is linearized into one
/// line per resolved walk. Without connections, a single point becomes a
/// dot line and multiple points become one line in capture order.
///
/// # Errors
///
/// Propagates [`PipelineError::UnknownLandmark`] from linearization.
pub fn connected_feature_lines(
    feature: &str,
    capture: &FeatureCapture,
) -> Result<Vec<LabeledLine>, PipelineError> {
    if !capture.connections.is_empty() {
        let lines = linearize::linearize(feature, &capture.points, &capture.connections)?;
        return Ok(lines
            .into_iter()
            .map(|line| LabeledLine::new(LineCategory::Feature, line))
            .collect());
    }

    let points: Vec<Point> = capture.points.iter().map(|lm| lm.point()).collect();
    Ok(match points.len() {
        0 => Vec::new(),
        // Single landmark or unconnected cloud: keep capture order.
        _ => vec![LabeledLine::new(
            LineCategory::Feature,
            Polyline::new(points),
        )],
    })
}

/// Apply the category rules across a subject's facial features.
///
/// Generic features come first (in category-name order), then the
/// jawline stroke, then the nose marker last — the nose's parking
/// command must be the final facial movement.
///
/// # Errors
///
/// Propagates [`PipelineError::UnknownLandmark`] from linearization.
pub fn select_features(
    categories: &BTreeMap<String, FeatureCapture>,
) -> Result<Vec<LabeledLine>, PipelineError> {
    let mut lines = Vec::new();
    let mut jaw = None;
    let mut nose = None;

    for (name, capture) in categories {
        match name.as_str() {
            JAWLINE => {
                let points: Vec<Point> = capture.points.iter().map(|lm| lm.point()).collect();
                jaw = jawline_line(&points);
            }
            NOSE => {
                let points: Vec<Point> = capture.points.iter().map(|lm| lm.point()).collect();
                nose = nose_line(&points);
            }
            other => lines.extend(connected_feature_lines(other, capture)?),
        }
    }

    lines.extend(jaw);
    lines.extend(nose);
    Ok(lines)
}

/// Sort points by ascending y, then ascending x.
fn sorted_by_y_then_x(points: &[Point]) -> Vec<Point> {
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));
    sorted
}

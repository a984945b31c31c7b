//! Capture-session input model.
//!
//! The upstream capture collaborator (camera + segmentation + landmark
//! inference) produces an ordered list of heterogeneous records: body
//! silhouette contours split into vertical regions, whole-subject
//! silhouettes, and facial-landmark graphs with explicit connectivity.
//! This module owns the serde data model for that contract, the
//! contour-preparation pass (per-region simplification and height-extent
//! bookkeeping), and the batching pass that groups records into
//! [`SubjectRecord`]s.
//!
//! Records arrive in capture order; a subject is complete once both its
//! full contour and its facial features have been seen. Batching
//! preserves that positional order so toolpath files stay aligned with
//! neighboring subjects.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::simplify;
use crate::types::{Point, Polyline};

/// Vertical body region assigned by the capture stage from normalized
/// frame position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyRegion {
    Head,
    Body,
    Legs,
}

/// Vertical extent of a subject, in capture units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeightExtent {
    /// Smallest y across the subject's contour regions.
    pub min_y: f64,
    /// Largest y across the subject's contour regions.
    pub max_y: f64,
}

impl HeightExtent {
    /// The vertical span `max_y - min_y`.
    #[must_use]
    pub fn extent(self) -> f64 {
        self.max_y - self.min_y
    }
}

/// One landmark point of a facial feature, keyed by its model index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandmarkPoint {
    /// Landmark index within the face model.
    pub index: u32,
    pub x: f64,
    pub y: f64,
}

impl LandmarkPoint {
    /// The landmark's position.
    #[must_use]
    pub const fn point(self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// An undirected connection between two landmark indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// Landmark index of one end.
    pub start: u32,
    /// Landmark index of the other end.
    pub end: u32,
}

/// Points and connectivity captured for one facial-feature category.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureCapture {
    /// Landmark points, keyed by `index`.
    pub points: Vec<LandmarkPoint>,
    /// Undirected landmark connections. May be empty for point-cloud
    /// features such as the jawline.
    #[serde(default)]
    pub connections: Vec<Connection>,
}

/// One record of a capture session, in capture order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CaptureRecord {
    /// Time-axis marker emitted while the paper advances. Carried through
    /// the session file but not consumed by the pipeline.
    Line { x: f64, y: f64 },

    /// Body silhouette split into vertical regions.
    Contour {
        /// Region point lists. Empty regions are allowed.
        categories: BTreeMap<BodyRegion, Vec<Point>>,
        /// Vertical extent across all regions. Absent until the
        /// preparation pass has run.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        height_info: Option<HeightExtent>,
    },

    /// Whole-subject silhouette as a single ordered point list.
    FullContour { points: Vec<Point> },

    /// Facial-landmark graphs keyed by feature category name
    /// ("jawline", "nose", "left_eye", ...).
    FacialFeatures {
        categories: BTreeMap<String, FeatureCapture>,
    },
}

/// Everything the pipeline needs for one subject.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectRecord {
    /// Whole-subject silhouette, if the capture produced one.
    pub full_contour: Option<Polyline>,
    /// Facial-feature captures keyed by category name.
    pub features: BTreeMap<String, FeatureCapture>,
    /// Vertical span used for pen-depth classification. Zero when the
    /// capture carried no height information.
    pub height_extent: f64,
}

/// Simplify each contour record's regions independently and recompute
/// its height extent from the simplified points.
///
/// Non-contour records pass through untouched. Empty regions stay empty;
/// a contour whose regions are all empty gets `height_info = None`.
#[must_use = "returns the prepared records"]
pub fn prepare_contours(records: Vec<CaptureRecord>, tolerance: f64) -> Vec<CaptureRecord> {
    records
        .into_iter()
        .map(|record| match record {
            CaptureRecord::Contour { categories, .. } => {
                let simplified: BTreeMap<BodyRegion, Vec<Point>> = categories
                    .into_iter()
                    .map(|(region, points)| {
                        let line = simplify::simplify(&Polyline::new(points), tolerance);
                        (region, line.into_points())
                    })
                    .collect();

                let height_info = region_extent(&simplified);
                CaptureRecord::Contour {
                    categories: simplified,
                    height_info,
                }
            }
            other => other,
        })
        .collect()
}

/// Min/max y across every point of every region, or `None` if all
/// regions are empty.
fn region_extent(categories: &BTreeMap<BodyRegion, Vec<Point>>) -> Option<HeightExtent> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for point in categories.values().flatten() {
        min_y = min_y.min(point.y);
        max_y = max_y.max(point.y);
    }
    (min_y <= max_y).then_some(HeightExtent { min_y, max_y })
}

/// Group a record stream into per-subject records.
///
/// Walks the records in order, accumulating the most recent height
/// extent, full contour, and facial features. A [`SubjectRecord`] is
/// emitted each time both a full contour and facial features have been
/// seen, then the accumulator resets for the next subject. Trailing
/// records that never complete a pair are dropped.
#[must_use = "returns the batched subjects"]
pub fn collect_subjects(records: &[CaptureRecord]) -> Vec<SubjectRecord> {
    let mut subjects = Vec::new();

    let mut height_extent = 0.0;
    let mut full_contour: Option<Polyline> = None;
    let mut features: BTreeMap<String, FeatureCapture> = BTreeMap::new();
    let mut got_full = false;
    let mut got_face = false;

    for record in records {
        match record {
            CaptureRecord::Line { .. } => {}
            CaptureRecord::Contour { height_info, .. } => {
                height_extent = height_info.map_or(0.0, HeightExtent::extent);
            }
            CaptureRecord::FullContour { points } => {
                full_contour =
                    (!points.is_empty()).then(|| Polyline::new(points.clone()));
                got_full = true;
            }
            CaptureRecord::FacialFeatures { categories } => {
                features = categories.clone();
                got_face = true;
            }
        }

        if got_full && got_face {
            subjects.push(SubjectRecord {
                full_contour: full_contour.take(),
                features: std::mem::take(&mut features),
                height_extent,
            });
            height_extent = 0.0;
            got_full = false;
            got_face = false;
        }
    }

    subjects
}

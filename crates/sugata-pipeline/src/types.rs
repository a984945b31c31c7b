//! Shared types for the sugata drawing pipeline.

use serde::{Deserialize, Serialize};

/// A 2D point in capture coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position (increases downward, camera convention).
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another point.
    ///
    /// Avoids the square root for comparison purposes.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.mul_add(dx, dy * dy)
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }
}

/// A 3D point used by the cylindrical composite path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    /// Create a new 3D point.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Lift a 2D point into the z = 0 plane.
    #[must_use]
    pub const fn from_planar(p: Point) -> Self {
        Self {
            x: p.x,
            y: p.y,
            z: 0.0,
        }
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx.mul_add(dx, dy.mul_add(dy, dz * dz)).sqrt()
    }
}

/// A sequence of connected points forming a path segment.
///
/// A polyline with a single point is a degenerate "dot" marker; the
/// toolpath assembler emits it as a pen-up positioning command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline(Vec<Point>);

impl Polyline {
    /// Create a new polyline from a vector of points.
    #[must_use]
    pub const fn new(points: Vec<Point>) -> Self {
        Self(points)
    }

    /// Returns `true` if the polyline has no points.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of points in the polyline.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns the first point, if any.
    #[must_use]
    pub fn first(&self) -> Option<&Point> {
        self.0.first()
    }

    /// Returns the last point, if any.
    #[must_use]
    pub fn last(&self) -> Option<&Point> {
        self.0.last()
    }

    /// Returns a slice of all points.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.0
    }

    /// Consumes the polyline and returns the underlying vector of points.
    #[must_use]
    pub fn into_points(self) -> Vec<Point> {
        self.0
    }
}

/// Drawing category of a line, controlling pen-state emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCategory {
    /// Whole-subject silhouette contour.
    Full,
    /// Generic facial feature (eyes, eyebrows, mouth, jawline).
    Feature,
    /// Nose marker line; gets an extra parking command after drawing.
    Nose,
}

/// A category-labeled polyline. Point order is draw order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledLine {
    /// Drawing category.
    pub category: LineCategory,
    /// The ordered points of the line.
    pub line: Polyline,
}

impl LabeledLine {
    /// Create a labeled line.
    #[must_use]
    pub const fn new(category: LineCategory, line: Polyline) -> Self {
        Self { category, line }
    }
}

/// Discrete pen draw depth, derived from a subject's height extent.
///
/// Taller subjects are drawn with a shallower pen so the servo does not
/// drag through long strokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DepthTier {
    /// Height extent above 200 units.
    Shallow,
    /// Height extent within 100..=200 units.
    Medium,
    /// Height extent below 100 units.
    Deep,
}

impl DepthTier {
    /// Classify a subject's vertical extent (`max_y - min_y`) into a tier.
    #[must_use]
    pub fn classify(height_extent: f64) -> Self {
        if height_extent > 200.0 {
            Self::Shallow
        } else if height_extent >= 100.0 {
            Self::Medium
        } else {
            Self::Deep
        }
    }

    /// Wire encoding understood by the plotter firmware (1..=3).
    #[must_use]
    pub const fn wire_value(self) -> u8 {
        match self {
            Self::Shallow => 1,
            Self::Medium => 2,
            Self::Deep => 3,
        }
    }
}

/// Pen state carried by a single toolpath command.
///
/// `SyncPulse` shares wire value 1 with `Draw(Shallow)` — the firmware
/// distinguishes the two only by position (the pulse appears in the fixed
/// trailer at the parking coordinate). Keeping it a distinct variant lets
/// typed consumers tell them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PenState {
    /// Pen lifted; travel move, no drawing.
    Up,
    /// Pen down, drawing at the given depth tier.
    Draw(DepthTier),
    /// Hardware synchronization pulse emitted in the trailer.
    SyncPulse,
}

impl PenState {
    /// Wire encoding: 0 = up, 1..=3 = draw depth, pulse = 1.
    #[must_use]
    pub const fn wire_value(self) -> u8 {
        match self {
            Self::Up => 0,
            Self::Draw(tier) => tier.wire_value(),
            Self::SyncPulse => 1,
        }
    }
}

/// One drawing command sent to the plotting device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolpathCommand {
    /// Target x coordinate (device units, 1 decimal place).
    pub x: f64,
    /// Target y coordinate (device units, 1 decimal place).
    pub y: f64,
    /// Pen state while moving to this coordinate.
    pub pen: PenState,
}

impl ToolpathCommand {
    /// Create a command.
    #[must_use]
    pub const fn new(x: f64, y: f64, pen: PenState) -> Self {
        Self { x, y, pen }
    }
}

/// Serde proxy for [`ToolpathCommand`] matching the firmware wire format.
///
/// The firmware consumes `{"x": .., "y": .., "updown": 0..3}`. On the
/// wire the sync pulse is indistinguishable from `Draw(Shallow)`, so a
/// deserialized value of 1 always decodes as a draw command.
#[derive(Serialize, Deserialize)]
struct CommandProxy {
    x: f64,
    y: f64,
    updown: u8,
}

impl Serialize for ToolpathCommand {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        CommandProxy {
            x: self.x,
            y: self.y,
            updown: self.pen.wire_value(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ToolpathCommand {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let proxy = CommandProxy::deserialize(deserializer)?;
        let pen = match proxy.updown {
            0 => PenState::Up,
            1 => PenState::Draw(DepthTier::Shallow),
            2 => PenState::Draw(DepthTier::Medium),
            3 => PenState::Draw(DepthTier::Deep),
            other => {
                return Err(serde::de::Error::custom(format!(
                    "updown value {other} is outside 0..=3",
                )));
            }
        };
        Ok(Self {
            x: proxy.x,
            y: proxy.y,
            pen,
        })
    }
}

/// Configuration for the capture-to-toolpath pipeline.
///
/// All parameters have defaults matching the calibrated installation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Ramer-Douglas-Peucker simplification tolerance for silhouette
    /// contours, in capture units. Higher values remove more points.
    pub simplify_tolerance: f64,

    /// Device tilt compensation in degrees, applied as a shear
    /// `y -= x * tan(tilt)`. Zero disables the shear.
    pub tilt_degrees: f64,

    /// Largest canvas dimension after normalization. Subjects larger than
    /// this are scaled down to fit; smaller subjects keep their size.
    pub canvas_max_dim: f64,

    /// Horizontal offset applied when recentring onto the device bed.
    pub offset_x: f64,

    /// Vertical offset applied when recentring onto the device bed.
    pub offset_y: f64,
}

impl PipelineConfig {
    /// Default RDP tolerance.
    pub const DEFAULT_SIMPLIFY_TOLERANCE: f64 = 1.8;
    /// Default tilt compensation (no shear).
    pub const DEFAULT_TILT_DEGREES: f64 = 0.0;
    /// Default canvas limit.
    pub const DEFAULT_CANVAS_MAX_DIM: f64 = 250.0;
    /// Default recentring x offset.
    pub const DEFAULT_OFFSET_X: f64 = -100.0;
    /// Default recentring y offset.
    pub const DEFAULT_OFFSET_Y: f64 = 30.0;

    /// Check the invariants the pipeline relies on.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] when the simplification
    /// tolerance is not strictly positive, the canvas limit is not
    /// strictly positive, or any parameter is non-finite.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if !(self.simplify_tolerance > 0.0 && self.simplify_tolerance.is_finite()) {
            return Err(PipelineError::InvalidConfig(format!(
                "simplify_tolerance must be finite and > 0, got {}",
                self.simplify_tolerance,
            )));
        }
        if !(self.canvas_max_dim > 0.0 && self.canvas_max_dim.is_finite()) {
            return Err(PipelineError::InvalidConfig(format!(
                "canvas_max_dim must be finite and > 0, got {}",
                self.canvas_max_dim,
            )));
        }
        if !self.tilt_degrees.is_finite()
            || !self.offset_x.is_finite()
            || !self.offset_y.is_finite()
        {
            return Err(PipelineError::InvalidConfig(
                "tilt_degrees and offsets must be finite".to_owned(),
            ));
        }
        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            simplify_tolerance: Self::DEFAULT_SIMPLIFY_TOLERANCE,
            tilt_degrees: Self::DEFAULT_TILT_DEGREES,
            canvas_max_dim: Self::DEFAULT_CANVAS_MAX_DIM,
            offset_x: Self::DEFAULT_OFFSET_X,
            offset_y: Self::DEFAULT_OFFSET_Y,
        }
    }
}

/// Errors that can occur during pipeline processing.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Pipeline configuration is invalid.
    #[error("invalid pipeline configuration: {0}")]
    InvalidConfig(String),

    /// A facial-feature connection references a landmark index that is
    /// not present in the feature's point list.
    #[error("connection references unknown landmark {index} in feature {feature:?}")]
    UnknownLandmark {
        /// Feature category name from the capture record.
        feature: String,
        /// The missing landmark index.
        index: u32,
    },
}

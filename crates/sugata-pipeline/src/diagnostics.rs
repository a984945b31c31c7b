//! Per-subject diagnostics: counts and classification collected during
//! processing.
//!
//! Permanent instrumentation for tuning simplification tolerance and
//! checking capture quality. Every call to
//! [`process_subject`](crate::process_subject) fills one of these
//! alongside the toolpath.

use serde::{Deserialize, Serialize};

use crate::types::DepthTier;

/// Diagnostics for one subject's pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectDiagnostics {
    /// Silhouette contour points before simplification.
    pub contour_points_before: usize,
    /// Silhouette contour points after simplification.
    pub contour_points_after: usize,
    /// Facial-feature lines (including the jawline stroke).
    pub feature_line_count: usize,
    /// Whether a nose marker stroke was emitted.
    pub has_nose_line: bool,
    /// Total labeled lines entering the transform.
    pub line_count: usize,
    /// Commands in the assembled toolpath, trailer included.
    pub command_count: usize,
    /// Vertical capture extent used for depth classification.
    pub height_extent: f64,
    /// Depth tier assigned to every drawn point.
    pub depth_tier: DepthTier,
}

impl SubjectDiagnostics {
    /// Render a human-readable report block.
    #[must_use]
    pub fn report(&self) -> String {
        use std::fmt::Write;

        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:<26} {:>8} -> {}",
            "Contour points", self.contour_points_before, self.contour_points_after,
        );
        let _ = writeln!(out, "{:<26} {:>8}", "Feature lines", self.feature_line_count);
        let _ = writeln!(
            out,
            "{:<26} {:>8}",
            "Nose stroke",
            if self.has_nose_line { "yes" } else { "no" },
        );
        let _ = writeln!(out, "{:<26} {:>8}", "Total lines", self.line_count);
        let _ = writeln!(out, "{:<26} {:>8}", "Commands", self.command_count);
        let _ = writeln!(
            out,
            "{:<26} {:>8.1}",
            "Height extent", self.height_extent,
        );
        let _ = writeln!(
            out,
            "{:<26} {:>8}",
            "Depth tier",
            self.depth_tier.wire_value(),
        );
        out
    }
}

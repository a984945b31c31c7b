//! sugata-export: Pure format serializers for sugata outputs (sans-IO).
//!
//! Three consumers, three formats:
//!
//! - the plotter firmware transport reads per-subject toolpath JSON
//!   ([`device`]),
//! - the web viewer reads a cylindrical line-segment buffer in the
//!   three.js `BufferGeometry` envelope ([`cylinder`], [`resample`],
//!   [`buffer`]),
//! - humans read SVG previews of the assembled toolpaths ([`svg`]).
//!
//! Every serializer is a pure function returning a `String` or a plain
//! struct — file writing belongs to the caller.

pub mod buffer;
pub mod cylinder;
pub mod device;
pub mod resample;
pub mod svg;

pub use buffer::{LineBuffer, to_buffer_geometry_json};
pub use cylinder::{CylinderConfig, flat_lines, project_onto_cylinder};
pub use device::to_device_json;
pub use svg::{SvgMetadata, to_svg};

/// Errors that can occur while serializing outputs.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// JSON serialization failed.
    #[error("failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Build the viewer composite for a whole session.
///
/// # Steps
///
/// 1. Assemble the flat multi-subject line set from prepared records
///    (per-subject x slots, segment-break splitting)
/// 2. Project onto a cylinder of the configured radius
/// 3. Resample each polyline by arc length and flatten into a
///    line-segment buffer
pub fn build_composite(
    records: &[sugata_pipeline::CaptureRecord],
    config: &CylinderConfig,
) -> LineBuffer {
    // 1. Flat side-by-side layout.
    let flat = cylinder::flat_lines(records, config);

    // 2. Wrap onto the cylinder.
    let projected = cylinder::project_onto_cylinder(&flat, config.radius);

    // 3. Resample and flatten for the renderer.
    buffer::build_line_buffer(&projected, config.sample_step, config.flip_z)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use sugata_pipeline::Point;
    use sugata_pipeline::capture::{BodyRegion, CaptureRecord};

    use super::*;

    #[test]
    fn composite_from_two_subjects_lands_on_the_cylinder() {
        let contour = |points: Vec<Point>| {
            let mut categories = BTreeMap::new();
            categories.insert(BodyRegion::Body, points);
            CaptureRecord::Contour {
                categories,
                height_info: None,
            }
        };
        let records = [
            contour(vec![
                Point::new(0.0, 0.0),
                Point::new(20.0, 10.0),
                Point::new(40.0, 0.0),
            ]),
            contour(vec![
                Point::new(0.0, 0.0),
                Point::new(20.0, 10.0),
                Point::new(40.0, 0.0),
            ]),
        ];

        let config = CylinderConfig::default();
        let composite = build_composite(&records, &config);
        assert!(composite.vertex_count() >= 4);
        assert_eq!(composite.positions.len(), composite.vertex_count() * 3);

        // Resampling interpolates along chords, so vertices sit on or
        // just inside the cylinder surface, never outside.
        for chunk in composite.positions.chunks_exact(3) {
            let r = chunk[0].hypot(chunk[2]);
            assert!(r <= config.radius + 1e-6, "outside the cylinder: {r}");
            assert!(r >= config.radius * 0.95, "far off the surface: {r}");
        }
    }

    #[test]
    fn empty_session_builds_empty_composite() {
        let composite = build_composite(&[], &CylinderConfig::default());
        assert_eq!(composite.vertex_count(), 0);
        let json = to_buffer_geometry_json(&composite).unwrap();
        assert!(json.contains("BufferGeometry"));
    }
}

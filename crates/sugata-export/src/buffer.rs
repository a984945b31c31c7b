//! Renderable line-segment buffer.
//!
//! Flattens resampled composite polylines into the stride-3 position
//! array plus pair-index array the viewer feeds to a `LineSegments`
//! mesh, and serializes it in the three.js `BufferGeometry` JSON
//! envelope. This is a segment soup for rendering, not a connected
//! mesh surface.

use serde::Serialize;
use sugata_pipeline::Point3;

use crate::ExportError;
use crate::resample::resample_by_length;

/// Flat vertex and index buffers describing drawable line segments.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineBuffer {
    /// Vertex positions, 3 numbers per vertex.
    pub positions: Vec<f64>,
    /// Consecutive-index pairs, one pair per drawable segment. Indices
    /// never cross a polyline boundary.
    pub indices: Vec<u32>,
}

impl LineBuffer {
    /// Number of vertices in the buffer.
    #[must_use]
    pub const fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Number of drawable segments.
    #[must_use]
    pub const fn segment_count(&self) -> usize {
        self.indices.len() / 2
    }
}

/// Resample each polyline and flatten the result into a [`LineBuffer`].
///
/// Polylines that resample to fewer than 2 points are skipped. When
/// `flip_z` is set, z coordinates are negated at emission (the viewer's
/// camera convention).
#[must_use = "returns the assembled buffer"]
pub fn build_line_buffer(polylines: &[Vec<Point3>], sample_step: f64, flip_z: bool) -> LineBuffer {
    let mut buffer = LineBuffer::default();

    for polyline in polylines {
        let resampled = resample_by_length(polyline, sample_step);
        if resampled.len() < 2 {
            continue;
        }

        #[allow(clippy::cast_possible_truncation)]
        let base = buffer.vertex_count() as u32;
        for (i, p) in resampled.iter().enumerate() {
            let z = if flip_z { -p.z } else { p.z };
            buffer.positions.extend([p.x, p.y, z]);

            if i > 0 {
                #[allow(clippy::cast_possible_truncation)]
                let idx = base + i as u32;
                buffer.indices.extend([idx - 1, idx]);
            }
        }
    }

    buffer
}

/// three.js `BufferGeometry` JSON envelope.
#[derive(Serialize)]
struct GeometryEnvelope<'a> {
    metadata: GeometryMetadata,
    data: GeometryData<'a>,
}

#[derive(Serialize)]
struct GeometryMetadata {
    #[serde(rename = "type")]
    kind: &'static str,
    version: f64,
}

#[derive(Serialize)]
struct GeometryData<'a> {
    attributes: GeometryAttributes<'a>,
    index: GeometryIndex<'a>,
}

#[derive(Serialize)]
struct GeometryAttributes<'a> {
    position: PositionAttribute<'a>,
}

#[derive(Serialize)]
struct PositionAttribute<'a> {
    #[serde(rename = "itemSize")]
    item_size: u32,
    #[serde(rename = "type")]
    kind: &'static str,
    array: &'a [f64],
}

#[derive(Serialize)]
struct GeometryIndex<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    array: &'a [u32],
}

/// Serialize a [`LineBuffer`] into the viewer's `BufferGeometry` JSON.
///
/// The index array type widens from `Uint16Array` to `Uint32Array` when
/// the buffer holds more than 65536 vertices.
///
/// # Errors
///
/// Returns [`ExportError::Json`] if serialization fails.
pub fn to_buffer_geometry_json(buffer: &LineBuffer) -> Result<String, ExportError> {
    let index_kind = if buffer.vertex_count() > usize::from(u16::MAX) + 1 {
        "Uint32Array"
    } else {
        "Uint16Array"
    };

    let envelope = GeometryEnvelope {
        metadata: GeometryMetadata {
            kind: "BufferGeometry",
            version: 4.5,
        },
        data: GeometryData {
            attributes: GeometryAttributes {
                position: PositionAttribute {
                    item_size: 3,
                    kind: "Float32Array",
                    array: &buffer.positions,
                },
            },
            index: GeometryIndex {
                kind: index_kind,
                array: &buffer.indices,
            },
        },
    };

    Ok(serde_json::to_string_pretty(&envelope)?)
}

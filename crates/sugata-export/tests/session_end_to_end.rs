//! Integration test: run a synthetic two-subject capture session through
//! the full pipeline and every export format.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::BTreeMap;

use sugata_pipeline::capture::{
    BodyRegion, CaptureRecord, Connection, FeatureCapture, LandmarkPoint,
};
use sugata_pipeline::{DepthTier, PenState, PipelineConfig, Point};

/// A tall zigzag silhouette with some collinear noise for RDP to chew on.
fn silhouette(height: f64) -> Vec<Point> {
    let mut points = Vec::new();
    for i in 0..60 {
        let t = f64::from(i) / 59.0;
        let wobble = if i % 2 == 0 { 0.0 } else { 0.3 };
        points.push(Point::new(30.0f64.mul_add((t * 6.0).sin(), 100.0) + wobble, t * height));
    }
    points
}

fn contour_record(height: f64) -> CaptureRecord {
    let mut categories = BTreeMap::new();
    let points = silhouette(height);
    let third = points.len() / 3;
    categories.insert(BodyRegion::Head, points[..third].to_vec());
    categories.insert(BodyRegion::Body, points[third..2 * third].to_vec());
    categories.insert(BodyRegion::Legs, points[2 * third..].to_vec());
    CaptureRecord::Contour {
        categories,
        height_info: None,
    }
}

fn face_record() -> CaptureRecord {
    let mut categories = BTreeMap::new();
    categories.insert(
        "jawline".to_owned(),
        FeatureCapture {
            points: (0..8)
                .map(|i| LandmarkPoint {
                    index: i,
                    x: 90.0 + f64::from(i) * 3.0,
                    y: 20.0 + f64::from(i) * 2.0,
                })
                .collect(),
            connections: vec![],
        },
    );
    categories.insert(
        "nose".to_owned(),
        FeatureCapture {
            points: (0..7)
                .map(|i| LandmarkPoint {
                    index: 100 + i,
                    x: 100.0,
                    y: 25.0 + f64::from(i),
                })
                .collect(),
            connections: vec![],
        },
    );
    categories.insert(
        "left_eye".to_owned(),
        FeatureCapture {
            points: vec![
                LandmarkPoint {
                    index: 33,
                    x: 95.0,
                    y: 22.0,
                },
                LandmarkPoint {
                    index: 133,
                    x: 98.0,
                    y: 22.0,
                },
                LandmarkPoint {
                    index: 160,
                    x: 96.5,
                    y: 21.0,
                },
            ],
            connections: vec![
                Connection { start: 33, end: 160 },
                Connection {
                    start: 160,
                    end: 133,
                },
            ],
        },
    );
    CaptureRecord::FacialFeatures { categories }
}

fn session_records() -> Vec<CaptureRecord> {
    vec![
        // Subject 1: tall capture (shallow pen).
        contour_record(300.0),
        CaptureRecord::FullContour {
            points: silhouette(300.0),
        },
        face_record(),
        // Subject 2: short capture (deep pen).
        contour_record(80.0),
        CaptureRecord::FullContour {
            points: silhouette(80.0),
        },
        face_record(),
    ]
}

#[test]
fn session_to_toolpaths_and_composite() {
    let config = PipelineConfig::default();
    let result = sugata_pipeline::process_session(session_records(), &config)
        .expect("pipeline should succeed");

    assert_eq!(result.subjects.len(), 2, "two complete subjects captured");

    // Depth classification follows each subject's height extent.
    assert_eq!(
        result.subjects[0].diagnostics.depth_tier,
        DepthTier::Shallow,
    );
    assert_eq!(result.subjects[1].diagnostics.depth_tier, DepthTier::Deep);

    for subject in &result.subjects {
        let commands = &subject.commands;
        assert!(commands.len() > 4, "expected drawing plus trailer");

        // Simplification reduced the silhouette.
        assert!(
            subject.diagnostics.contour_points_after
                < subject.diagnostics.contour_points_before,
        );

        // Every coordinate is rounded to one decimal.
        for cmd in commands.iter() {
            assert!(((cmd.x * 10.0).round() - cmd.x * 10.0).abs() < 1e-9);
            assert!(((cmd.y * 10.0).round() - cmd.y * 10.0).abs() < 1e-9);
        }

        // The sequence ends with the park-and-pulse trailer.
        let trailer = &commands[commands.len() - 4..];
        for cmd in trailer {
            assert!((cmd.x - -250.0).abs() < f64::EPSILON);
            assert!((cmd.y - 50.0).abs() < f64::EPSILON);
        }
        assert_eq!(trailer[0].pen, PenState::Up);
        assert_eq!(trailer[1].pen, PenState::SyncPulse);
        assert_eq!(trailer[2].pen, PenState::SyncPulse);
        assert_eq!(trailer[3].pen, PenState::Up);

        // Device JSON uses the firmware field name.
        let json = sugata_export::to_device_json(commands).unwrap();
        assert!(json.contains("\"updown\""));

        // SVG preview renders at least one stroke.
        let svg = sugata_export::to_svg(
            commands,
            &sugata_export::SvgMetadata {
                title: Some("subject"),
                description: None,
            },
        );
        assert!(svg.contains("<path"));
    }

    // The cylindrical composite consumes the prepared records.
    let cylinder_config = sugata_export::CylinderConfig::default();
    let composite = sugata_export::build_composite(&result.records, &cylinder_config);
    assert!(composite.vertex_count() > 0);
    assert!(composite.segment_count() > 0);

    let geometry = sugata_export::to_buffer_geometry_json(&composite).unwrap();
    let value: serde_json::Value = serde_json::from_str(&geometry).unwrap();
    assert_eq!(value["metadata"]["type"], "BufferGeometry");
    assert_eq!(
        value["data"]["attributes"]["position"]["array"]
            .as_array()
            .unwrap()
            .len(),
        composite.positions.len(),
    );
}

#[test]
fn subject_without_geometry_still_yields_a_trailer() {
    let records = vec![
        CaptureRecord::FullContour { points: vec![] },
        CaptureRecord::FacialFeatures {
            categories: BTreeMap::new(),
        },
    ];
    let result =
        sugata_pipeline::process_session(records, &PipelineConfig::default()).unwrap();
    assert_eq!(result.subjects.len(), 1);
    assert_eq!(result.subjects[0].commands.len(), 4);

    let json = sugata_export::to_device_json(&result.subjects[0].commands).unwrap();
    let parsed: Vec<sugata_pipeline::ToolpathCommand> = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.len(), 4);
}

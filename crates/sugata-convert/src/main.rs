//! sugata-convert: CLI batch converter for capture sessions.
//!
//! Reads a capture-session JSON file, runs the drawing pipeline per
//! subject, and writes:
//!
//! - `toolpath_N.json` — one firmware toolpath per subject (1-based,
//!   matching capture order),
//! - `composite.json` — the cylindrical viewer composite,
//! - `preview_N.svg` — optional per-subject SVG previews (`--svg`).
//!
//! Prints a per-subject diagnostics report (or JSON with `--json`).
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin sugata-convert -- [OPTIONS] <SESSION_PATH>
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use sugata_export::CylinderConfig;
use sugata_pipeline::{CaptureRecord, PipelineConfig};

/// Capture-session batch conversion for sugata.
///
/// Converts body and face captures into plotter toolpaths plus the
/// cylindrical composite consumed by the web viewer.
#[derive(Parser)]
#[command(name = "sugata-convert", version)]
struct Cli {
    /// Path to the capture session JSON file.
    session_path: PathBuf,

    /// Output directory for toolpath and composite files.
    #[arg(long, default_value = "out")]
    out_dir: PathBuf,

    /// RDP simplification tolerance in capture units.
    #[arg(long, default_value_t = PipelineConfig::DEFAULT_SIMPLIFY_TOLERANCE)]
    simplify_tolerance: f64,

    /// Device tilt compensation in degrees.
    #[arg(long, default_value_t = PipelineConfig::DEFAULT_TILT_DEGREES)]
    tilt_degrees: f64,

    /// Cylinder radius for the viewer composite.
    #[arg(long, default_value_t = CylinderConfig::DEFAULT_RADIUS)]
    radius: f64,

    /// Horizontal slot width per subject in the composite.
    #[arg(long, default_value_t = CylinderConfig::DEFAULT_X_OFFSET_INCREMENT)]
    x_offset_increment: f64,

    /// Segment-break distance: larger point gaps split the polyline.
    #[arg(long, default_value_t = CylinderConfig::DEFAULT_MAX_GAP)]
    max_gap: f64,

    /// Arc-length resampling step for the composite buffer.
    #[arg(long, default_value_t = CylinderConfig::DEFAULT_SAMPLE_STEP)]
    sample_step: f64,

    /// Keep the composite's z axis unflipped.
    #[arg(long)]
    no_flip_z: bool,

    /// Also write per-subject SVG previews.
    #[arg(long)]
    svg: bool,

    /// Output diagnostics as JSON instead of a human-readable report.
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            simplify_tolerance: self.simplify_tolerance,
            tilt_degrees: self.tilt_degrees,
            ..PipelineConfig::default()
        }
    }

    fn cylinder_config(&self) -> CylinderConfig {
        CylinderConfig {
            radius: self.radius,
            x_offset_increment: self.x_offset_increment,
            max_gap: self.max_gap,
            sample_step: self.sample_step,
            flip_z: !self.no_flip_z,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let session_text = match std::fs::read_to_string(&cli.session_path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error reading {}: {e}", cli.session_path.display());
            return ExitCode::FAILURE;
        }
    };

    let records: Vec<CaptureRecord> = match serde_json::from_str(&session_text) {
        Ok(records) => records,
        Err(e) => {
            eprintln!("Error parsing {}: {e}", cli.session_path.display());
            return ExitCode::FAILURE;
        }
    };
    eprintln!(
        "Session: {} ({} records)",
        cli.session_path.display(),
        records.len(),
    );

    let config = cli.pipeline_config();
    let result = match sugata_pipeline::process_session(records, &config) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Pipeline error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = std::fs::create_dir_all(&cli.out_dir) {
        eprintln!("Error creating {}: {e}", cli.out_dir.display());
        return ExitCode::FAILURE;
    }

    // Per-subject toolpaths, numbered in capture order.
    for (i, subject) in result.subjects.iter().enumerate() {
        let index = i + 1;

        let toolpath_json = match sugata_export::to_device_json(&subject.commands) {
            Ok(json) => json,
            Err(e) => {
                eprintln!("Error serializing subject {index}: {e}");
                return ExitCode::FAILURE;
            }
        };
        let toolpath_path = cli.out_dir.join(format!("toolpath_{index}.json"));
        if let Err(e) = std::fs::write(&toolpath_path, &toolpath_json) {
            eprintln!("Error writing {}: {e}", toolpath_path.display());
            return ExitCode::FAILURE;
        }

        if cli.svg {
            let title = format!("subject-{index}");
            let description = format!(
                "tolerance={} tilt={}",
                config.simplify_tolerance, config.tilt_degrees,
            );
            let svg = sugata_export::to_svg(
                &subject.commands,
                &sugata_export::SvgMetadata {
                    title: Some(&title),
                    description: Some(&description),
                },
            );
            let svg_path = cli.out_dir.join(format!("preview_{index}.svg"));
            if let Err(e) = std::fs::write(&svg_path, &svg) {
                eprintln!("Error writing {}: {e}", svg_path.display());
                return ExitCode::FAILURE;
            }
        }

        if cli.json {
            match serde_json::to_string_pretty(&subject.diagnostics) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("Error serializing diagnostics: {e}");
                    return ExitCode::FAILURE;
                }
            }
        } else {
            println!("--- Subject {index} ---");
            print!("{}", subject.diagnostics.report());
            println!();
        }
    }

    // Viewer composite across the whole session.
    let composite = sugata_export::build_composite(&result.records, &cli.cylinder_config());
    let geometry_json = match sugata_export::to_buffer_geometry_json(&composite) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Error serializing composite: {e}");
            return ExitCode::FAILURE;
        }
    };
    let composite_path = cli.out_dir.join("composite.json");
    if let Err(e) = std::fs::write(&composite_path, &geometry_json) {
        eprintln!("Error writing {}: {e}", composite_path.display());
        return ExitCode::FAILURE;
    }

    eprintln!(
        "Wrote {} toolpath file(s) and the composite ({} vertices) to {}",
        result.subjects.len(),
        composite.vertex_count(),
        cli.out_dir.display(),
    );

    ExitCode::SUCCESS
}

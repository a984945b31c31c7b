//! sugata-pipeline: Pure capture-to-toolpath drawing pipeline (sans-IO).
//!
//! Converts per-subject geometric captures — body silhouette point sets
//! and facial-landmark graphs with explicit connectivity — into ordered
//! pen-state command sequences for a plotting device:
//! contour preparation -> subject batching -> simplification ->
//! feature selection -> joint transform -> depth classification ->
//! toolpath assembly.
//!
//! This crate has **no I/O dependencies** — it operates on in-memory
//! capture records and returns structured data. File reading, the
//! device transport, and the web viewer upload live in external
//! collaborators.

pub mod capture;
pub mod diagnostics;
pub mod features;
pub mod linearize;
pub mod order;
pub mod simplify;
pub mod toolpath;
pub mod transform;
pub mod types;

pub use capture::{CaptureRecord, SubjectRecord};
pub use diagnostics::SubjectDiagnostics;
pub use types::{
    DepthTier, LabeledLine, LineCategory, PenState, PipelineConfig, PipelineError, Point, Point3,
    Polyline, ToolpathCommand,
};

/// Result of processing one subject.
#[derive(Debug, Clone)]
pub struct SubjectOutput {
    /// The assembled toolpath, trailer included. Exactly the trailer
    /// when the subject had no resolvable geometry.
    pub commands: Vec<ToolpathCommand>,
    /// Counts and classification collected during processing.
    pub diagnostics: SubjectDiagnostics,
}

/// Result of processing a whole capture session.
#[derive(Debug, Clone)]
pub struct SessionResult {
    /// The prepared (region-simplified) capture records. The cylindrical
    /// composite consumes these — it operates on pre-transform data.
    pub records: Vec<CaptureRecord>,
    /// Per-subject toolpaths, in capture order.
    pub subjects: Vec<SubjectOutput>,
}

/// Run the pipeline for a single subject.
///
/// # Pipeline steps
///
/// 1. Simplify the silhouette contour (Ramer-Douglas-Peucker)
/// 2. Select facial-feature lines (jawline / nose / connectivity rules)
/// 3. Transform all lines jointly (rotate, normalize, shear, recentre)
/// 4. Classify the pen depth tier from the subject's height extent
/// 5. Assemble the pen-state command sequence with the fixed trailer
///
/// # Errors
///
/// Returns [`PipelineError::InvalidConfig`] for an invalid configuration
/// and [`PipelineError::UnknownLandmark`] when a facial-feature
/// connection references a missing landmark.
pub fn process_subject(
    subject: &SubjectRecord,
    config: &PipelineConfig,
) -> Result<SubjectOutput, PipelineError> {
    config.validate()?;

    // 1. Simplify the whole-subject silhouette.
    let contour_points_before = subject.full_contour.as_ref().map_or(0, Polyline::len);
    let mut lines = Vec::new();
    if let Some(contour) = &subject.full_contour {
        let simplified = simplify::simplify(contour, config.simplify_tolerance);
        if !simplified.is_empty() {
            lines.push(LabeledLine::new(LineCategory::Full, simplified));
        }
    }
    let contour_points_after = lines.first().map_or(0, |l| l.line.len());

    // 2. Facial features.
    let feature_lines = features::select_features(&subject.features)?;
    let feature_line_count = feature_lines
        .iter()
        .filter(|l| l.category == LineCategory::Feature)
        .count();
    let has_nose_line = feature_lines
        .iter()
        .any(|l| l.category == LineCategory::Nose);
    lines.extend(feature_lines);

    // 3. Joint transform into device space.
    let transformed = transform::transform_lines(lines, config);

    // 4. One depth tier per subject.
    let depth = DepthTier::classify(subject.height_extent);

    // 5. Assemble commands (empty line set still yields the trailer).
    let commands = toolpath::assemble(&transformed, depth);

    let diagnostics = SubjectDiagnostics {
        contour_points_before,
        contour_points_after,
        feature_line_count,
        has_nose_line,
        line_count: transformed.len(),
        command_count: commands.len(),
        height_extent: subject.height_extent,
        depth_tier: depth,
    };

    Ok(SubjectOutput {
        commands,
        diagnostics,
    })
}

/// Run the pipeline for a whole capture session.
///
/// Prepares contour records (per-region simplification and height
/// bookkeeping), batches records into subjects, and processes each
/// subject in capture order. The prepared records are returned alongside
/// the subjects for the cylindrical composite path.
///
/// # Errors
///
/// Fail-fast: the first subject error aborts the session (no partial
/// batch recovery).
pub fn process_session(
    records: Vec<CaptureRecord>,
    config: &PipelineConfig,
) -> Result<SessionResult, PipelineError> {
    config.validate()?;

    let records = capture::prepare_contours(records, config.simplify_tolerance);
    let subjects = capture::collect_subjects(&records)
        .iter()
        .map(|subject| process_subject(subject, config))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SessionResult { records, subjects })
}

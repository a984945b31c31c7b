//! Toolpath assembly: turn a subject's transformed line set into the
//! ordered pen-state command sequence the plotter firmware consumes.
//!
//! Emission rules per line category:
//!
//! - **Full** silhouette strokes draw every point at the subject's depth
//!   tier and lift the pen on the final point. A one-point line is a
//!   pen-up marker, not a stroke.
//! - **Feature** strokes draw every point, then repeat the last point
//!   with the pen lifted so the lift happens in place.
//! - **Nose** strokes behave like features and then park the pen at a
//!   fixed clearance position away from the face.
//!
//! Every sequence ends with a fixed 4-command trailer that parks the
//! head and emits a hardware synchronization pulse. The trailer is a
//! device handshake, not geometry.

use crate::types::{DepthTier, LabeledLine, LineCategory, PenState, ToolpathCommand};

/// Parking position for the pen after the nose stroke.
const NOSE_PARK: (f64, f64) = (50.0, 50.0);
/// Head parking position used by the trailer.
const TRAILER_PARK: (f64, f64) = (-250.0, 50.0);

/// Assemble the command sequence for one subject.
///
/// `depth` is the subject's single depth tier, reused for every drawn
/// point. A subject with zero lines still produces the trailer — an
/// explicit empty drawing keeps positional correspondence with its
/// neighbors in the session.
#[must_use = "returns the assembled toolpath"]
pub fn assemble(lines: &[LabeledLine], depth: DepthTier) -> Vec<ToolpathCommand> {
    let mut commands = Vec::new();
    let draw = PenState::Draw(depth);

    for labeled in lines {
        let points = labeled.line.points();
        if points.is_empty() {
            continue;
        }

        match labeled.category {
            LineCategory::Full => {
                if points.len() == 1 {
                    // Degenerate dot: position only, pen stays up.
                    let p = points[0];
                    commands.push(ToolpathCommand::new(p.x, p.y, PenState::Up));
                } else {
                    for p in &points[..points.len() - 1] {
                        commands.push(ToolpathCommand::new(p.x, p.y, draw));
                    }
                    let last = points[points.len() - 1];
                    commands.push(ToolpathCommand::new(last.x, last.y, PenState::Up));
                }
            }
            LineCategory::Feature | LineCategory::Nose => {
                for p in points {
                    commands.push(ToolpathCommand::new(p.x, p.y, draw));
                }
                let last = points[points.len() - 1];
                commands.push(ToolpathCommand::new(last.x, last.y, PenState::Up));

                if labeled.category == LineCategory::Nose {
                    commands.push(ToolpathCommand::new(NOSE_PARK.0, NOSE_PARK.1, PenState::Up));
                }
            }
        }
    }

    commands.extend(trailer());
    commands
}

/// The fixed park-and-pulse trailer appended to every subject.
#[must_use]
pub fn trailer() -> [ToolpathCommand; 4] {
    let (x, y) = TRAILER_PARK;
    [
        ToolpathCommand::new(x, y, PenState::Up),
        ToolpathCommand::new(x, y, PenState::SyncPulse),
        ToolpathCommand::new(x, y, PenState::SyncPulse),
        ToolpathCommand::new(x, y, PenState::Up),
    ]
}

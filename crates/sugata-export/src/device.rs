//! Device toolpath serializer.
//!
//! The plotter firmware transport reads one JSON file per subject: an
//! array of `{"x": .., "y": .., "updown": 0..3}` objects, sent to the
//! servo controller one command at a time. `updown` 0 lifts the pen;
//! 1..=3 draw at increasing depth. The four trailing commands at the
//! parking coordinate are the head-park/sync handshake, not geometry.
//!
//! This is a pure function with no I/O — it returns a `String`.

use sugata_pipeline::ToolpathCommand;

use crate::ExportError;

/// Serialize a subject's toolpath into the firmware's JSON format.
///
/// # Errors
///
/// Returns [`ExportError::Json`] if serialization fails.
pub fn to_device_json(commands: &[ToolpathCommand]) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(commands)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use sugata_pipeline::{DepthTier, PenState};

    use super::*;

    #[test]
    fn empty_toolpath_is_an_empty_array() {
        let json = to_device_json(&[]).unwrap();
        assert_eq!(json, "[]");
    }

    #[test]
    fn commands_use_the_updown_field() {
        let commands = [
            ToolpathCommand::new(1.5, 2.5, PenState::Draw(DepthTier::Medium)),
            ToolpathCommand::new(1.5, 2.5, PenState::Up),
        ];
        let json = to_device_json(&commands).unwrap();
        assert!(json.contains("\"updown\": 2"));
        assert!(json.contains("\"updown\": 0"));
        assert!(!json.contains("pen"));
    }

    #[test]
    fn output_parses_back_as_command_list() {
        let commands = [
            ToolpathCommand::new(-250.0, 50.0, PenState::Up),
            ToolpathCommand::new(-250.0, 50.0, PenState::SyncPulse),
        ];
        let json = to_device_json(&commands).unwrap();
        let parsed: Vec<ToolpathCommand> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), 2);
        // The pulse decodes as a shallow draw — indistinguishable on the wire.
        assert_eq!(parsed[1].pen, PenState::Draw(DepthTier::Shallow));
    }
}

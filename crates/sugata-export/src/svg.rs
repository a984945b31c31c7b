//! SVG preview serializer.
//!
//! Renders an assembled toolpath as an SVG document using the [`svg`]
//! crate for document construction and path data formatting. Each
//! pen-down stroke becomes a `<path>` element; pen-up travel moves and
//! the trailer handshake are not drawn. Intended for inspecting a
//! subject's drawing before committing the plotter.
//!
//! Optional [`SvgMetadata`] embeds `<title>` and `<desc>` elements so
//! exported previews are identifiable in file managers.
//!
//! This is a pure function with no I/O — it returns a `String`.

use svg::Document;
use svg::node::Text;
use svg::node::element::path::Data;
use svg::node::element::{Description, Path, Title};

use sugata_pipeline::{PenState, ToolpathCommand};

/// Margin around the command extent in the `viewBox`, device units.
const VIEW_MARGIN: f64 = 10.0;

/// Metadata to embed in the SVG document.
///
/// Both fields are optional. When present, a `<title>` and/or `<desc>`
/// element is emitted immediately after the opening `<svg>` tag.
#[derive(Debug, Clone, Default)]
pub struct SvgMetadata<'a> {
    /// Document title — emitted as `<title>`. Typically the subject's
    /// output filename.
    pub title: Option<&'a str>,

    /// Document description — emitted as `<desc>`. Typically pipeline
    /// parameters so previews are distinguishable.
    pub description: Option<&'a str>,
}

/// Serialize a toolpath into an SVG preview string.
///
/// Strokes are reconstructed from pen states: a run of draw commands
/// plus the pen-up command that terminates it (the lift happens at
/// arrival, so the lift target is the stroke's final vertex). Strokes
/// with fewer than 2 points are skipped; sync pulses are ignored.
#[must_use]
pub fn to_svg(commands: &[ToolpathCommand], metadata: &SvgMetadata<'_>) -> String {
    let (min_x, min_y, width, height) = view_box(commands);

    let mut doc = Document::new()
        .set("width", width)
        .set("height", height)
        .set("viewBox", (min_x, min_y, width, height));

    if let Some(title) = metadata.title {
        doc = doc.add(Title::new(title));
    }
    if let Some(description) = metadata.description {
        doc = doc.add(Description::new().add(Text::new(description)));
    }

    for stroke in strokes(commands) {
        if stroke.len() < 2 {
            continue;
        }
        let mut data = Data::new().move_to(stroke[0]);
        for &(x, y) in &stroke[1..] {
            data = data.line_to((x, y));
        }
        let path = Path::new()
            .set("d", data)
            .set("fill", "none")
            .set("stroke", "black")
            .set("stroke-width", 1);
        doc = doc.add(path);
    }

    // The svg crate omits the XML declaration, so we prepend it.
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{doc}\n")
}

/// Split a command sequence into pen-down strokes.
fn strokes(commands: &[ToolpathCommand]) -> Vec<Vec<(f64, f64)>> {
    let mut result = Vec::new();
    let mut current: Vec<(f64, f64)> = Vec::new();

    for cmd in commands {
        match cmd.pen {
            PenState::Draw(_) => current.push((cmd.x, cmd.y)),
            PenState::Up => {
                if !current.is_empty() {
                    // The lift target closes the stroke.
                    if current.last() != Some(&(cmd.x, cmd.y)) {
                        current.push((cmd.x, cmd.y));
                    }
                    result.push(std::mem::take(&mut current));
                }
            }
            PenState::SyncPulse => {}
        }
    }
    if !current.is_empty() {
        result.push(current);
    }

    result
}

/// `(min_x, min_y, width, height)` covering every command, with margin.
fn view_box(commands: &[ToolpathCommand]) -> (f64, f64, f64, f64) {
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for cmd in commands {
        min_x = min_x.min(cmd.x);
        min_y = min_y.min(cmd.y);
        max_x = max_x.max(cmd.x);
        max_y = max_y.max(cmd.y);
    }

    if min_x > max_x {
        // No commands: an arbitrary small empty canvas.
        return (0.0, 0.0, 2.0 * VIEW_MARGIN, 2.0 * VIEW_MARGIN);
    }
    (
        min_x - VIEW_MARGIN,
        min_y - VIEW_MARGIN,
        max_x - min_x + 2.0 * VIEW_MARGIN,
        max_y - min_y + 2.0 * VIEW_MARGIN,
    )
}

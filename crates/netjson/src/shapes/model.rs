//! Shape definitions and their drawing programs
//!
//! A [`ShapeDefinition`] is the parsed form of a drawio stencil: nominal
//! size, two ordered drawing programs (`background` and `foreground`) and
//! the named connection ports wires attach to.

use std::fmt;

/// Named anchor on a shape boundary, in unit-square coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionPort {
    pub name: String,
    pub x: f64,
    pub y: f64,
    /// Attribute text of `x` exactly as declared
    pub x_text: String,
    /// Attribute text of `y` exactly as declared
    pub y_text: String,
}

impl ConnectionPort {
    pub fn new(name: impl Into<String>, x_text: &str, y_text: &str) -> Option<Self> {
        let x = x_text.trim().parse::<f64>().ok()?;
        let y = y_text.trim().parse::<f64>().ok()?;
        Some(Self {
            name: name.into(),
            x,
            y,
            x_text: x_text.trim().to_string(),
            y_text: y_text.trim().to_string(),
        })
    }

    /// Exact textual match against wire anchor offsets
    pub fn matches(&self, x_text: &str, y_text: &str) -> bool {
        self.x_text == x_text.trim() && self.y_text == y_text.trim()
    }
}

/// Sub-command of a `path` block
#[derive(Debug, Clone, PartialEq)]
pub enum PathCommand {
    Move {
        x: f64,
        y: f64,
    },
    Line {
        x: f64,
        y: f64,
    },
    Quad {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
    Curve {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        x3: f64,
        y3: f64,
    },
    Arc {
        rx: f64,
        ry: f64,
        rotation: f64,
        large_arc: bool,
        sweep: bool,
        x: f64,
        y: f64,
    },
    Close,
    /// Tag not understood inside a path block
    Unknown(String),
}

/// Fill directive applied to the preceding segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillKind {
    Fill,
    FillStroke,
}

impl fmt::Display for FillKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FillKind::Fill => write!(f, "fill"),
            FillKind::FillStroke => write!(f, "fillstroke"),
        }
    }
}

/// Font bit for bold in a drawio `fontstyle` mask
pub const FONT_BOLD: u32 = 1;
/// Font bit for italic in a drawio `fontstyle` mask
pub const FONT_ITALIC: u32 = 2;

/// Text styling instruction
#[derive(Debug, Clone, PartialEq)]
pub enum TextStyle {
    Family(String),
    Size(f64),
    /// drawio `fontstyle` bit mask
    Style(u32),
    Weight(String),
    Variant(String),
    Color(String),
}

/// A `text` instruction
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextRun {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub rotation: Option<f64>,
    pub align: Option<String>,
    pub valign: Option<String>,
}

/// One instruction of a drawing program
#[derive(Debug, Clone, PartialEq)]
pub enum PathInstruction {
    Path(Vec<PathCommand>),
    Rect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
    },
    RoundRect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        arcsize: Option<f64>,
    },
    Ellipse {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
    },
    Fill(FillKind),
    TextStyle(TextStyle),
    Text(TextRun),
    /// Stroke/colour/state tag with no effect on geometry
    StyleAttribute(String),
    Unknown(String),
}

impl PathInstruction {
    /// Returns true if compiling this instruction produces a path segment
    pub fn is_geometric(&self) -> bool {
        matches!(
            self,
            PathInstruction::Path(_)
                | PathInstruction::Rect { .. }
                | PathInstruction::RoundRect { .. }
                | PathInstruction::Ellipse { .. }
        )
    }
}

/// Parsed shape: nominal size, drawing programs and connection ports
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShapeDefinition {
    pub name: String,
    pub width: f64,
    pub height: f64,
    pub background: Vec<PathInstruction>,
    pub foreground: Vec<PathInstruction>,
    pub connections: Vec<ConnectionPort>,
}

impl ShapeDefinition {
    /// Port whose declared coordinates match the given text exactly
    pub fn port_at(&self, x_text: &str, y_text: &str) -> Option<&ConnectionPort> {
        self.connections
            .iter()
            .find(|port| port.matches(x_text, y_text))
    }

    pub fn port(&self, name: &str) -> Option<&ConnectionPort> {
        self.connections.iter().find(|port| port.name == name)
    }

    pub fn port_names(&self) -> Vec<&str> {
        self.connections.iter().map(|p| p.name.as_str()).collect()
    }

    /// Both layers, background first
    pub fn instructions(&self) -> impl Iterator<Item = &PathInstruction> {
        self.background.iter().chain(self.foreground.iter())
    }

    /// Number of instructions that compile to a path segment
    pub fn geometric_count(&self) -> usize {
        self.instructions().filter(|i| i.is_geometric()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_port_shape() -> ShapeDefinition {
        ShapeDefinition {
            name: "two".to_string(),
            width: 100.0,
            height: 20.0,
            connections: vec![
                ConnectionPort::new("in", "0", "0.5").unwrap(),
                ConnectionPort::new("out", "1", "0.5").unwrap(),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_port_lookup_is_textual() {
        let shape = two_port_shape();
        assert_eq!(shape.port_at("1", "0.5").map(|p| p.name.as_str()), Some("out"));
        // Numerically equal but written differently
        assert!(shape.port_at("1.0", "0.5").is_none());
        assert!(shape.port_at("0.5", "0.5").is_none());
    }

    #[test]
    fn test_port_rejects_non_numeric() {
        assert!(ConnectionPort::new("bad", "left", "0").is_none());
        let port = ConnectionPort::new("p", " 0.25 ", "1").unwrap();
        assert_eq!(port.x, 0.25);
        assert_eq!(port.x_text, "0.25");
    }

    #[test]
    fn test_geometric_count() {
        let mut shape = two_port_shape();
        shape.background.push(PathInstruction::Rect {
            x: 0.0,
            y: 0.0,
            w: 10.0,
            h: 10.0,
        });
        shape.foreground.push(PathInstruction::Fill(FillKind::Fill));
        shape
            .foreground
            .push(PathInstruction::Path(vec![PathCommand::Move { x: 0.0, y: 0.0 }]));
        shape
            .foreground
            .push(PathInstruction::StyleAttribute("stroke".to_string()));
        assert_eq!(shape.geometric_count(), 2);
        assert_eq!(shape.port_names(), vec!["in", "out"]);
    }
}

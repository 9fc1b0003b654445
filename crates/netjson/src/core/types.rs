//! Core type definitions for network diagram conversion
//!
//! This module contains the fundamental types used throughout netjson:
//! element kinds, cardinal directions, geometry, diagram elements and wires.

use std::fmt;

/// Kind of network element found in a drawio network diagram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum ElementKind {
    /// A network node (plain endpoint, no ports of its own)
    #[default]
    Node,
    /// A network link drawn with a shape that declares connection ports
    Link,
    /// A spotter attached to the network, drawn with a shape
    Spotter,
    /// The ground node
    Ground,
    /// A reference node
    Ref,
}

impl ElementKind {
    /// Parse the `gunns` attribute of a drawio object.
    ///
    /// Returns `None` for wires and anything that is not a network element.
    pub fn from_gunns_attr(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "node" => Some(ElementKind::Node),
            "link" => Some(ElementKind::Link),
            "spotter" => Some(ElementKind::Spotter),
            "gnd" | "ground" => Some(ElementKind::Ground),
            "ref" | "reference" => Some(ElementKind::Ref),
            _ => None,
        }
    }

    /// GoJS node template category for this kind
    pub fn category(&self) -> &'static str {
        match self {
            ElementKind::Node => "Node",
            ElementKind::Link => "Link",
            ElementKind::Spotter => "Spotter",
            ElementKind::Ground => "Ground",
            ElementKind::Ref => "Ref",
        }
    }

    /// Returns true if wires bind to this element through shape ports
    pub fn has_shape_ports(&self) -> bool {
        matches!(self, ElementKind::Link | ElementKind::Spotter)
    }

    /// Returns true if this is a synthetic node with a fixed anchor port
    pub fn is_anchor_only(&self) -> bool {
        matches!(self, ElementKind::Ground | ElementKind::Ref)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKind::Node => write!(f, "node"),
            ElementKind::Link => write!(f, "link"),
            ElementKind::Spotter => write!(f, "spotter"),
            ElementKind::Ground => write!(f, "ground"),
            ElementKind::Ref => write!(f, "ref"),
        }
    }
}

/// Cardinal direction from a drawio `direction` style token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum CardinalDirection {
    #[default]
    East,
    South,
    West,
    North,
}

impl CardinalDirection {
    /// Parse a drawio direction value; anything unrecognised is east
    pub fn from_style(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_lowercase()).as_deref() {
            Some("south") => CardinalDirection::South,
            Some("west") => CardinalDirection::West,
            Some("north") => CardinalDirection::North,
            _ => CardinalDirection::East,
        }
    }

    /// Rotation offset in degrees added to the explicit `rotation` value
    pub fn offset_degrees(&self) -> f64 {
        match self {
            CardinalDirection::East => 0.0,
            CardinalDirection::South => 90.0,
            CardinalDirection::West => 180.0,
            CardinalDirection::North => 270.0,
        }
    }

    /// Returns true if this direction turns the shape a quarter turn
    pub fn is_quarter_turn(&self) -> bool {
        matches!(self, CardinalDirection::South | CardinalDirection::North)
    }
}

impl fmt::Display for CardinalDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardinalDirection::East => write!(f, "east"),
            CardinalDirection::South => write!(f, "south"),
            CardinalDirection::West => write!(f, "west"),
            CardinalDirection::North => write!(f, "north"),
        }
    }
}

/// Top-left anchored geometry of a diagram cell
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Geometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Geometry {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Centre of the stored box
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// A network element in the diagram with all its metadata
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramElement {
    /// Unique cell identifier
    pub id: String,
    /// Display label
    pub label: String,
    /// Network role of the element
    pub kind: ElementKind,
    /// Cell geometry in diagram coordinates
    pub geometry: Geometry,
    /// Raw drawio style descriptor
    pub style: String,
}

impl DiagramElement {
    /// Create a new element with an empty style
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        kind: ElementKind,
        geometry: Geometry,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
            geometry,
            style: String::new(),
        }
    }

    /// Create a new element with a style descriptor
    pub fn with_style(
        id: impl Into<String>,
        label: impl Into<String>,
        kind: ElementKind,
        geometry: Geometry,
        style: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
            geometry,
            style: style.into(),
        }
    }
}

/// A wire connecting two diagram elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wire {
    /// Unique cell identifier
    pub id: String,
    /// Wire label (the network port number)
    pub label: String,
    /// Source element ID
    pub source: String,
    /// Target element ID
    pub target: String,
    /// Raw drawio edge style carrying exit/entry anchor offsets
    pub style: String,
}

impl Wire {
    /// Create a new wire with an empty style
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            source: source.into(),
            target: target.into(),
            style: String::new(),
        }
    }

    /// Create a new wire with an edge style
    pub fn with_style(
        id: impl Into<String>,
        label: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        style: impl Into<String>,
    ) -> Self {
        Self {
            style: style.into(),
            ..Self::new(id, label, source, target)
        }
    }
}

/// Format a number the way the layout schema expects.
///
/// Integral values drop the fractional part (`120`, not `120.0`), everything
/// else uses the shortest round-trip representation.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

//! Shape markup reader
//!
//! Reads drawio stencil XML (`<shape>` with `<connections>`, `<background>`
//! and `<foreground>`) into a [`ShapeDefinition`].

use std::collections::HashSet;

use roxmltree::{Document, Node};
use tracing::trace;

use super::model::{
    ConnectionPort, FillKind, PathCommand, PathInstruction, ShapeDefinition, TextRun, TextStyle,
};
use crate::core::{NetjsonError, NetjsonResult};

/// Tags that change stroke, colour or canvas state but not geometry
const STYLE_TAGS: &[&str] = &[
    "stroke",
    "strokecolor",
    "fillcolor",
    "gradientcolor",
    "strokewidth",
    "dashed",
    "dashpattern",
    "linejoin",
    "linecap",
    "miterlimit",
    "alpha",
    "fillalpha",
    "strokealpha",
    "save",
    "restore",
    "shadow",
];

/// Parse shape markup
///
/// The root may be a `<shape>` element or a `<shapes>` library, in which
/// case the first `<shape>` is used.
pub fn parse_shape(markup: &str) -> NetjsonResult<ShapeDefinition> {
    let document = Document::parse(markup.trim())
        .map_err(|e| NetjsonError::shape_markup(format!("invalid XML: {}", e)))?;

    let root = document.root_element();
    let shape = match root.tag_name().name() {
        "shape" => root,
        "shapes" => elements(root)
            .find(|n| n.has_tag_name("shape"))
            .ok_or_else(|| NetjsonError::shape_markup("<shapes> contains no <shape>"))?,
        other => {
            return Err(NetjsonError::shape_markup(format!(
                "expected <shape> root, found <{}>",
                other
            )))
        }
    };

    read_shape(shape)
}

fn read_shape(shape: Node<'_, '_>) -> NetjsonResult<ShapeDefinition> {
    let mut definition = ShapeDefinition {
        name: shape.attribute("name").unwrap_or_default().to_string(),
        width: optional_number(shape, "w")?.unwrap_or(0.0),
        height: optional_number(shape, "h")?.unwrap_or(0.0),
        ..Default::default()
    };

    for child in elements(shape) {
        match child.tag_name().name() {
            "connections" => definition.connections = read_connections(child)?,
            "background" => definition.background = read_program(child)?,
            "foreground" => definition.foreground = read_program(child)?,
            other => trace!(tag = other, "Ignoring shape child"),
        }
    }

    Ok(definition)
}

fn read_connections(node: Node<'_, '_>) -> NetjsonResult<Vec<ConnectionPort>> {
    let mut ports = Vec::new();
    let mut seen = HashSet::new();

    for (index, constraint) in elements(node)
        .filter(|n| n.has_tag_name("constraint"))
        .enumerate()
    {
        let name = constraint
            .attribute("name")
            .map(str::to_string)
            .unwrap_or_else(|| format!("P{}", index));
        let x = constraint.attribute("x").unwrap_or("0");
        let y = constraint.attribute("y").unwrap_or("0");

        let port = ConnectionPort::new(name.clone(), x, y).ok_or_else(|| {
            NetjsonError::shape_markup(format!(
                "constraint '{}' has non-numeric coordinates ({}, {})",
                name, x, y
            ))
        })?;

        if !seen.insert(name.clone()) {
            return Err(NetjsonError::shape_markup(format!(
                "duplicate connection port '{}'",
                name
            )));
        }
        ports.push(port);
    }

    Ok(ports)
}

fn read_program(layer: Node<'_, '_>) -> NetjsonResult<Vec<PathInstruction>> {
    elements(layer).map(read_instruction).collect()
}

fn read_instruction(node: Node<'_, '_>) -> NetjsonResult<PathInstruction> {
    let tag = node.tag_name().name();
    let instruction = match tag {
        "path" => PathInstruction::Path(elements(node).map(read_command).collect::<Result<_, _>>()?),
        "rect" => PathInstruction::Rect {
            x: number(node, "x")?,
            y: number(node, "y")?,
            w: number(node, "w")?,
            h: number(node, "h")?,
        },
        "roundrect" => PathInstruction::RoundRect {
            x: number(node, "x")?,
            y: number(node, "y")?,
            w: number(node, "w")?,
            h: number(node, "h")?,
            arcsize: optional_number(node, "arcsize")?,
        },
        "ellipse" => PathInstruction::Ellipse {
            x: number(node, "x")?,
            y: number(node, "y")?,
            w: number(node, "w")?,
            h: number(node, "h")?,
        },
        "fill" => PathInstruction::Fill(FillKind::Fill),
        "fillstroke" => PathInstruction::Fill(FillKind::FillStroke),
        "fontfamily" => {
            PathInstruction::TextStyle(TextStyle::Family(text_attr(node, "family")))
        }
        "fontsize" => PathInstruction::TextStyle(TextStyle::Size(number(node, "size")?)),
        "fontstyle" => {
            let mask = optional_number(node, "style")?.unwrap_or(0.0);
            PathInstruction::TextStyle(TextStyle::Style(mask.max(0.0) as u32))
        }
        "fontweight" => {
            PathInstruction::TextStyle(TextStyle::Weight(text_attr(node, "weight")))
        }
        "fontvariant" => {
            PathInstruction::TextStyle(TextStyle::Variant(text_attr(node, "variant")))
        }
        "fontcolor" => PathInstruction::TextStyle(TextStyle::Color(text_attr(node, "color"))),
        "text" => PathInstruction::Text(TextRun {
            text: text_attr(node, "str"),
            x: number(node, "x")?,
            y: number(node, "y")?,
            rotation: optional_number(node, "rotation")?,
            align: node.attribute("align").map(str::to_string),
            valign: node.attribute("valign").map(str::to_string),
        }),
        style if STYLE_TAGS.contains(&style) => PathInstruction::StyleAttribute(style.to_string()),
        other => PathInstruction::Unknown(other.to_string()),
    };
    Ok(instruction)
}

fn read_command(node: Node<'_, '_>) -> NetjsonResult<PathCommand> {
    let command = match node.tag_name().name() {
        "move" => PathCommand::Move {
            x: number(node, "x")?,
            y: number(node, "y")?,
        },
        "line" => PathCommand::Line {
            x: number(node, "x")?,
            y: number(node, "y")?,
        },
        "quad" => PathCommand::Quad {
            x1: number(node, "x1")?,
            y1: number(node, "y1")?,
            x2: number(node, "x2")?,
            y2: number(node, "y2")?,
        },
        "curve" if node.has_attribute("x3") => PathCommand::Curve {
            x1: number(node, "x1")?,
            y1: number(node, "y1")?,
            x2: number(node, "x2")?,
            y2: number(node, "y2")?,
            x3: number(node, "x3")?,
            y3: number(node, "y3")?,
        },
        // Legacy naming: x,y,x1,y1,x2,y2 in emission order
        "curve" => PathCommand::Curve {
            x1: number(node, "x")?,
            y1: number(node, "y")?,
            x2: number(node, "x1")?,
            y2: number(node, "y1")?,
            x3: number(node, "x2")?,
            y3: number(node, "y2")?,
        },
        "arc" => PathCommand::Arc {
            rx: number(node, "rx")?,
            ry: number(node, "ry")?,
            rotation: optional_number(node, "x-axis-rotation")?.unwrap_or(0.0),
            large_arc: optional_number(node, "large-arc-flag")?.unwrap_or(0.0) != 0.0,
            sweep: optional_number(node, "sweep-flag")?.unwrap_or(0.0) != 0.0,
            x: number(node, "x")?,
            y: number(node, "y")?,
        },
        "close" => PathCommand::Close,
        other => PathCommand::Unknown(other.to_string()),
    };
    Ok(command)
}

fn elements<'a, 'input>(node: Node<'a, 'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|n| n.is_element())
}

fn text_attr(node: Node<'_, '_>, name: &str) -> String {
    node.attribute(name).unwrap_or_default().to_string()
}

fn number(node: Node<'_, '_>, name: &str) -> NetjsonResult<f64> {
    optional_number(node, name)?.ok_or_else(|| {
        NetjsonError::shape_markup(format!(
            "<{}> is missing attribute '{}'",
            node.tag_name().name(),
            name
        ))
    })
}

fn optional_number(node: Node<'_, '_>, name: &str) -> NetjsonResult<Option<f64>> {
    match node.attribute(name) {
        None => Ok(None),
        Some(raw) => raw.trim().parse::<f64>().map(Some).map_err(|_| {
            NetjsonError::shape_markup(format!(
                "<{}> attribute '{}' is not a number: '{}'",
                node.tag_name().name(),
                name,
                raw
            ))
        }),
    }
}

//! drawio document reader
//!
//! Accepts an `<mxfile>` (first `<diagram>`, plain or compressed) or a bare
//! `<mxGraphModel>`. Network elements are `<object>`/`<UserObject>` cells
//! tagged with a `gunns` attribute; wires are edge cells. An element with
//! unreadable geometry or a repeated ID is skipped and recorded on the
//! database rather than failing the document.

use anyhow::Result;
use roxmltree::{Document, Node};
use tracing::{debug, info, span, trace, warn, Level};

use super::NetworkDatabase;
use crate::core::{
    Database, DiagramElement, ElementKind, Geometry, NetjsonError, NetjsonResult, Parser, Wire,
};
use crate::shapes::stencil::decompress;

/// `gunns` attribute value marking a wire object
const WIRE_TAG: &str = "port";

/// drawio document parser
#[derive(Debug, Clone, Copy, Default)]
pub struct DrawioParser;

impl DrawioParser {
    pub fn new() -> Self {
        Self
    }

    fn read_document(&self, input: &str, database: &mut NetworkDatabase) -> NetjsonResult<()> {
        let document = Document::parse(input.trim())
            .map_err(|e| NetjsonError::document_parse(format!("invalid XML: {}", e)))?;
        let root = document.root_element();

        match root.tag_name().name() {
            "mxGraphModel" => read_model(root, database),
            "mxfile" => {
                let diagram = elements(root)
                    .find(|n| n.has_tag_name("diagram"))
                    .ok_or_else(|| NetjsonError::document_parse("<mxfile> has no <diagram>"))?;
                trace!(name = diagram.attribute("name").unwrap_or_default(), "Reading diagram");

                if let Some(model) = elements(diagram).find(|n| n.has_tag_name("mxGraphModel")) {
                    return read_model(model, database);
                }

                let compressed = diagram.text().map(str::trim).unwrap_or_default();
                if compressed.is_empty() {
                    return Err(NetjsonError::document_parse("<diagram> is empty"));
                }
                let markup = decompress(compressed).map_err(|e| {
                    NetjsonError::document_parse(format!("compressed diagram: {}", e))
                })?;
                debug!(bytes = markup.len(), "Inflated compressed diagram");

                let inner = Document::parse(&markup).map_err(|e| {
                    NetjsonError::document_parse(format!("compressed diagram: {}", e))
                })?;
                let model = inner.root_element();
                if !model.has_tag_name("mxGraphModel") {
                    return Err(NetjsonError::document_parse(format!(
                        "compressed diagram holds <{}>, expected <mxGraphModel>",
                        model.tag_name().name()
                    )));
                }
                read_model(model, database)
            }
            other => Err(NetjsonError::document_parse(format!(
                "expected <mxfile> or <mxGraphModel>, found <{}>",
                other
            ))),
        }
    }
}

impl Parser<NetworkDatabase> for DrawioParser {
    fn parse(&self, input: &str, database: &mut NetworkDatabase) -> Result<()> {
        let parse_span = span!(Level::INFO, "parse_drawio", input_len = input.len());
        let _enter = parse_span.enter();

        self.read_document(input, database)?;

        info!(
            element_count = database.node_count(),
            wire_count = database.edge_count(),
            "Parsed drawio document"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "drawio"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }

    fn can_parse(&self, input: &str) -> bool {
        let head = input.trim_start();
        head.starts_with("<mxfile")
            || head.starts_with("<mxGraphModel")
            || (head.starts_with("<?xml") && (input.contains("<mxfile") || input.contains("<mxGraphModel")))
    }
}

fn read_model(model: Node<'_, '_>, database: &mut NetworkDatabase) -> NetjsonResult<()> {
    let root = elements(model)
        .find(|n| n.has_tag_name("root"))
        .ok_or_else(|| NetjsonError::document_parse("<mxGraphModel> has no <root>"))?;

    for child in elements(root) {
        match child.tag_name().name() {
            "object" | "UserObject" => read_object(child, database)?,
            "mxCell" => read_plain_cell(child, database)?,
            other => trace!(tag = other, "Ignoring model child"),
        }
    }
    Ok(())
}

/// A tagged `<object>` wrapping its `<mxCell>`
fn read_object(object: Node<'_, '_>, database: &mut NetworkDatabase) -> NetjsonResult<()> {
    let Some(id) = object.attribute("id") else {
        warn!("Object without id, skipping");
        return Ok(());
    };
    let Some(cell) = elements(object).find(|n| n.has_tag_name("mxCell")) else {
        warn!(object_id = id, "Object without mxCell, skipping");
        return Ok(());
    };

    let label = object
        .attribute("label")
        .or_else(|| cell.attribute("value"))
        .unwrap_or_default();
    let gunns = object.attribute("gunns").unwrap_or_default();

    if gunns.trim().eq_ignore_ascii_case(WIRE_TAG) || is_edge(cell) {
        return read_wire(id, label, cell, database);
    }

    match ElementKind::from_gunns_attr(gunns) {
        Some(kind) => {
            if database.has_element(id) {
                warn!(element_id = id, label, "Duplicate element id, skipping element");
                database.skip_element(id, format!("duplicate element id '{}'", id));
                return Ok(());
            }
            let geometry = match read_geometry(cell) {
                Ok(geometry) => geometry,
                Err(e) => {
                    warn!(element_id = id, label, error = %e, "Unreadable geometry, skipping element");
                    database.skip_element(id, e.to_string());
                    return Ok(());
                }
            };
            let element = DiagramElement::with_style(
                id,
                label,
                kind,
                geometry,
                cell.attribute("style").unwrap_or_default(),
            );
            stored(database.add_node(element))
        }
        None => {
            trace!(object_id = id, gunns, "Object is not a network element");
            Ok(())
        }
    }
}

/// An untagged `<mxCell>`: only edges matter
fn read_plain_cell(cell: Node<'_, '_>, database: &mut NetworkDatabase) -> NetjsonResult<()> {
    if !is_edge(cell) {
        return Ok(());
    }
    let Some(id) = cell.attribute("id") else {
        warn!("Edge cell without id, skipping");
        return Ok(());
    };
    read_wire(id, cell.attribute("value").unwrap_or_default(), cell, database)
}

fn read_wire(
    id: &str,
    label: &str,
    cell: Node<'_, '_>,
    database: &mut NetworkDatabase,
) -> NetjsonResult<()> {
    match (cell.attribute("source"), cell.attribute("target")) {
        (Some(source), Some(target)) => {
            let wire = Wire::with_style(
                id,
                label,
                source,
                target,
                cell.attribute("style").unwrap_or_default(),
            );
            stored(database.add_edge(wire))
        }
        (source, target) => {
            warn!(
                wire_id = id,
                has_source = source.is_some(),
                has_target = target.is_some(),
                "Wire is not attached at both ends, skipping"
            );
            Ok(())
        }
    }
}

fn read_geometry(cell: Node<'_, '_>) -> NetjsonResult<Geometry> {
    let Some(geometry) = elements(cell).find(|n| n.has_tag_name("mxGeometry")) else {
        return Ok(Geometry::default());
    };
    Ok(Geometry::new(
        number(geometry, "x")?,
        number(geometry, "y")?,
        number(geometry, "width")?,
        number(geometry, "height")?,
    ))
}

fn number(node: Node<'_, '_>, name: &str) -> NetjsonResult<f64> {
    match node.attribute(name) {
        None => Ok(0.0),
        Some(raw) => raw.trim().parse::<f64>().map_err(|_| {
            NetjsonError::document_parse(format!(
                "mxGeometry attribute '{}' is not a number: '{}'",
                name, raw
            ))
        }),
    }
}

/// Recover the typed error from a database insert
fn stored(result: Result<()>) -> NetjsonResult<()> {
    result.map_err(|e| {
        e.downcast::<NetjsonError>()
            .unwrap_or_else(|e| NetjsonError::database_error(e.to_string()))
    })
}

fn is_edge(cell: Node<'_, '_>) -> bool {
    cell.attribute("edge") == Some("1")
}

fn elements<'a, 'input>(node: Node<'a, 'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|n| n.is_element())
}

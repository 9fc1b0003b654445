//! GoJS layout renderer
//!
//! Renders a [`NetworkDatabase`] as a `go.GraphLinksModel` JSON document.
//! Shape, port and wire problems never abort the run: the element is
//! rendered with what could be resolved and a [`ConversionWarning`] is
//! recorded.

use anyhow::Result;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, span, warn, Level};

use super::layout::LayoutMapper;
use super::model::{GraphLinksModel, LinkRecord, NodeRecord, PortRecord, ShapeTextRecord};
use super::ports::PortResolver;
use crate::core::{
    format_number, Database, DiagramElement, ElementKind, NetjsonError, RenderConfig, Renderer,
};
use crate::plugins::drawio::NetworkDatabase;
use crate::shapes::{compile, resolve_shape, CompileWarning, CompiledShape, ShapeDefinition};

/// Non-fatal problem recorded during conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionWarning {
    /// Link or spotter rendered without geometry or ports
    ShapeUnresolved { element: String, reason: String },
    /// Shape compiled with a skipped instruction
    Instruction {
        element: String,
        warning: CompileWarning,
    },
    /// Wire end matched no declared port
    PortFallback { wire: String, element: String },
    /// Wire references an element missing from the document
    DanglingWire { wire: String, endpoint: String },
    /// Element left out while reading the document
    ElementSkipped { element: String, reason: String },
}

impl fmt::Display for ConversionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionWarning::ShapeUnresolved { element, reason } => {
                write!(f, "element '{}': shape not resolved: {}", element, reason)
            }
            ConversionWarning::Instruction { element, warning } => {
                write!(f, "element '{}': {}", element, warning)
            }
            ConversionWarning::PortFallback { wire, element } => {
                write!(
                    f,
                    "wire '{}': no port on '{}' matches its anchor",
                    wire, element
                )
            }
            ConversionWarning::DanglingWire { wire, endpoint } => {
                write!(f, "wire '{}': endpoint '{}' not found", wire, endpoint)
            }
            ConversionWarning::ElementSkipped { element, reason } => {
                write!(f, "element '{}': skipped: {}", element, reason)
            }
        }
    }
}

/// Model plus the warnings raised while building it
#[derive(Debug, Clone, Default)]
pub struct ConversionReport {
    pub model: GraphLinksModel,
    pub warnings: Vec<ConversionWarning>,
}

impl ConversionReport {
    pub fn has_shape_failures(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| matches!(w, ConversionWarning::ShapeUnresolved { .. }))
    }

    pub fn has_skipped_elements(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| matches!(w, ConversionWarning::ElementSkipped { .. }))
    }
}

/// Renders network databases to GoJS layout JSON
#[derive(Debug, Clone, Default)]
pub struct GojsRenderer {
    config: RenderConfig,
    mapper: LayoutMapper,
}

impl GojsRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RenderConfig) -> Self {
        Self {
            config,
            mapper: LayoutMapper::new(),
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Build the layout model
    pub fn convert(&self, database: &NetworkDatabase) -> ConversionReport {
        let render_span = span!(
            Level::INFO,
            "render_gojs",
            element_count = database.node_count(),
            wire_count = database.edge_count()
        );
        let _enter = render_span.enter();

        let mut warnings: Vec<ConversionWarning> = database
            .skipped()
            .iter()
            .map(|(element, reason)| ConversionWarning::ElementSkipped {
                element: element.clone(),
                reason: reason.clone(),
            })
            .collect();
        let mut shapes: HashMap<String, Arc<ShapeDefinition>> = HashMap::new();
        let mut keys: HashMap<&str, &str> = HashMap::new();
        let mut nodes = Vec::with_capacity(database.node_count());

        for element in database.nodes() {
            keys.insert(element.id.as_str(), element_key(element));
            let mut record = self.node_record(element);

            match resolve_shape(&element.style) {
                Ok(shape) => {
                    let compiled = compile(&shape);
                    warnings.extend(compiled.warnings.iter().map(|w| {
                        ConversionWarning::Instruction {
                            element: element.id.clone(),
                            warning: w.clone(),
                        }
                    }));
                    attach_shape(&mut record, &shape, &compiled);
                    shapes.insert(element.id.clone(), shape);
                }
                Err(e) if element.kind.has_shape_ports() => {
                    warn!(element_id = %element.id, label = %element.label, error = %e, "Shape not resolved, rendering without geometry");
                    warnings.push(ConversionWarning::ShapeUnresolved {
                        element: element.id.clone(),
                        reason: e.to_string(),
                    });
                }
                Err(e) => {
                    debug!(element_id = %element.id, kind = %element.kind, error = %e, "No shape for element");
                }
            }

            nodes.push(record);
        }

        let resolver = PortResolver::new(database, &shapes, &self.config);
        let mut links = Vec::with_capacity(database.edge_count());

        for wire in database.edges() {
            // Off by default: every attached wire becomes a link
            if self.config.drops_wire(&wire.label) {
                debug!(wire_id = %wire.id, label = %wire.label, "Wire label above limit, skipping");
                continue;
            }
            let binding = match resolver.resolve(wire) {
                Ok(binding) => binding,
                Err(NetjsonError::DanglingWire { wire, endpoint }) => {
                    warn!(wire_id = %wire, endpoint = %endpoint, "Wire endpoint not in document, skipping");
                    warnings.push(ConversionWarning::DanglingWire { wire, endpoint });
                    continue;
                }
                Err(e) => {
                    warn!(wire_id = %wire.id, error = %e, "Wire not resolved, skipping");
                    continue;
                }
            };

            for (fallback, element) in [
                (binding.from.fallback, &wire.source),
                (binding.to.fallback, &wire.target),
            ] {
                if fallback {
                    warnings.push(ConversionWarning::PortFallback {
                        wire: wire.id.clone(),
                        element: element.clone(),
                    });
                }
            }

            links.push(LinkRecord {
                label: wire.label.clone(),
                from: lookup_key(&keys, &wire.source),
                from_port: binding.from.name,
                to: lookup_key(&keys, &wire.target),
                to_port: binding.to.name,
            });
        }

        info!(
            node_records = nodes.len(),
            link_records = links.len(),
            warning_count = warnings.len(),
            "Built GoJS model"
        );

        ConversionReport {
            model: GraphLinksModel::new(nodes, links),
            warnings,
        }
    }

    /// Serialize a model according to the render configuration
    pub fn serialize(&self, model: &GraphLinksModel) -> Result<String> {
        let json = if self.config.pretty {
            serde_json::to_string_pretty(model)
        } else {
            serde_json::to_string(model)
        }
        .map_err(|e| NetjsonError::render_error(e.to_string()))?;

        if self.config.ascii_only {
            Ok(json.chars().filter(char::is_ascii).collect())
        } else {
            Ok(json)
        }
    }

    fn node_record(&self, element: &DiagramElement) -> NodeRecord {
        let layout = self.mapper.map_element(element);
        let text = match element.kind {
            ElementKind::Node => format!("Node{}", element.label),
            _ => element.label.clone(),
        };
        NodeRecord {
            key: element_key(element).to_string(),
            category: element.kind.category().to_string(),
            pos: layout.pos,
            size: layout.size,
            text,
            angle: layout.angle,
            ..Default::default()
        }
    }
}

impl Renderer<NetworkDatabase> for GojsRenderer {
    type Output = String;

    fn render(&self, database: &NetworkDatabase) -> Result<Self::Output> {
        let report = self.convert(database);
        self.serialize(&report.model)
    }

    fn name(&self) -> &'static str {
        "gojs"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }

    fn format(&self) -> &'static str {
        "json"
    }
}

/// GoJS key: the label, or the cell ID when the label is blank
fn element_key(element: &DiagramElement) -> &str {
    if element.label.trim().is_empty() {
        &element.id
    } else {
        &element.label
    }
}

fn lookup_key(keys: &HashMap<&str, &str>, id: &str) -> String {
    keys.get(id).copied().unwrap_or(id).to_string()
}

fn attach_shape(record: &mut NodeRecord, shape: &ShapeDefinition, compiled: &CompiledShape) {
    if compiled.has_geometry() {
        record.geometry_string = Some(compiled.path());
    }
    if !shape.connections.is_empty() {
        record.connections = Some(
            shape
                .connections
                .iter()
                .map(|port| PortRecord {
                    port_id: port.name.clone(),
                    x: port.x_text.clone(),
                    y: port.y_text.clone(),
                })
                .collect(),
        );
    }
    if !compiled.text.is_empty() {
        record.shape_text = Some(
            compiled
                .text
                .iter()
                .map(|text| ShapeTextRecord {
                    text: text.text.clone(),
                    x: format_number(text.x),
                    y: format_number(text.y),
                    font: text.font.clone(),
                    stroke: text.color.clone(),
                    angle: format_number(text.angle),
                    align: text.align.clone(),
                    valign: text.valign.clone(),
                })
                .collect(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Geometry, Wire};

    fn network() -> NetworkDatabase {
        let mut db = NetworkDatabase::new();
        db.add_node(DiagramElement::with_style(
            "n1",
            "1",
            ElementKind::Node,
            Geometry::new(100.0, 100.0, 40.0, 40.0),
            "ellipse;whiteSpace=wrap;",
        ))
        .unwrap();
        db.add_node(DiagramElement::with_style(
            "r1",
            "R1",
            ElementKind::Link,
            Geometry::new(200.0, 110.0, 100.0, 20.0),
            "shape=mxgraph.electrical.resistors.resistor_2;",
        ))
        .unwrap();
        db.add_node(DiagramElement::new(
            "g",
            "GND",
            ElementKind::Ground,
            Geometry::new(0.0, 0.0, 40.0, 30.0),
        ))
        .unwrap();
        db.add_edge(Wire::with_style("w1", "0", "r1", "n1", "exitX=0;exitY=0.5;"))
            .unwrap();
        db.add_edge(Wire::with_style("w2", "1", "r1", "g", "exitX=1;exitY=0.5;"))
            .unwrap();
        db
    }

    #[test]
    fn test_node_records() {
        let report = GojsRenderer::new().convert(&network());
        let model = &report.model;
        assert_eq!(model.node_data_array.len(), 3);

        let node = model.node("1").unwrap();
        assert_eq!(node.category, "Node");
        assert_eq!(node.text, "Node1");
        assert_eq!(node.pos, "120 120");

        let link = model.node("R1").unwrap();
        assert_eq!(link.category, "Link");
        assert_eq!(link.pos, "250 120");
        assert_eq!(link.size, "100 20");
        assert!(link.geometry_string.as_deref().unwrap().starts_with("M0 10 L18 10 "));
        let ports: Vec<_> = link
            .connections
            .as_ref()
            .unwrap()
            .iter()
            .map(|p| p.port_id.as_str())
            .collect();
        assert_eq!(ports, vec!["in", "out"]);
    }

    #[test]
    fn test_link_records() {
        let report = GojsRenderer::new().convert(&network());
        let links = &report.model.link_data_array;
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].from, "R1");
        assert_eq!(links[0].from_port, "in");
        assert_eq!(links[0].to, "1");
        assert_eq!(links[0].to_port, "0");
        assert_eq!(links[1].to, "GND");
        assert_eq!(links[1].to_port, "N");
        assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    }

    #[test]
    fn test_unresolved_link_shape_is_reported() {
        let mut db = network();
        db.add_node(DiagramElement::with_style(
            "v1",
            "V1",
            ElementKind::Link,
            Geometry::default(),
            "shape=mxgraph.unknown.thing",
        ))
        .unwrap();
        let report = GojsRenderer::new().convert(&db);
        assert!(report.has_shape_failures());
        let record = report.model.node("V1").unwrap();
        assert!(record.geometry_string.is_none());
        assert!(record.connections.is_none());
    }

    #[test]
    fn test_dangling_and_fallback_warnings() {
        let mut db = network();
        db.add_edge(Wire::new("w3", "2", "r1", "nowhere")).unwrap();
        db.add_edge(Wire::with_style("w4", "2", "r1", "n1", "exitX=0.5;exitY=0"))
            .unwrap();
        let report = GojsRenderer::new().convert(&db);
        assert_eq!(report.model.link_data_array.len(), 3);
        assert!(report.warnings.contains(&ConversionWarning::DanglingWire {
            wire: "w3".to_string(),
            endpoint: "nowhere".to_string()
        }));
        assert!(report.warnings.contains(&ConversionWarning::PortFallback {
            wire: "w4".to_string(),
            element: "r1".to_string()
        }));
    }

    #[test]
    fn test_skipped_elements_are_reported() {
        let mut db = network();
        db.skip_element("bad", "Document parse error: mxGeometry attribute 'x' is not a number: 'ten'");
        let report = GojsRenderer::new().convert(&db);
        assert_eq!(report.model.node_data_array.len(), 3);
        assert!(report.has_skipped_elements());
        assert!(!report.has_shape_failures());
        assert_eq!(
            report.warnings[0].to_string(),
            "element 'bad': skipped: Document parse error: mxGeometry attribute 'x' is not a number: 'ten'"
        );
    }

    #[test]
    fn test_wire_label_limit() {
        let mut db = network();
        db.add_edge(Wire::with_style("w3", "2", "r1", "n1", "exitX=0;exitY=0.5;"))
            .unwrap();

        let all = GojsRenderer::new().convert(&db);
        assert_eq!(all.model.link_data_array.len(), 3);

        let limited = GojsRenderer::with_config(RenderConfig::default().with_max_wire_label(Some(1.0)))
            .convert(&db);
        let labels: Vec<_> = limited
            .model
            .link_data_array
            .iter()
            .map(|l| l.label.as_str())
            .collect();
        assert_eq!(labels, vec!["0", "1"]);
        assert!(limited.warnings.is_empty());
    }

    #[test]
    fn test_render_strips_non_ascii() {
        let mut db = NetworkDatabase::new();
        db.add_node(DiagramElement::new(
            "n",
            "Tänk",
            ElementKind::Node,
            Geometry::default(),
        ))
        .unwrap();
        let json = GojsRenderer::new().render(&db).unwrap();
        assert!(json.is_ascii());
        assert!(json.contains("\"NodeTnk\""));

        let keep = GojsRenderer::with_config(RenderConfig::default().with_ascii_only(false));
        assert!(keep.render(&db).unwrap().contains("Tänk"));
    }

    #[test]
    fn test_compact_output() {
        let renderer = GojsRenderer::with_config(RenderConfig::new(false));
        let json = renderer.render(&NetworkDatabase::new()).unwrap();
        assert_eq!(
            json,
            r#"{"class":"go.GraphLinksModel","linkFromPortIdProperty":"fromPort","linkToPortIdProperty":"toPort","nodeDataArray":[],"linkDataArray":[]}"#
        );
    }
}

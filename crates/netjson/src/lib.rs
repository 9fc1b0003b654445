//! netjson - Convert GUNNS drawio network diagrams to GoJS layout JSON
//!
//! Reads a drawio document describing a GUNNS network (nodes, links,
//! spotters, ground and reference nodes, and the wires between them) and
//! produces the `go.GraphLinksModel` document consumed by the network
//! display.
//!
//! # Quick Start
//!
//! ```rust
//! let drawio = r#"<mxGraphModel><root>
//!   <object label="1" gunns="node" id="n1">
//!     <mxCell style="ellipse;" vertex="1"><mxGeometry x="100" y="100" width="40" height="40" as="geometry"/></mxCell>
//!   </object>
//! </root></mxGraphModel>"#;
//!
//! let json = netjson::convert(drawio).unwrap();
//! assert!(json.contains("\"pos\": \"120 120\""));
//! ```
//!
//! # Advanced Usage
//!
//! For more control, use the individual components:
//!
//! ```rust
//! use netjson::prelude::*;
//!
//! let input = r#"<mxGraphModel><root>
//!   <object label="R1" gunns="link" id="r1">
//!     <mxCell style="shape=mxgraph.electrical.resistors.resistor_2;" vertex="1">
//!       <mxGeometry x="0" y="0" width="100" height="20" as="geometry"/>
//!     </mxCell>
//!   </object>
//! </root></mxGraphModel>"#;
//!
//! // Parse into a database
//! let parser = DrawioParser::new();
//! let mut database = NetworkDatabase::new();
//! parser.parse(input, &mut database).unwrap();
//! assert_eq!(database.node_count(), 1);
//!
//! // Build the layout model and inspect warnings
//! let renderer = GojsRenderer::new();
//! let report = renderer.convert(&database);
//! assert!(report.warnings.is_empty());
//! let resistor = report.model.node("R1").unwrap();
//! assert!(resistor.geometry_string.as_deref().unwrap().starts_with("M0 10 L18 10 "));
//! ```

pub mod core;
pub mod plugins;
pub mod shapes;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use crate::core::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        Database, DiagramElement, ElementKind, Geometry, NetjsonError, NetjsonResult, Parser,
        RenderConfig, Renderer, Wire,
    };
    pub use crate::plugins::drawio::{DrawioParser, NetworkDatabase};
    pub use crate::plugins::gojs::{
        ConversionReport, ConversionWarning, GojsRenderer, GraphLinksModel, LayoutMapper,
    };
    pub use crate::plugins::orchestrator::Orchestrator;
    pub use crate::shapes::{compile, resolve_shape, CompiledShape, ShapeDefinition};
}

/// Convert a drawio document to pretty-printed GoJS layout JSON
///
/// Elements whose shapes cannot be resolved and wires whose anchors match
/// no port are still rendered; the problems are logged as warnings.
///
/// # Example
/// ```rust
/// let json = netjson::convert("<mxGraphModel><root/></mxGraphModel>").unwrap();
/// assert!(json.contains("go.GraphLinksModel"));
/// ```
pub fn convert(input: &str) -> anyhow::Result<String> {
    convert_with_config(input, RenderConfig::default())
}

/// Convert a drawio document with explicit render options
///
/// # Example
/// ```rust
/// use netjson::{convert_with_config, RenderConfig};
///
/// let json = convert_with_config(
///     "<mxGraphModel><root/></mxGraphModel>",
///     RenderConfig::new(false),
/// )
/// .unwrap();
/// assert!(!json.contains('\n'));
/// ```
pub fn convert_with_config(input: &str, config: RenderConfig) -> anyhow::Result<String> {
    use crate::plugins::orchestrator::Orchestrator;

    Orchestrator::with_config(config).process(input)
}

/// Parse a drawio document into a database without rendering
///
/// # Example
/// ```rust
/// use netjson::prelude::Database;
///
/// let db = netjson::parse("<mxGraphModel><root/></mxGraphModel>").unwrap();
/// assert_eq!(db.node_count(), 0);
/// ```
pub fn parse(input: &str) -> anyhow::Result<plugins::drawio::NetworkDatabase> {
    use crate::plugins::orchestrator::Orchestrator;

    Orchestrator::new().parse(input)
}

/// Resolve a style descriptor and compile its shape
///
/// # Example
/// ```rust
/// let compiled = netjson::compile_style("ellipse;whiteSpace=wrap;").unwrap();
/// assert_eq!(compiled.path().matches('A').count(), 4);
/// ```
pub fn compile_style(style: &str) -> NetjsonResult<shapes::CompiledShape> {
    let shape = shapes::resolve_shape(style)?;
    Ok(shapes::compile(&shape))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_empty_model() {
        let json = convert("<mxGraphModel><root/></mxGraphModel>").unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["nodeDataArray"].as_array().unwrap().len(), 0);
        assert_eq!(value["linkDataArray"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_convert_rejects_non_drawio() {
        assert!(convert("graph LR; A-->B").is_err());
    }

    #[test]
    fn test_compile_style_unknown() {
        let err = compile_style("shape=mxgraph.nothing.here").unwrap_err();
        assert!(matches!(err, NetjsonError::ShapeNotFound { .. }));
    }

    #[test]
    fn test_compile_style_catalog() {
        let compiled = compile_style("shape=mxgraph.electrical.capacitors.capacitor_1").unwrap();
        assert_eq!(compiled.path().matches('M').count(), 4);
    }
}

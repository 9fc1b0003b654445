//! Public API tests

use netjson::prelude::*;
use netjson::shapes::{builtin, ShapeName, ShapeResolver};

const NETWORK: &str = r#"<mxGraphModel><root>
  <mxCell id="0"/><mxCell id="1" parent="0"/>
  <object label="1" gunns="node" id="n1">
    <mxCell style="ellipse;whiteSpace=wrap;html=1;" vertex="1" parent="1">
      <mxGeometry x="100" y="100" width="40" height="40" as="geometry"/>
    </mxCell>
  </object>
  <object label="R1" gunns="link" id="r1">
    <mxCell style="shape=mxgraph.electrical.resistors.resistor_2;direction=south;" vertex="1" parent="1">
      <mxGeometry x="200" y="60" width="20" height="100" as="geometry"/>
    </mxCell>
  </object>
  <object label="0" gunns="port" id="w1">
    <mxCell style="edgeStyle=orthogonalEdgeStyle;exitX=0;exitY=0.5;exitDx=0;exitDy=0;" edge="1" parent="1" source="r1" target="n1">
      <mxGeometry relative="1" as="geometry"/>
    </mxCell>
  </object>
</root></mxGraphModel>"#;

#[test]
fn test_parse_function() {
    let db = netjson::parse(NETWORK).unwrap();
    assert_eq!(db.node_count(), 2);
    assert_eq!(db.edge_count(), 1);
    assert_eq!(db.get_node("r1").unwrap().kind, ElementKind::Link);
}

#[test]
fn test_convert_function_is_valid_json() {
    let json = netjson::convert(NETWORK).unwrap();
    let model: GraphLinksModel = serde_json::from_str(&json).unwrap();
    assert_eq!(model.class, "go.GraphLinksModel");
    assert_eq!(model.node_data_array.len(), 2);
    assert_eq!(model.link_data_array.len(), 1);
}

#[test]
fn test_direction_rotates_link() {
    let db = netjson::parse(NETWORK).unwrap();
    let report = GojsRenderer::new().convert(&db);
    let resistor = report.model.node("R1").unwrap();
    assert_eq!(resistor.angle, "90");
    assert_eq!(resistor.size, "100 20");
    assert_eq!(resistor.pos, "210 110");
}

#[test]
fn test_parser_and_renderer_metadata() {
    let parser = DrawioParser::new();
    assert_eq!(parser.name(), "drawio");
    assert!(parser.can_parse(NETWORK));

    let renderer = GojsRenderer::new();
    assert_eq!(Renderer::<NetworkDatabase>::name(&renderer), "gojs");
    assert_eq!(Renderer::<NetworkDatabase>::format(&renderer), "json");
}

#[test]
fn test_compile_style_matches_catalog() {
    let from_style = netjson::compile_style("shape=valve").unwrap();
    let from_catalog = compile(&builtin(ShapeName::Valve).unwrap());
    assert_eq!(from_style, from_catalog);
    assert_eq!(from_style.path().matches("F ").count(), 2);
}

#[test]
fn test_private_resolver_has_own_cache() {
    let resolver = ShapeResolver::new();
    assert_eq!(resolver.cached_stencils(), 0);
    assert_eq!(resolver.resolve("shape=ground").unwrap().name, "ground");
    assert_eq!(resolver.cached_stencils(), 0);
}

#[test]
fn test_orchestrator_report() {
    let output = Orchestrator::new().process_with_report(NETWORK).unwrap();
    assert!(output.report.warnings.is_empty());
    let link = &output.report.model.link_data_array[0];
    assert_eq!(
        (link.from.as_str(), link.from_port.as_str(), link.to.as_str(), link.to_port.as_str()),
        ("R1", "in", "1", "0")
    );
}

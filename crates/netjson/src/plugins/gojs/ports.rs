//! Wire endpoint to connection port resolution
//!
//! - Link/Spotter with a resolved shape: the wire's `exitX`/`exitY` (source
//!   end) or `entryX`/`entryY` (target end) must equal a declared constraint
//!   textually, otherwise the fallback port is used.
//! - Ground/Ref: always the configured anchor port.
//! - Node: the wire label, which carries the link's port number.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{trace, warn};

use crate::core::{
    Database, DiagramElement, NetjsonError, NetjsonResult, RenderConfig, Style, Wire,
};
use crate::plugins::drawio::NetworkDatabase;
use crate::shapes::ShapeDefinition;

/// Which end of a wire an element sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireEnd {
    Source,
    Target,
}

impl WireEnd {
    /// Style keys holding the anchor offset on the element's boundary
    pub fn anchor_keys(&self) -> (&'static str, &'static str) {
        match self {
            WireEnd::Source => ("exitX", "exitY"),
            WireEnd::Target => ("entryX", "entryY"),
        }
    }
}

/// Port chosen for one end of a wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPort {
    pub name: String,
    /// No declared port matched the anchor
    pub fallback: bool,
}

/// Ports for both ends of a wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortBinding {
    /// The source end is the shaped element
    pub endpoint_is_source: bool,
    pub from: ResolvedPort,
    pub to: ResolvedPort,
}

/// Resolves wire endpoints against resolved element shapes
pub struct PortResolver<'a> {
    database: &'a NetworkDatabase,
    shapes: &'a HashMap<String, Arc<ShapeDefinition>>,
    config: &'a RenderConfig,
}

impl<'a> PortResolver<'a> {
    /// `shapes` maps element IDs to their resolved shape
    pub fn new(
        database: &'a NetworkDatabase,
        shapes: &'a HashMap<String, Arc<ShapeDefinition>>,
        config: &'a RenderConfig,
    ) -> Self {
        Self {
            database,
            shapes,
            config,
        }
    }

    pub fn resolve(&self, wire: &Wire) -> NetjsonResult<PortBinding> {
        let source = self
            .database
            .get_node(&wire.source)
            .ok_or_else(|| NetjsonError::dangling_wire(&wire.id, &wire.source))?;
        let target = self
            .database
            .get_node(&wire.target)
            .ok_or_else(|| NetjsonError::dangling_wire(&wire.id, &wire.target))?;

        let anchors = Style::parse(&wire.style).unwrap_or_else(|e| {
            warn!(wire_id = %wire.id, error = %e, "Unreadable wire style, anchors ignored");
            Style::default()
        });

        let binding = PortBinding {
            endpoint_is_source: source.kind.has_shape_ports(),
            from: self.side(source, wire, &anchors, WireEnd::Source),
            to: self.side(target, wire, &anchors, WireEnd::Target),
        };
        trace!(
            wire_id = %wire.id,
            from_port = %binding.from.name,
            to_port = %binding.to.name,
            "Resolved wire ports"
        );
        Ok(binding)
    }

    fn side(
        &self,
        element: &DiagramElement,
        wire: &Wire,
        anchors: &Style,
        end: WireEnd,
    ) -> ResolvedPort {
        if element.kind.is_anchor_only() {
            return self.port(&self.config.ground_port);
        }
        if !element.kind.has_shape_ports() {
            return self.port(&wire.label);
        }

        let (key_x, key_y) = end.anchor_keys();
        let matched = self.shapes.get(&element.id).and_then(|shape| {
            let x = anchors.get(key_x)?;
            let y = anchors.get(key_y)?;
            shape.port_at(x, y)
        });

        match matched {
            Some(port) => self.port(&port.name),
            None => {
                warn!(
                    wire_id = %wire.id,
                    element_id = %element.id,
                    anchor_x = anchors.get(key_x).unwrap_or("-"),
                    anchor_y = anchors.get(key_y).unwrap_or("-"),
                    fallback = %self.config.fallback_port,
                    "No connection port matches wire anchor"
                );
                ResolvedPort {
                    name: self.config.fallback_port.clone(),
                    fallback: true,
                }
            }
        }
    }

    fn port(&self, name: &str) -> ResolvedPort {
        ResolvedPort {
            name: name.to_string(),
            fallback: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ElementKind, Geometry};
    use crate::shapes::{builtin, ShapeName};

    struct Fixture {
        db: NetworkDatabase,
        shapes: HashMap<String, Arc<ShapeDefinition>>,
        config: RenderConfig,
    }

    fn fixture() -> Fixture {
        let mut db = NetworkDatabase::new();
        let geometry = Geometry::new(0.0, 0.0, 10.0, 10.0);
        db.add_node(DiagramElement::new("n1", "1", ElementKind::Node, geometry))
            .unwrap();
        db.add_node(DiagramElement::new("r1", "R1", ElementKind::Link, geometry))
            .unwrap();
        db.add_node(DiagramElement::new("r2", "R2", ElementKind::Link, geometry))
            .unwrap();
        db.add_node(DiagramElement::new("g", "GND", ElementKind::Ground, geometry))
            .unwrap();
        db.add_node(DiagramElement::new("x", "X", ElementKind::Link, geometry))
            .unwrap();

        let mut shapes = HashMap::new();
        let resistor = builtin(ShapeName::Resistor2).unwrap();
        shapes.insert("r1".to_string(), Arc::clone(&resistor));
        shapes.insert("r2".to_string(), resistor);

        Fixture {
            db,
            shapes,
            config: RenderConfig::default(),
        }
    }

    #[test]
    fn test_exact_exit_match() {
        let f = fixture();
        let resolver = PortResolver::new(&f.db, &f.shapes, &f.config);
        let wire = Wire::with_style("w", "0", "r1", "n1", "exitX=1;exitY=0.5;exitDx=0;exitDy=0;");
        let binding = resolver.resolve(&wire).unwrap();
        assert!(binding.endpoint_is_source);
        assert_eq!(binding.from.name, "out");
        assert!(!binding.from.fallback);
        assert_eq!(binding.to.name, "0");
    }

    #[test]
    fn test_unmatched_anchor_falls_back() {
        let f = fixture();
        let resolver = PortResolver::new(&f.db, &f.shapes, &f.config);
        let wire = Wire::with_style("w", "3", "r1", "n1", "exitX=0.25;exitY=0;");
        let binding = resolver.resolve(&wire).unwrap();
        assert_eq!(binding.from.name, "0");
        assert!(binding.from.fallback);
        assert_eq!(binding.to.name, "3");
    }

    #[test]
    fn test_target_uses_entry_anchor() {
        let f = fixture();
        let resolver = PortResolver::new(&f.db, &f.shapes, &f.config);
        let wire = Wire::with_style("w", "1", "n1", "r1", "exitX=1;exitY=0.5;entryX=0;entryY=0.5;");
        let binding = resolver.resolve(&wire).unwrap();
        assert!(!binding.endpoint_is_source);
        assert_eq!(binding.from.name, "1");
        assert_eq!(binding.to.name, "in");
    }

    #[test]
    fn test_two_shaped_ends() {
        let f = fixture();
        let resolver = PortResolver::new(&f.db, &f.shapes, &f.config);
        let wire = Wire::with_style("w", "", "r1", "r2", "exitX=1;exitY=0.5;entryX=0;entryY=0.5");
        let binding = resolver.resolve(&wire).unwrap();
        assert_eq!(binding.from.name, "out");
        assert_eq!(binding.to.name, "in");
    }

    #[test]
    fn test_ground_bypasses_lookup() {
        let f = fixture();
        let resolver = PortResolver::new(&f.db, &f.shapes, &f.config);
        let wire = Wire::with_style("w", "1", "r1", "g", "exitX=0;exitY=0.5;entryX=0.3;entryY=0.9");
        let binding = resolver.resolve(&wire).unwrap();
        assert_eq!(binding.from.name, "in");
        assert_eq!(binding.to.name, "N");
        assert!(!binding.to.fallback);
    }

    #[test]
    fn test_link_without_shape_falls_back() {
        let f = fixture();
        let resolver = PortResolver::new(&f.db, &f.shapes, &f.config);
        let wire = Wire::with_style("w", "0", "x", "n1", "exitX=1;exitY=0.5");
        let binding = resolver.resolve(&wire).unwrap();
        assert_eq!(binding.from.name, "0");
        assert!(binding.from.fallback);
    }

    #[test]
    fn test_dangling_wire() {
        let f = fixture();
        let resolver = PortResolver::new(&f.db, &f.shapes, &f.config);
        let err = resolver.resolve(&Wire::new("w9", "0", "r1", "missing")).unwrap_err();
        assert!(matches!(
            err,
            NetjsonError::DanglingWire { ref wire, ref endpoint } if wire == "w9" && endpoint == "missing"
        ));
    }
}

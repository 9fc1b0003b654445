//! Network database
//!
//! Holds the network elements and wires read from a drawio document, in
//! document order.

use anyhow::Result;
use std::collections::HashMap;
use tracing::{debug, trace};

use crate::core::{Database, DiagramElement, ElementKind, NetjsonError, Wire};

/// Ordered store of network elements and wires
#[derive(Debug, Default, Clone)]
pub struct NetworkDatabase {
    /// Elements in document order
    elements: Vec<DiagramElement>,
    /// Element ID to position in `elements`
    index: HashMap<String, usize>,
    /// Wires in document order
    wires: Vec<Wire>,
    /// Elements left out while reading, with the reason
    skipped: Vec<(String, String)>,
}

impl NetworkDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_element(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Record an element that could not be read
    pub fn skip_element(&mut self, id: impl Into<String>, reason: impl Into<String>) {
        self.skipped.push((id.into(), reason.into()));
    }

    /// Skipped element IDs and reasons, in document order
    pub fn skipped(&self) -> &[(String, String)] {
        &self.skipped
    }

    /// Count of elements per kind
    pub fn kind_counts(&self) -> HashMap<ElementKind, usize> {
        let mut counts = HashMap::new();
        for element in &self.elements {
            *counts.entry(element.kind).or_insert(0) += 1;
        }
        counts
    }
}

impl Database for NetworkDatabase {
    type Node = DiagramElement;
    type Edge = Wire;

    fn add_node(&mut self, node: DiagramElement) -> Result<()> {
        trace!(
            element_id = %node.id,
            label = %node.label,
            kind = %node.kind,
            "Adding element to database"
        );
        if self.index.contains_key(&node.id) {
            return Err(NetjsonError::database_error(format!(
                "duplicate element id '{}'",
                node.id
            ))
            .into());
        }
        self.index.insert(node.id.clone(), self.elements.len());
        self.elements.push(node);
        debug!(element_count = self.elements.len(), "Element added");
        Ok(())
    }

    fn add_edge(&mut self, edge: Wire) -> Result<()> {
        trace!(
            wire_id = %edge.id,
            source = %edge.source,
            target = %edge.target,
            label = %edge.label,
            "Adding wire to database"
        );
        self.wires.push(edge);
        Ok(())
    }

    fn get_node(&self, id: &str) -> Option<&DiagramElement> {
        self.index.get(id).and_then(|&i| self.elements.get(i))
    }

    fn nodes(&self) -> impl Iterator<Item = &DiagramElement> {
        self.elements.iter()
    }

    fn edges(&self) -> impl Iterator<Item = &Wire> {
        self.wires.iter()
    }

    fn clear(&mut self) {
        self.elements.clear();
        self.index.clear();
        self.wires.clear();
        self.skipped.clear();
    }

    fn node_count(&self) -> usize {
        self.elements.len()
    }

    fn edge_count(&self) -> usize {
        self.wires.len()
    }
}

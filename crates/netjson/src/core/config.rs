//! Render configuration

/// Options controlling how the GoJS layout document is produced
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Pretty-print the JSON document
    pub pretty: bool,
    /// Port assigned to ground and reference nodes
    pub ground_port: String,
    /// Port used when a wire anchor matches no declared connection
    pub fallback_port: String,
    /// Strip non-ASCII characters from the rendered document
    pub ascii_only: bool,
    /// Drop wires whose numeric label is above this value
    pub max_wire_label: Option<f64>,
}

impl RenderConfig {
    pub fn new(pretty: bool) -> Self {
        Self {
            pretty,
            ..Self::default()
        }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_ground_port(mut self, port: impl Into<String>) -> Self {
        self.ground_port = port.into();
        self
    }

    pub fn with_fallback_port(mut self, port: impl Into<String>) -> Self {
        self.fallback_port = port.into();
        self
    }

    pub fn with_ascii_only(mut self, ascii_only: bool) -> Self {
        self.ascii_only = ascii_only;
        self
    }

    pub fn with_max_wire_label(mut self, limit: Option<f64>) -> Self {
        self.max_wire_label = limit;
        self
    }

    /// Returns true if a wire with this label is left out of the model.
    /// Labels that are not numbers are always kept.
    pub fn drops_wire(&self, label: &str) -> bool {
        match (self.max_wire_label, label.trim().parse::<f64>()) {
            (Some(limit), Ok(value)) => value > limit,
            _ => false,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            ground_port: "N".to_string(),
            fallback_port: "0".to_string(),
            ascii_only: true,
            max_wire_label: None,
        }
    }
}

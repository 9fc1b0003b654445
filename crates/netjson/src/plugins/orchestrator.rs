//! Conversion pipeline
//!
//! Runs the drawio parser and the GoJS renderer in sequence:
//! document → [`NetworkDatabase`] → [`GraphLinksModel`](crate::plugins::gojs::GraphLinksModel) → JSON

use anyhow::{Context, Result};
use tracing::{debug, info, span, warn, Level};

use crate::core::{Database, Parser, RenderConfig};
use crate::plugins::drawio::{DrawioParser, NetworkDatabase};
use crate::plugins::gojs::{ConversionReport, GojsRenderer};

/// Rendered document plus the report it was built from
#[derive(Debug, Clone)]
pub struct ConversionOutput {
    pub json: String,
    pub report: ConversionReport,
}

/// Coordinates parsing and rendering
#[derive(Debug, Clone, Default)]
pub struct Orchestrator {
    parser: DrawioParser,
    renderer: GojsRenderer,
}

impl Orchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RenderConfig) -> Self {
        Self {
            parser: DrawioParser::new(),
            renderer: GojsRenderer::with_config(config),
        }
    }

    pub fn config(&self) -> &RenderConfig {
        self.renderer.config()
    }

    /// Parse a drawio document
    pub fn parse(&self, input: &str) -> Result<NetworkDatabase> {
        let parse_span = span!(Level::DEBUG, "pipeline_parse");
        let _enter = parse_span.enter();

        if !self.parser.can_parse(input) {
            warn!("Input does not look like a drawio document");
        }

        let mut database = NetworkDatabase::new();
        self.parser
            .parse(input, &mut database)
            .context("Failed to read drawio document")?;
        debug!(
            element_count = database.node_count(),
            wire_count = database.edge_count(),
            "Parsing completed"
        );
        Ok(database)
    }

    /// Convert a drawio document to GoJS layout JSON
    pub fn process(&self, input: &str) -> Result<String> {
        Ok(self.process_with_report(input)?.json)
    }

    /// Convert and keep the conversion warnings
    pub fn process_with_report(&self, input: &str) -> Result<ConversionOutput> {
        let process_span = span!(Level::INFO, "process_network", input_len = input.len());
        let _enter = process_span.enter();

        info!("Starting network conversion pipeline");

        let database = self.parse(input)?;
        let output = self.render(&database)?;

        if output.report.warnings.is_empty() {
            info!("Pipeline completed successfully");
        } else {
            info!(
                warning_count = output.report.warnings.len(),
                "Pipeline completed with warnings"
            );
        }

        Ok(output)
    }

    /// Render an already parsed network
    pub fn render(&self, database: &NetworkDatabase) -> Result<ConversionOutput> {
        let render_span = span!(Level::DEBUG, "pipeline_render");
        let _enter = render_span.enter();

        let report = self.renderer.convert(database);
        let json = self.renderer.serialize(&report.model)?;
        debug!(output_len = json.len(), "Rendering completed");
        Ok(ConversionOutput { json, report })
    }
}

//! Command-line interface for the netjson utility
//!
//! Converts drawio network diagrams to GoJS layout JSON and inspects the
//! built-in shape catalog.

use anyhow::{anyhow, Context, Result};
use clap::{ArgGroup, Parser, Subcommand};
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing::{debug, info};

use netjson::core::logging::init_logging;
use netjson::plugins::Orchestrator;
use netjson::shapes::{compile, parse_shape, resolve_shape, CompiledShape, ShapeDefinition, ShapeName};
use netjson::{ElementKind, RenderConfig};

/// Summary order for `validate`
const KINDS: [ElementKind; 5] = [
    ElementKind::Node,
    ElementKind::Link,
    ElementKind::Spotter,
    ElementKind::Ground,
    ElementKind::Ref,
];

/// netjson - Convert GUNNS drawio network diagrams to GoJS layout JSON
#[derive(Parser)]
#[command(name = "netjson")]
#[command(about = "Convert GUNNS drawio network diagrams to GoJS layout JSON")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error); defaults to NETJSON_LOG_LEVEL, RUST_LOG, then info
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Set log format (compact|pretty|json); defaults to NETJSON_LOG_FORMAT, then compact
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,
}

/// Log level options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a drawio network diagram to GoJS layout JSON
    Convert {
        /// Input drawio file (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output JSON file (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write single-line JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,

        /// Keep non-ASCII characters in labels
        #[arg(long)]
        keep_unicode: bool,

        /// Leave out wires whose numeric label is above this value
        #[arg(long, value_name = "LIMIT")]
        max_wire_label: Option<f64>,
    },

    /// Compile one shape and print its geometry string, text and ports
    #[command(group(ArgGroup::new("source").required(true).args(["style", "name", "markup"])))]
    Compile {
        /// drawio style descriptor, e.g. "shape=mxgraph.electrical.resistors.resistor_2"
        #[arg(long)]
        style: Option<String>,

        /// Built-in catalog shape name
        #[arg(long)]
        name: Option<String>,

        /// File containing stencil markup
        #[arg(long)]
        markup: Option<PathBuf>,

        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },

    /// List the built-in shape catalog
    Shapes {
        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Check that every link shape resolves and every wire finds its port
    Validate {
        /// Input drawio file (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

/// Main CLI application
#[derive(Default)]
pub struct NetjsonApp {
    config: RenderConfig,
}

impl NetjsonApp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Run the application; returns the process exit code
    pub fn run(&self, cli: Cli) -> Result<i32> {
        if let Err(e) = init_logging(
            cli.log_level.map(|l| l.as_str()),
            cli.log_format.map(|f| f.as_str()),
        ) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("netjson v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Convert {
                input,
                output,
                compact,
                keep_unicode,
                max_wire_label,
            } => {
                let config = self
                    .config
                    .clone()
                    .with_pretty(!compact)
                    .with_ascii_only(!keep_unicode)
                    .with_max_wire_label(max_wire_label);
                self.convert_command(input, output, config, cli.verbose)?;
                Ok(0)
            }
            Commands::Compile {
                style,
                name,
                markup,
                json,
            } => {
                let shape = self.load_shape(style, name, markup)?;
                self.compile_command(&shape, json)?;
                Ok(0)
            }
            Commands::Shapes { json } => {
                self.shapes_command(json)?;
                Ok(0)
            }
            Commands::Validate { input } => self.validate_command(input, cli.verbose),
        }
    }

    fn convert_command(
        &self,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        config: RenderConfig,
        verbose: bool,
    ) -> Result<()> {
        let content = self.read_input(input)?;

        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        let result = Orchestrator::with_config(config).process_with_report(&content)?;
        debug!(
            output_len = result.json.len(),
            warning_count = result.report.warnings.len(),
            "Conversion finished"
        );

        if verbose {
            eprintln!(
                "Converted {} elements and {} wires ({} warnings)",
                result.report.model.node_data_array.len(),
                result.report.model.link_data_array.len(),
                result.report.warnings.len()
            );
        }

        self.write_output(output, &result.json)
    }

    fn load_shape(
        &self,
        style: Option<String>,
        name: Option<String>,
        markup: Option<PathBuf>,
    ) -> Result<std::sync::Arc<ShapeDefinition>> {
        if let Some(style) = style {
            return Ok(resolve_shape(&style)?);
        }
        if let Some(name) = name {
            let shape_name = ShapeName::from_name(&name)
                .ok_or_else(|| anyhow!("Unknown built-in shape '{}' (see `netjson shapes`)", name))?;
            return netjson::shapes::builtin(shape_name)
                .ok_or_else(|| anyhow!("Built-in shape '{}' is unavailable", name));
        }
        if let Some(path) = markup {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read markup file '{}'", path.display()))?;
            return Ok(std::sync::Arc::new(parse_shape(&text)?));
        }
        Err(anyhow!("One of --style, --name or --markup is required"))
    }

    fn compile_command(&self, shape: &ShapeDefinition, json: bool) -> Result<()> {
        let compiled = compile(shape);
        println!("{}", format_compiled(shape, &compiled, json)?);
        Ok(())
    }

    fn shapes_command(&self, json: bool) -> Result<()> {
        if json {
            let shapes: Vec<_> = ShapeName::all()
                .iter()
                .map(|name| {
                    serde_json::json!({
                        "name": name.as_str(),
                        "description": name.description(),
                        "ports": netjson::shapes::builtin(*name)
                            .map(|s| s.port_names().iter().map(|p| p.to_string()).collect::<Vec<_>>())
                            .unwrap_or_default(),
                    })
                })
                .collect();
            let listing = serde_json::json!({
                "shapes": shapes,
                "total": ShapeName::all().len(),
            });
            println!("{}", serde_json::to_string_pretty(&listing)?);
        } else {
            println!("Built-in shapes:");
            for name in ShapeName::all() {
                println!("  {:<16} - {}", name.as_str(), name.description());
            }
            println!();
            println!("Total: {} shapes", ShapeName::all().len());
        }
        Ok(())
    }

    /// Exit code 2 when a link or spotter shape does not resolve
    fn validate_command(&self, input: Option<PathBuf>, verbose: bool) -> Result<i32> {
        let content = self.read_input(input)?;

        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        let orchestrator = Orchestrator::with_config(self.config.clone());
        let database = orchestrator.parse(&content)?;
        let result = orchestrator.render(&database)?;
        let report = &result.report;

        for warning in &report.warnings {
            println!("warning: {}", warning);
        }

        let counts = database.kind_counts();
        let summary = KINDS
            .iter()
            .filter_map(|kind| counts.get(kind).map(|n| format!("{} {}", n, kind)))
            .collect::<Vec<_>>()
            .join(", ");

        if report.has_shape_failures() || report.has_skipped_elements() {
            println!("Invalid network diagram: unresolved shapes or unreadable elements");
            Ok(2)
        } else {
            println!(
                "Valid network diagram: {} ({} wires, {} warnings)",
                if summary.is_empty() { "no elements".to_string() } else { summary },
                report.model.link_data_array.len(),
                report.warnings.len()
            );
            Ok(0)
        }
    }

    /// Read input from file or stdin
    pub fn read_input(&self, input: Option<PathBuf>) -> Result<String> {
        match input {
            Some(path) if path.to_string_lossy() != "-" => fs::read_to_string(&path)
                .map_err(|e| anyhow!("Failed to read input file '{}': {}", path.display(), e)),
            _ => {
                let mut content = String::new();
                io::stdin().read_to_string(&mut content)?;
                Ok(content)
            }
        }
    }

    /// Write output to file or stdout
    pub fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        match output {
            Some(path) if path.to_string_lossy() != "-" => {
                fs::write(&path, content).map_err(|e| {
                    anyhow!("Failed to write output file '{}': {}", path.display(), e)
                })?;
                info!(path = %path.display(), bytes = content.len(), "Wrote output file");
            }
            _ => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(content.as_bytes())?;
                if !content.is_empty() && !content.ends_with('\n') {
                    stdout.write_all(b"\n")?;
                }
                stdout.flush()?;
            }
        }
        Ok(())
    }
}

fn format_compiled(shape: &ShapeDefinition, compiled: &CompiledShape, json: bool) -> Result<String> {
    if json {
        let value = serde_json::json!({
            "name": shape.name,
            "width": shape.width,
            "height": shape.height,
            "geometryString": compiled.path(),
            "ports": shape
                .connections
                .iter()
                .map(|p| serde_json::json!({"portId": p.name, "x": p.x_text, "y": p.y_text}))
                .collect::<Vec<_>>(),
            "text": compiled
                .text
                .iter()
                .map(|t| serde_json::json!({"text": t.text, "x": t.x, "y": t.y, "font": t.font}))
                .collect::<Vec<_>>(),
            "warnings": compiled.warnings.iter().map(|w| w.to_string()).collect::<Vec<_>>(),
        });
        return Ok(serde_json::to_string_pretty(&value)?);
    }

    let mut lines = vec![
        format!("shape: {} ({} x {})", shape.name, shape.width, shape.height),
        format!("geometry: {}", compiled.path().trim_end()),
    ];
    if !shape.connections.is_empty() {
        let ports: Vec<_> = shape
            .connections
            .iter()
            .map(|p| format!("{} ({}, {})", p.name, p.x_text, p.y_text))
            .collect();
        lines.push(format!("ports: {}", ports.join(", ")));
    }
    for text in &compiled.text {
        lines.push(format!(
            "text: {:?} at {} {} [{}]",
            text.text, text.x, text.y, text.font
        ));
    }
    for warning in &compiled.warnings {
        lines.push(format!("warning: {}", warning));
    }
    Ok(lines.join("\n"))
}

//! Core abstractions for network diagram conversion
//!
//! Shared types, the error type, style descriptor parsing, logging, and the
//! traits that connect a document parser to a renderer.

mod config;
mod database;
mod error;
pub mod logging;
mod parser;
mod renderer;
mod style;
mod types;

pub use config::*;
pub use database::*;
pub use error::*;
pub use logging::*;
pub use parser::*;
pub use renderer::*;
pub use style::*;
pub use types::*;

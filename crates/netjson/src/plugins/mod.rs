//! Pipeline plugins
//!
//! `drawio` reads network diagrams, `gojs` renders layout JSON, and the
//! orchestrator runs one after the other.

pub mod drawio;
pub mod gojs;
pub mod orchestrator;

pub use drawio::*;
pub use gojs::*;
pub use orchestrator::*;

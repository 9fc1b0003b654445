//! Core parser trait for diagram documents
//!
//! This trait defines the interface for reading a diagram document into
//! structured data stored in a database.

use anyhow::Result;

use super::Database;

/// Core trait for diagram parsers
///
/// # Example
/// ```
/// use netjson::core::{Database, Parser};
/// use netjson::plugins::drawio::{DrawioParser, NetworkDatabase};
///
/// let parser = DrawioParser::new();
/// let mut db = NetworkDatabase::new();
/// parser.parse("<mxGraphModel><root/></mxGraphModel>", &mut db).unwrap();
/// assert_eq!(db.node_count(), 0);
/// ```
pub trait Parser<D: Database>: Send + Sync {
    /// Parse a document into the provided database
    fn parse(&self, input: &str, database: &mut D) -> Result<()>;

    /// Get the name of this parser
    fn name(&self) -> &'static str;

    /// Get the version of this parser
    fn version(&self) -> &'static str;

    /// Check if the input looks like something this parser reads
    fn can_parse(&self, input: &str) -> bool;
}

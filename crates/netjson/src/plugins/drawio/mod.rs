//! drawio network document plugin
//!
//! Reads GUNNS network diagrams drawn in drawio into a [`NetworkDatabase`].

mod database;
mod parser;

pub use database::*;
pub use parser::*;

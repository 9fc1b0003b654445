//! drawio style descriptor parsing
//!
//! A style descriptor is a `;`-separated list of `key=value` pairs and bare
//! flags, e.g. `ellipse;whiteSpace=wrap;rotation=90;shape=stencil(...)`.
//! Values may contain `=` (base64 padding, data URIs); only the first `=` of
//! an entry separates key from value.

use chumsky::prelude::*;

use super::error::{NetjsonError, NetjsonResult};

/// A single entry of a style descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleEntry {
    /// Bare token such as `ellipse` or `html`
    Flag(String),
    /// `key=value` token
    Pair(String, String),
}

/// Parsed style descriptor, entries kept in source order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Style {
    entries: Vec<StyleEntry>,
}

impl Style {
    /// Parse a style descriptor string
    pub fn parse(input: &str) -> NetjsonResult<Self> {
        let parser = Self::style_parser().then_ignore(end());

        parser
            .parse(input)
            .into_result()
            .map(|entries| Self { entries })
            .map_err(|errors| {
                NetjsonError::style_parse(format!("'{}': {:?}", input, errors))
            })
    }

    fn style_parser<'src>() -> impl Parser<'src, &'src str, Vec<StyleEntry>> + Clone {
        let key = none_of("=;").repeated().at_least(1).collect::<String>();
        let value = none_of(';').repeated().collect::<String>();

        let entry = key
            .then(just('=').ignore_then(value).or_not())
            .map(|(key, value): (String, Option<String>)| {
                let key = key.trim().to_string();
                match value {
                    Some(value) => StyleEntry::Pair(key, value.trim().to_string()),
                    None => StyleEntry::Flag(key),
                }
            });

        // Empty entries (`a;;b`, trailing `;`) are allowed and dropped
        entry
            .or_not()
            .separated_by(just(';'))
            .collect::<Vec<_>>()
            .map(|entries| entries.into_iter().flatten().collect())
    }

    /// All entries in source order
    pub fn entries(&self) -> &[StyleEntry] {
        &self.entries
    }

    /// Value of the first `key=value` entry with this key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.iter().find_map(|entry| match entry {
            StyleEntry::Pair(k, v) if k == key => Some(v.as_str()),
            _ => None,
        })
    }

    /// Numeric value of a key, ignoring values that do not parse
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(|v| v.parse::<f64>().ok())
    }

    /// Returns true if the bare flag is present
    pub fn has_flag(&self, flag: &str) -> bool {
        self.entries
            .iter()
            .any(|entry| matches!(entry, StyleEntry::Flag(f) if f == flag))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pairs_and_flags() {
        let style = Style::parse("ellipse;whiteSpace=wrap;html=1;rotation=-45;").unwrap();
        assert!(style.has_flag("ellipse"));
        assert_eq!(style.get("whiteSpace"), Some("wrap"));
        assert_eq!(style.get_f64("rotation"), Some(-45.0));
        assert_eq!(style.entries().len(), 4);
    }

    #[test]
    fn test_value_keeps_equals_signs() {
        let style = Style::parse("shape=stencil(eJxLTEoGAAJNASc=);fillColor=#fff").unwrap();
        assert_eq!(style.get("shape"), Some("stencil(eJxLTEoGAAJNASc=)"));
        assert_eq!(style.get("fillColor"), Some("#fff"));
    }

    #[test]
    fn test_empty_entries_are_dropped() {
        let style = Style::parse("a=1;;b=2;").unwrap();
        assert_eq!(style.entries().len(), 2);
        assert!(Style::parse("").unwrap().is_empty());
    }

    #[test]
    fn test_first_key_wins() {
        let style = Style::parse("rotation=10;rotation=20").unwrap();
        assert_eq!(style.get_f64("rotation"), Some(10.0));
    }

    #[test]
    fn test_non_numeric_value() {
        let style = Style::parse("rotation=abc").unwrap();
        assert_eq!(style.get("rotation"), Some("abc"));
        assert_eq!(style.get_f64("rotation"), None);
    }

    #[test]
    fn test_missing_key_is_an_error() {
        let result = Style::parse("=orphan");
        assert!(result.is_err());
        let message = result.unwrap_err().to_string();
        assert!(message.contains("Style parse error"));
    }
}

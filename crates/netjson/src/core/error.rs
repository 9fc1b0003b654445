//! Core error types for network diagram conversion
//!
//! This module defines the error type shared by the shape resolver, the
//! geometry compiler, the drawio reader and the GoJS renderer.

use thiserror::Error;

/// Core error types for diagram conversion
#[derive(Error, Debug)]
pub enum NetjsonError {
    #[error("Shape not found for style: {style}")]
    ShapeNotFound { style: String },

    #[error("Stencil decode error: {message}")]
    StencilDecode { message: String },

    #[error("Shape markup error: {message}")]
    ShapeMarkup { message: String },

    #[error("Document parse error: {message}")]
    DocumentParse { message: String },

    #[error("Style parse error: {message}")]
    StyleParse { message: String },

    #[error("Database error: {message}")]
    DatabaseError { message: String },

    #[error("Wire '{wire}' references missing element '{endpoint}'")]
    DanglingWire { wire: String, endpoint: String },

    #[error("Render error: {message}")]
    RenderError { message: String },

    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl NetjsonError {
    /// Create a new shape-not-found error for the offending style string
    pub fn shape_not_found(style: impl Into<String>) -> Self {
        Self::ShapeNotFound {
            style: style.into(),
        }
    }

    /// Create a new stencil decode error
    pub fn stencil_decode(message: impl Into<String>) -> Self {
        Self::StencilDecode {
            message: message.into(),
        }
    }

    /// Create a new shape markup error
    pub fn shape_markup(message: impl Into<String>) -> Self {
        Self::ShapeMarkup {
            message: message.into(),
        }
    }

    /// Create a new document parse error
    pub fn document_parse(message: impl Into<String>) -> Self {
        Self::DocumentParse {
            message: message.into(),
        }
    }

    /// Create a new style parse error
    pub fn style_parse(message: impl Into<String>) -> Self {
        Self::StyleParse {
            message: message.into(),
        }
    }

    /// Create a new database error
    pub fn database_error(message: impl Into<String>) -> Self {
        Self::DatabaseError {
            message: message.into(),
        }
    }

    /// Create a new dangling wire error
    pub fn dangling_wire(wire: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self::DanglingWire {
            wire: wire.into(),
            endpoint: endpoint.into(),
        }
    }

    /// Create a new render error
    pub fn render_error(message: impl Into<String>) -> Self {
        Self::RenderError {
            message: message.into(),
        }
    }

    /// Returns true if this error means an element's shape could not be produced.
    ///
    /// The renderer treats all of these as skip-and-continue.
    pub fn is_shape_failure(&self) -> bool {
        matches!(
            self,
            Self::ShapeNotFound { .. }
                | Self::StencilDecode { .. }
                | Self::ShapeMarkup { .. }
                | Self::StyleParse { .. }
        )
    }
}

/// Result alias for library operations that fail with [`NetjsonError`]
pub type NetjsonResult<T> = std::result::Result<T, NetjsonError>;

//! Style descriptor to shape definition
//!
//! Resolution order:
//! 1. the bare `ellipse` flag selects the built-in ellipse
//! 2. `shape=stencil(<payload>)` is decoded and parsed (cached by payload hash)
//! 3. the last `.` segment of `shape=` is looked up in the built-in catalog

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use tracing::{debug, span, trace, Level};

use super::catalog::{builtin, ShapeName};
use super::markup::parse_shape;
use super::model::ShapeDefinition;
use super::stencil::{decompress, stencil_payload};
use crate::core::{NetjsonError, NetjsonResult, Style};

/// Resolves style descriptors to shapes, caching decoded stencils
#[derive(Debug, Default)]
pub struct ShapeResolver {
    stencils: Mutex<HashMap<u64, Arc<ShapeDefinition>>>,
}

impl ShapeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a style descriptor string
    pub fn resolve(&self, style: &str) -> NetjsonResult<Arc<ShapeDefinition>> {
        let span = span!(Level::TRACE, "resolve_shape", style_len = style.len());
        let _enter = span.enter();

        let parsed = Style::parse(style)?;
        self.resolve_style(&parsed)
            .map_err(|e| match e {
                NetjsonError::ShapeNotFound { .. } => NetjsonError::shape_not_found(style),
                other => other,
            })
    }

    /// Resolve an already parsed style
    pub fn resolve_style(&self, style: &Style) -> NetjsonResult<Arc<ShapeDefinition>> {
        if style.has_flag(ShapeName::Ellipse.as_str()) {
            trace!("Resolved ellipse flag");
            return self.builtin(ShapeName::Ellipse);
        }

        let Some(shape) = style.get("shape") else {
            return Err(NetjsonError::shape_not_found("no shape key"));
        };

        if let Some(payload) = stencil_payload(shape) {
            return self.stencil(payload);
        }

        let leaf = shape.rsplit('.').next().unwrap_or(shape);
        match ShapeName::from_name(leaf) {
            Some(name) => {
                trace!(shape = %name, "Resolved catalog shape");
                self.builtin(name)
            }
            None => Err(NetjsonError::shape_not_found(shape)),
        }
    }

    fn builtin(&self, name: ShapeName) -> NetjsonResult<Arc<ShapeDefinition>> {
        builtin(name).ok_or_else(|| {
            NetjsonError::shape_markup(format!("built-in shape '{}' is unavailable", name))
        })
    }

    fn stencil(&self, payload: &str) -> NetjsonResult<Arc<ShapeDefinition>> {
        let key = payload_hash(payload);

        if let Some(shape) = self.lock().get(&key) {
            trace!(key, "Stencil cache hit");
            return Ok(Arc::clone(shape));
        }

        let markup = decompress(payload)?;
        let shape = Arc::new(parse_shape(&markup)?);
        debug!(
            key,
            name = %shape.name,
            ports = shape.connections.len(),
            "Decoded stencil"
        );

        self.lock().insert(key, Arc::clone(&shape));
        Ok(shape)
    }

    /// Number of decoded stencils held in the cache
    pub fn cached_stencils(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<u64, Arc<ShapeDefinition>>> {
        self.stencils.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn payload_hash(payload: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    payload.trim().hash(&mut hasher);
    hasher.finish()
}

static RESOLVER: OnceLock<ShapeResolver> = OnceLock::new();

/// Process-wide resolver
pub fn shared_resolver() -> &'static ShapeResolver {
    RESOLVER.get_or_init(ShapeResolver::new)
}

/// Resolve a style descriptor with the process-wide resolver
pub fn resolve_shape(style: &str) -> NetjsonResult<Arc<ShapeDefinition>> {
    shared_resolver().resolve(style)
}

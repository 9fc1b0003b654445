//! Shape resolution and geometry compilation
//!
//! - [`resolve_shape`] turns a drawio style descriptor into a
//!   [`ShapeDefinition`], from the built-in catalog or an embedded stencil.
//! - [`compile`] flattens a shape's drawing programs into a GoJS geometry
//!   string plus text annotations.

mod catalog;
mod compiler;
mod markup;
mod model;
mod resolver;
pub mod stencil;

pub use catalog::*;
pub use compiler::*;
pub use markup::*;
pub use model::*;
pub use resolver::*;

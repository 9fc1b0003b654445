//! GoJS layout plugin
//!
//! Maps a [`NetworkDatabase`](crate::plugins::drawio::NetworkDatabase) onto
//! the `go.GraphLinksModel` JSON consumed by the network display.

mod layout;
mod model;
mod ports;
mod renderer;

pub use layout::*;
pub use model::*;
pub use ports::*;
pub use renderer::*;

//! Raster access module
//!
//! The pipeline never decodes images itself; it pulls per-band tile samples from
//! an injected `RasterSource`.

mod source;
mod in_memory;
pub mod types;

pub use source::RasterSource;
pub use in_memory::InMemoryRaster;
pub use types::{TileRegion, TileSamples, tile_grid};

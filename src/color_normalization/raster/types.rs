//! Tile geometry and sample types

use crate::color_normalization::common::{Band, NormalizationError, Result};

/// A rectangular pixel region of the source raster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRegion {
    /// Left pixel column
    pub x: usize,
    /// Top pixel row
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl TileRegion {
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }
}

/// Planar samples of one tile, one sequence per band
#[derive(Debug, Clone)]
pub struct TileSamples {
    pub region: TileRegion,
    pub red: Vec<f32>,
    pub green: Vec<f32>,
    pub blue: Vec<f32>,
}

impl TileSamples {
    pub fn band(&self, band: Band) -> &[f32] {
        match band {
            Band::Red => &self.red,
            Band::Green => &self.green,
            Band::Blue => &self.blue,
        }
    }
}

/// Lays out row-major tiles of `tile_size` over a `width` x `height` raster.
/// Edge tiles are clipped to the raster extent.
pub fn tile_grid(width: usize, height: usize, tile_size: usize) -> Result<Vec<TileRegion>> {
    if width == 0 || height == 0 {
        return Err(NormalizationError::InvalidDimensions(width, height));
    }
    if tile_size == 0 {
        return Err(NormalizationError::InvalidConfig("tile size must be positive".to_string()));
    }

    let regions = (0..height)
        .step_by(tile_size)
        .flat_map(|y| {
            (0..width).step_by(tile_size).map(move |x| TileRegion {
                x,
                y,
                width: tile_size.min(width - x),
                height: tile_size.min(height - y),
            })
        })
        .collect();

    Ok(regions)
}

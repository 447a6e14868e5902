use crate::color_normalization::common::{Band, Result};
use crate::color_normalization::histogram::{Histogram, build_histogram};
use crate::color_normalization::raster::TileSamples;
use crate::color_normalization::reference::types::TileDescriptor;

/// Turns a tile's pixels into the embedding sent to the reference service.
pub trait DescriptorExtractor: Sync {
    fn describe(&self, tile: &TileSamples) -> Result<TileDescriptor>;
}

/// Descriptor made of the tile's three histograms, each scaled to unit mass and
/// concatenated red, green, blue (768 values). Stands in for a learned embedding.
#[derive(Debug, Clone, Copy, Default)]
pub struct HistogramDescriptor;

impl HistogramDescriptor {
    pub fn from_histogram(histogram: &Histogram) -> TileDescriptor {
        let mut embedding = Vec::with_capacity(3 * histogram.band(Band::Red).len());
        for band in Band::ALL {
            let total = histogram.pixel_count(band);
            let scale = if total == 0 { 0.0 } else { 1.0 / total as f64 };
            embedding.extend(histogram.band(band).iter().map(|&count| (count as f64 * scale) as f32));
        }
        TileDescriptor { embedding }
    }
}

impl DescriptorExtractor for HistogramDescriptor {
    fn describe(&self, tile: &TileSamples) -> Result<TileDescriptor> {
        let [red, green, blue] = Band::ALL.map(|band| tile.band(band));
        let histogram = build_histogram(red, green, blue)?;
        Ok(Self::from_histogram(&histogram))
    }
}

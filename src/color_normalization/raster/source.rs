use crate::color_normalization::common::{Band, Result};
use crate::color_normalization::raster::types::{TileRegion, TileSamples};

/// Supplier of per-band intensity samples in the [0, 256] domain.
///
/// Sources with a wider bit depth must rescale before handing samples out.
/// Implementations are shared across the scan workers, hence `Sync`.
pub trait RasterSource: Sync {
    fn width(&self) -> usize;

    fn height(&self) -> usize;

    /// Row-major samples of one band for the given region. `band_index` is 0-based.
    fn tile_samples(
        &self,
        origin_x: usize,
        origin_y: usize,
        width: usize,
        height: usize,
        band_index: usize,
    ) -> Result<Vec<f32>>;

    fn read_tile(&self, region: &TileRegion) -> Result<TileSamples> {
        let [red, green, blue] = Band::ALL.map(|band| {
            self.tile_samples(region.x, region.y, region.width, region.height, band.index())
        });
        Ok(TileSamples {
            region: *region,
            red: red?,
            green: green?,
            blue: blue?,
        })
    }
}

impl<R: RasterSource + ?Sized> RasterSource for &R {
    fn width(&self) -> usize {
        (**self).width()
    }

    fn height(&self) -> usize {
        (**self).height()
    }

    fn tile_samples(
        &self,
        origin_x: usize,
        origin_y: usize,
        width: usize,
        height: usize,
        band_index: usize,
    ) -> Result<Vec<f32>> {
        (**self).tile_samples(origin_x, origin_y, width, height, band_index)
    }
}

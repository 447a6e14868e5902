use crate::color_normalization::common::{NormalizationError, Result};
use crate::color_normalization::raster::source::RasterSource;

/// RGB raster held as three row-major band planes.
#[derive(Debug, Clone)]
pub struct InMemoryRaster {
    width: usize,
    height: usize,
    bands: [Vec<f32>; 3],
}

impl InMemoryRaster {
    pub fn from_bands(width: usize, height: usize, bands: [Vec<f32>; 3]) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(NormalizationError::InvalidDimensions(width, height));
        }
        if let Some(plane) = bands.iter().find(|plane| plane.len() != width * height) {
            return Err(NormalizationError::RasterReadError(format!(
                "band plane holds {} samples, expected {}",
                plane.len(),
                width * height
            )));
        }
        Ok(Self { width, height, bands })
    }

    /// Builds a raster from interleaved `[R, G, B, R, G, B, ...]` bytes.
    pub fn from_interleaved_rgb8(width: usize, height: usize, data: &[u8]) -> Result<Self> {
        if data.len() != width * height * 3 {
            return Err(NormalizationError::RasterReadError(format!(
                "interleaved buffer holds {} bytes, expected {}",
                data.len(),
                width * height * 3
            )));
        }
        let mut bands = [
            Vec::with_capacity(width * height),
            Vec::with_capacity(width * height),
            Vec::with_capacity(width * height),
        ];
        for pixel in data.chunks_exact(3) {
            for (plane, &value) in bands.iter_mut().zip(pixel) {
                plane.push(value as f32);
            }
        }
        Self::from_bands(width, height, bands)
    }
}

impl RasterSource for InMemoryRaster {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn tile_samples(
        &self,
        origin_x: usize,
        origin_y: usize,
        width: usize,
        height: usize,
        band_index: usize,
    ) -> Result<Vec<f32>> {
        let plane = self.bands.get(band_index).ok_or_else(|| {
            NormalizationError::RasterReadError(format!("band index {band_index} out of range"))
        })?;
        if origin_x + width > self.width || origin_y + height > self.height {
            return Err(NormalizationError::RasterReadError(format!(
                "region {}x{} at ({}, {}) exceeds raster extent {}x{}",
                width, height, origin_x, origin_y, self.width, self.height
            )));
        }

        let mut samples = Vec::with_capacity(width * height);
        for row in origin_y..origin_y + height {
            let start = row * self.width + origin_x;
            samples.extend_from_slice(&plane[start..start + width]);
        }
        Ok(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color_normalization::raster::types::TileRegion;

    #[test]
    fn test_interleaved_is_split_into_planes() {
        let data = [10u8, 20, 30, 11, 21, 31, 12, 22, 32, 13, 23, 33];
        let raster = InMemoryRaster::from_interleaved_rgb8(2, 2, &data).unwrap();
        assert_eq!(raster.tile_samples(0, 0, 2, 2, 1).unwrap(), vec![20.0, 21.0, 22.0, 23.0]);
    }

    #[test]
    fn test_sub_region_rows() {
        let plane: Vec<f32> = (0..12).map(|v| v as f32).collect();
        let raster = InMemoryRaster::from_bands(4, 3, [plane.clone(), plane.clone(), plane]).unwrap();
        let tile = raster
            .read_tile(&TileRegion { x: 1, y: 1, width: 2, height: 2 })
            .unwrap();
        assert_eq!(tile.red, vec![5.0, 6.0, 9.0, 10.0]);
        assert_eq!(tile.blue, tile.red);
    }

    #[test]
    fn test_out_of_extent_request_fails() {
        let raster = InMemoryRaster::from_interleaved_rgb8(2, 2, &[0u8; 12]).unwrap();
        assert!(matches!(
            raster.tile_samples(1, 1, 2, 2, 0),
            Err(NormalizationError::RasterReadError(_))
        ));
        assert!(raster.tile_samples(0, 0, 2, 2, 3).is_err());
    }

    #[test]
    fn test_wrong_buffer_size_rejected() {
        assert!(InMemoryRaster::from_interleaved_rgb8(2, 2, &[0u8; 11]).is_err());
        assert!(matches!(
            InMemoryRaster::from_bands(0, 2, [vec![], vec![], vec![]]),
            Err(NormalizationError::InvalidDimensions(0, 2))
        ));
    }
}

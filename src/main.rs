use tile_color_normalizer::color_normalization::{
    Band, ColorNormalizationPipeline, Histogram, InMemoryRaster, NormalizationConfig, ReferenceCorpus,
    ReferenceEntry, build_histogram,
};
use tile_color_normalizer::logger;

use anyhow::Context;
use tracing::{error, info};

const WIDTH: usize = 2048;
const HEIGHT: usize = 1536;

fn main() -> anyhow::Result<()> {
    logger::init();

    info!("Starting tile_color_normalizer...");

    let raster = synthetic_scene()?;
    let corpus = synthetic_corpus()?;
    info!(entries = corpus.len(), "Reference corpus ready");

    let config = NormalizationConfig::builder()
        .tile_size(256)
        .diverse_sample_count(12)
        .seed(2023)
        .build();
    let pipeline = ColorNormalizationPipeline::new(raster, corpus, config);

    info!("Color normalization pipeline initialized");
    info!("Tile size: {}", pipeline.config().tile_size);
    info!("Diverse samples: {}", pipeline.config().diverse_sample_count);

    match pipeline.run() {
        Ok(correction) => {
            info!(
                contributing_tiles = correction.contributing_tiles,
                skipped_tiles = correction.skipped_tiles.len(),
                "Normalization successful!"
            );
            for band in Band::ALL {
                let lookup = correction.function.band(band);
                info!(
                    "{band:>5}: 0->{} 64->{} 128->{} 192->{} 255->{} (max spread {:.1})",
                    lookup[0],
                    lookup[64],
                    lookup[128],
                    lookup[192],
                    lookup[255],
                    correction.spread.max_variance(band)
                );
            }
        }
        Err(e) => error!("Normalization failed: {}", e),
    }

    Ok(())
}

/// Diagonal gradient with a warm cast on the left half and a cool, darker cast on the right.
fn synthetic_scene() -> anyhow::Result<InMemoryRaster> {
    let mut data = Vec::with_capacity(WIDTH * HEIGHT * 3);
    for y in 0..HEIGHT {
        for x in 0..WIDTH {
            let base = ((x + y) * 255 / (WIDTH + HEIGHT)) as f32;
            let pixel = if x < WIDTH / 2 {
                [base * 0.9 + 25.0, base * 0.8 + 10.0, base * 0.6]
            } else {
                [base * 0.5, base * 0.6 + 5.0, base * 0.7 + 30.0]
            };
            data.extend(pixel.map(|v| v.clamp(0.0, 255.0) as u8));
        }
    }
    InMemoryRaster::from_interleaved_rgb8(WIDTH, HEIGHT, &data).context("building synthetic scene")
}

/// Three balanced references of a single tile's pixel count, centred on different brightness levels.
fn synthetic_corpus() -> anyhow::Result<ReferenceCorpus> {
    let pixels = 256 * 256;
    let entries = [("dark", 70.0f32), ("balanced", 128.0), ("bright", 180.0)]
        .into_iter()
        .map(|(name, centre)| -> anyhow::Result<ReferenceEntry> {
            let histogram = bell_histogram(centre, 40.0, pixels)?;
            Ok(ReferenceEntry::from_histogram(name, &histogram))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(ReferenceCorpus::new(entries))
}

fn bell_histogram(centre: f32, width: f32, pixels: usize) -> anyhow::Result<Histogram> {
    let samples: Vec<f32> = (0..pixels)
        .map(|i| {
            // Deterministic spread: a triangular profile built from two uniform ramps.
            let u = (i % 257) as f32 / 256.0;
            let v = (i % 263) as f32 / 262.0;
            (centre + (u + v - 1.0) * width).clamp(0.0, 255.0)
        })
        .collect();
    build_histogram(&samples, &samples, &samples).context("building reference histogram")
}

use rayon::prelude::*;
use tracing::{debug, info, instrument, warn};

use crate::color_normalization::{
    common::{Band, CancellationToken, NormalizationError, Result},
    histogram::{Histogram, build_cdf, build_histogram},
    matching::{GlobalCorrectionFunction, MatchingFunction, aggregate_functions, derive_matching_function},
    pipeline::types::NormalizationConfig,
    raster::{RasterSource, TileRegion, tile_grid},
    reference::{DescriptorExtractor, HistogramDescriptor, ReferenceMatcher, RetryingMatcher},
    selection::select_diverse,
};

pub struct ColorNormalizationPipeline<S: RasterSource, M: ReferenceMatcher, D: DescriptorExtractor> {
    source: S,
    matcher: M,
    extractor: D,
    config: NormalizationConfig,
    cancel: CancellationToken,
}

impl<S: RasterSource, M: ReferenceMatcher> ColorNormalizationPipeline<S, M, HistogramDescriptor> {
    pub fn new(source: S, matcher: M, config: NormalizationConfig) -> Self {
        Self::with_custom(source, matcher, HistogramDescriptor, config)
    }
}

impl<S: RasterSource, M: ReferenceMatcher, D: DescriptorExtractor> ColorNormalizationPipeline<S, M, D> {
    pub fn with_custom(source: S, matcher: M, extractor: D, config: NormalizationConfig) -> Self {
        Self {
            source,
            matcher,
            extractor,
            config,
            cancel: CancellationToken::new(),
        }
    }

    /// Shares an externally owned token, e.g. one wired to a user-facing abort.
    pub fn with_cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Token that aborts an in-flight or future run of this pipeline when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Runs with the tile size, sample count and seed from the pipeline's config.
    pub fn run(&self) -> Result<GlobalCorrectionFunction> {
        self.run_color_normalization(
            self.config.tile_size,
            self.config.diverse_sample_count,
            self.config.seed,
        )
    }

    #[instrument(skip(self))]
    pub fn run_color_normalization(
        &self,
        tile_size: usize,
        diverse_sample_count: usize,
        seed: u64,
    ) -> Result<GlobalCorrectionFunction> {
        let config = NormalizationConfig {
            tile_size,
            diverse_sample_count,
            seed,
            ..self.config.clone()
        };
        config.validate()?;
        self.cancel.check()?;

        info!(
            width = self.source.width(),
            height = self.source.height(),
            tile_size,
            diverse_sample_count,
            "Starting color normalization"
        );

        let (regions, histograms) = {
            let _span = tracing::info_span!("scan_tiles").entered();
            self.scan_histograms(tile_size)?
        };

        let selected = {
            let _span = tracing::info_span!("select_diverse", candidates = histograms.len()).entered();
            select_diverse(&histograms, diverse_sample_count, seed)?
        };
        self.cancel.check()?;

        let outcomes = {
            let _span = tracing::info_span!("match_references", tiles = selected.len()).entered();
            self.match_selected(&config, &selected, &regions, &histograms)?
        };

        let mut functions = Vec::with_capacity(outcomes.len());
        let mut skipped_tiles = Vec::new();
        for (index, outcome) in selected.iter().zip(outcomes) {
            match outcome {
                Some(function) => functions.push(function),
                None => skipped_tiles.push(regions[*index]),
            }
        }

        let (function, spread) = {
            let _span = tracing::info_span!("aggregate", functions = functions.len()).entered();
            aggregate_functions(&functions)?
        };

        info!(
            contributing_tiles = functions.len(),
            skipped_tiles = skipped_tiles.len(),
            "Color normalization complete"
        );

        Ok(GlobalCorrectionFunction {
            function,
            spread,
            contributing_tiles: functions.len(),
            skipped_tiles,
        })
    }

    /// Histograms of every tile of the raster, computed in parallel. Returned in
    /// row-major tile order alongside the tile regions.
    pub fn scan_histograms(&self, tile_size: usize) -> Result<(Vec<TileRegion>, Vec<Histogram>)> {
        let regions = tile_grid(self.source.width(), self.source.height(), tile_size)?;

        let histograms = regions
            .par_iter()
            .map(|region| {
                self.cancel.check()?;
                let tile = self.source.read_tile(region)?;
                let [red, green, blue] = Band::ALL.map(|band| tile.band(band));
                build_histogram(red, green, blue)
            })
            .collect::<Result<Vec<_>>>()?;

        info!(tiles = histograms.len(), "Scanned tile histograms");
        Ok((regions, histograms))
    }

    /// Matches every selected tile on a bounded pool. `None` marks a tile skipped after a
    /// service failure or a low-similarity match. Only returns once every lookup settled.
    fn match_selected(
        &self,
        config: &NormalizationConfig,
        selected: &[usize],
        regions: &[TileRegion],
        histograms: &[Histogram],
    ) -> Result<Vec<Option<MatchingFunction>>> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.max_concurrent_requests)
            .build()
            .map_err(|e| NormalizationError::InvalidConfig(format!("reference worker pool: {e}")))?;
        let matcher = RetryingMatcher::new(
            &self.matcher,
            config.max_retries,
            config.retry_backoff,
            self.cancel.clone(),
        );

        let results: Vec<Result<Option<MatchingFunction>>> = pool.install(|| {
            selected
                .par_iter()
                .map(|&index| self.match_tile(config, &matcher, &regions[index], &histograms[index]))
                .collect()
        });

        // Never hand a partially matched set to the aggregator after an abort.
        self.cancel.check()?;

        results
            .into_iter()
            .zip(selected)
            .map(|(result, &index)| match result {
                Err(e) if e.is_service_failure() && config.allow_partial => {
                    let region = regions[index];
                    warn!(x = region.x, y = region.y, "Skipping tile after failed reference lookup: {}", e);
                    Ok(None)
                }
                other => other,
            })
            .collect()
    }

    fn match_tile(
        &self,
        config: &NormalizationConfig,
        matcher: &impl ReferenceMatcher,
        region: &TileRegion,
        histogram: &Histogram,
    ) -> Result<Option<MatchingFunction>> {
        self.cancel.check()?;
        let tile = self.source.read_tile(region)?;
        let descriptor = self.extractor.describe(&tile)?;
        let matched = matcher.best_match(&descriptor)?;

        if let Some(floor) = config.min_similarity {
            if matched.similarity < floor {
                warn!(
                    x = region.x,
                    y = region.y,
                    similarity = matched.similarity,
                    floor,
                    "Skipping tile with low reference similarity"
                );
                return Ok(None);
            }
        }

        debug!(x = region.x, y = region.y, similarity = matched.similarity, "Matched tile");
        Ok(Some(derive_matching_function(
            &build_cdf(histogram),
            &matched.cdf,
            config.monotonic,
        )))
    }

    pub fn config(&self) -> &NormalizationConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: NormalizationConfig) {
        self.config = config;
    }
}

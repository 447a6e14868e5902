//! Tile-based color normalization
//!
//! This module derives a single global color-correction function for a tiled raster:
//! tiles are reduced to per-band histograms, a diverse subset is picked, each picked
//! tile is matched against a reference distribution, and the resulting per-tile
//! histogram-specification functions are averaged.

pub mod common;
pub mod raster;
pub mod histogram;
pub mod selection;
pub mod reference;
pub mod matching;
pub mod pipeline;

pub use common::{
    Band,
    CancellationToken,
    NormalizationError,
    Result,
};

pub use raster::{
    InMemoryRaster,
    RasterSource,
    TileRegion,
    TileSamples,
    tile_grid,
};

pub use histogram::{
    BINS,
    Cdf,
    Histogram,
    build_cdf,
    build_cdf_band,
    build_histogram,
};

pub use selection::{
    histogram_distance,
    select_diverse,
};

pub use reference::{
    BestMatchRequest,
    BestMatchResponse,
    DescriptorExtractor,
    HistogramDescriptor,
    JsonReferenceMatcher,
    ReferenceCorpus,
    ReferenceEntry,
    ReferenceMatch,
    ReferenceMatcher,
    ReferenceTransport,
    RetryingMatcher,
    TileDescriptor,
    parse_best_match_response,
};

pub use matching::{
    GlobalCorrectionFunction,
    LevelSpread,
    MatchingFunction,
    MonotonicPolicy,
    aggregate_functions,
    derive_matching_function,
    derive_matching_band,
};

pub use pipeline::{
    ColorNormalizationPipeline,
    NormalizationConfig,
    NormalizationConfigBuilder,
};

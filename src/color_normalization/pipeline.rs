//! Pipeline orchestration module
//!
//! Wires raster scanning, diverse selection, reference matching and aggregation
//! into one cancellable run.

mod normalization;
pub mod types;


pub use normalization::ColorNormalizationPipeline;
pub use types::{NormalizationConfig, NormalizationConfigBuilder};

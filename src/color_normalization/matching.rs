//! Histogram matching module
//!
//! Derives per-tile histogram-specification lookups and folds them into one
//! global correction function.

mod derive;
mod aggregate;
pub mod types;

pub use derive::{derive_matching_band, derive_matching_function};
pub use aggregate::aggregate_functions;
pub use types::{GlobalCorrectionFunction, LevelSpread, MatchingFunction, MonotonicPolicy};

//! Histogram and CDF module
//!
//! Fixed 256-bin per-band histograms and their cumulative distributions.

mod builder;
mod cdf;
pub mod types;

pub use builder::build_histogram;
pub use cdf::{build_cdf, build_cdf_band};
pub use types::{BINS, Cdf, Histogram};

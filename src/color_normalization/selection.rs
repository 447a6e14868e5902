//! Diverse sample selection module
//!
//! Greedy farthest-point selection of representative tile histograms.

mod distance;
mod diversity;

pub use distance::histogram_distance;
pub use diversity::select_diverse;

//! Common utilities module
//!
//! Shared error type, band indexing and cancellation used across the pipeline stages.

pub mod error;
pub mod band;
pub mod cancel;

pub use error::{NormalizationError, Result};
pub use band::Band;
pub use cancel::CancellationToken;

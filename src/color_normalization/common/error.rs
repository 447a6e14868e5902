use thiserror::Error;

use crate::color_normalization::common::band::Band;

#[derive(Error, Debug)]
pub enum NormalizationError {
    #[error("Sample {value} in {band} band is outside the [0, 256] intensity domain")]
    InvalidSampleRange { band: Band, value: f32 },

    #[error("Expected {expected} bins per band, got {actual}")]
    InvalidHistogramShape { expected: usize, actual: usize },

    #[error("Band sample arrays differ in length: red={red}, green={green}, blue={blue}")]
    BandLengthMismatch { red: usize, green: usize, blue: usize },

    #[error("Requested {requested} diverse samples but only {available} candidates exist")]
    InsufficientCandidates { requested: usize, available: usize },

    #[error("Reference service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Malformed reference response: {0}")]
    MalformedResponse(String),

    #[error("Cannot aggregate an empty set of matching functions")]
    EmptyFunctionSet,

    #[error("Invalid raster dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Failed to read raster samples: {0}")]
    RasterReadError(String),

    #[error("Descriptor length {actual} does not match reference descriptors of length {expected}")]
    DescriptorLengthMismatch { expected: usize, actual: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Color normalization was cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl NormalizationError {
    /// Environment failures worth another attempt. Everything else is either a
    /// programming error or a payload that will not improve on retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, NormalizationError::ServiceUnavailable(_))
    }

    /// Failures of the reference service for a single tile, as opposed to local faults.
    /// These may be degraded to skipping the tile.
    pub fn is_service_failure(&self) -> bool {
        matches!(
            self,
            NormalizationError::ServiceUnavailable(_) | NormalizationError::MalformedResponse(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, NormalizationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_service_unavailable_is_retryable() {
        assert!(NormalizationError::ServiceUnavailable("timeout".into()).is_retryable());
        assert!(!NormalizationError::MalformedResponse("bad json".into()).is_retryable());
        assert!(!NormalizationError::EmptyFunctionSet.is_retryable());
        assert!(!NormalizationError::Cancelled.is_retryable());
    }

    #[test]
    fn test_service_failures() {
        assert!(NormalizationError::MalformedResponse("bad json".into()).is_service_failure());
        assert!(NormalizationError::ServiceUnavailable("timeout".into()).is_service_failure());
        assert!(!NormalizationError::InvalidHistogramShape { expected: 256, actual: 1 }.is_service_failure());
        assert!(!NormalizationError::Cancelled.is_service_failure());
    }

    #[test]
    fn test_sample_range_message_names_band() {
        let err = NormalizationError::InvalidSampleRange { band: Band::Green, value: 300.0 };
        assert_eq!(
            err.to_string(),
            "Sample 300 in green band is outside the [0, 256] intensity domain"
        );
    }
}

//! Color normalization configuration types

use std::time::Duration;

use crate::color_normalization::common::{NormalizationError, Result};
use crate::color_normalization::matching::MonotonicPolicy;

/// Configuration for a color normalization run
#[derive(Debug, Clone)]
pub struct NormalizationConfig {
    /// Edge length in pixels of the square tiles the raster is cut into
    pub tile_size: usize,
    /// Number of diverse tiles matched against the reference service
    pub diverse_sample_count: usize,
    /// Seed for the initial diverse pick
    pub seed: u64,
    /// Upper bound on reference lookups in flight at once
    pub max_concurrent_requests: usize,
    /// Extra attempts after a `ServiceUnavailable` lookup
    pub max_retries: u32,
    /// Delay before the first retry; doubled for each further attempt
    pub retry_backoff: Duration,
    /// Matches scoring below this similarity are skipped. `None` accepts every match.
    pub min_similarity: Option<f32>,
    /// Post-processing applied to every derived per-tile lookup
    pub monotonic: MonotonicPolicy,
    /// Skip tiles whose lookup failed instead of failing the run
    pub allow_partial: bool,
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        Self {
            tile_size: 512,
            diverse_sample_count: 20,
            seed: 0,
            max_concurrent_requests: 4,
            max_retries: 3,
            retry_backoff: Duration::from_millis(200),
            min_similarity: None,
            monotonic: MonotonicPolicy::RunningMax,
            allow_partial: true,
        }
    }
}

impl NormalizationConfig {
    pub fn builder() -> NormalizationConfigBuilder {
        NormalizationConfigBuilder::default()
    }

    pub fn validate(&self) -> Result<()> {
        if self.tile_size == 0 {
            return Err(NormalizationError::InvalidConfig("tile_size must be positive".to_string()));
        }
        if self.diverse_sample_count == 0 {
            return Err(NormalizationError::InvalidConfig(
                "diverse_sample_count must be positive".to_string(),
            ));
        }
        if self.max_concurrent_requests == 0 {
            return Err(NormalizationError::InvalidConfig(
                "max_concurrent_requests must be positive".to_string(),
            ));
        }
        if let Some(floor) = self.min_similarity {
            if !(0.0..=1.0).contains(&floor) {
                return Err(NormalizationError::InvalidConfig(format!(
                    "min_similarity {floor} outside [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

/// Builder for NormalizationConfig
#[derive(Default)]
pub struct NormalizationConfigBuilder {
    tile_size: Option<usize>,
    diverse_sample_count: Option<usize>,
    seed: Option<u64>,
    max_concurrent_requests: Option<usize>,
    max_retries: Option<u32>,
    retry_backoff: Option<Duration>,
    min_similarity: Option<Option<f32>>,
    monotonic: Option<MonotonicPolicy>,
    allow_partial: Option<bool>,
}

impl NormalizationConfigBuilder {
    pub fn tile_size(mut self, tile_size: usize) -> Self {
        self.tile_size = Some(tile_size);
        self
    }

    pub fn diverse_sample_count(mut self, count: usize) -> Self {
        self.diverse_sample_count = Some(count);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn max_concurrent_requests(mut self, max: usize) -> Self {
        self.max_concurrent_requests = Some(max);
        self
    }

    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    pub fn retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = Some(backoff);
        self
    }

    pub fn min_similarity(mut self, floor: Option<f32>) -> Self {
        self.min_similarity = Some(floor);
        self
    }

    pub fn monotonic(mut self, policy: MonotonicPolicy) -> Self {
        self.monotonic = Some(policy);
        self
    }

    pub fn allow_partial(mut self, allow: bool) -> Self {
        self.allow_partial = Some(allow);
        self
    }

    pub fn build(self) -> NormalizationConfig {
        let default = NormalizationConfig::default();
        NormalizationConfig {
            tile_size: self.tile_size.unwrap_or(default.tile_size),
            diverse_sample_count: self.diverse_sample_count.unwrap_or(default.diverse_sample_count),
            seed: self.seed.unwrap_or(default.seed),
            max_concurrent_requests: self.max_concurrent_requests.unwrap_or(default.max_concurrent_requests),
            max_retries: self.max_retries.unwrap_or(default.max_retries),
            retry_backoff: self.retry_backoff.unwrap_or(default.retry_backoff),
            min_similarity: self.min_similarity.unwrap_or(default.min_similarity),
            monotonic: self.monotonic.unwrap_or(default.monotonic),
            allow_partial: self.allow_partial.unwrap_or(default.allow_partial),
        }
    }
}

//! In-process reference corpus.
//!
//! Answers best-match queries from a fixed list of known-good distributions using
//! cosine similarity between descriptors.

use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::color_normalization::common::{NormalizationError, Result};
use crate::color_normalization::histogram::{Cdf, Histogram, build_cdf};
use crate::color_normalization::reference::descriptor::HistogramDescriptor;
use crate::color_normalization::reference::matcher::ReferenceMatcher;
use crate::color_normalization::reference::payload::CdfPayload;
use crate::color_normalization::reference::types::{ReferenceMatch, TileDescriptor};

/// One known-good distribution with the descriptor it is looked up by
#[derive(Debug, Clone)]
pub struct ReferenceEntry {
    pub name: String,
    pub descriptor: Vec<f32>,
    pub cdf: Cdf,
}

impl ReferenceEntry {
    /// Entry described the same way [`HistogramDescriptor`] describes tiles.
    pub fn from_histogram(name: impl Into<String>, histogram: &Histogram) -> Self {
        Self {
            name: name.into(),
            descriptor: HistogramDescriptor::from_histogram(histogram).embedding,
            cdf: build_cdf(histogram),
        }
    }
}

#[derive(Deserialize)]
struct CorpusFile {
    entries: Vec<EntryRecord>,
}

#[derive(Deserialize)]
struct EntryRecord {
    name: String,
    descriptor: Vec<f32>,
    cdf: CdfPayload,
}

#[derive(Debug, Clone, Default)]
pub struct ReferenceCorpus {
    entries: Vec<ReferenceEntry>,
}

impl ReferenceCorpus {
    pub fn new(entries: Vec<ReferenceEntry>) -> Self {
        Self { entries }
    }

    /// Parses `{"entries": [{"name", "descriptor", "cdf": {"r_cdf", "g_cdf", "b_cdf"}}]}`.
    pub fn from_json_slice(data: &[u8]) -> Result<Self> {
        let file: CorpusFile = serde_json::from_slice(data)
            .map_err(|e| NormalizationError::MalformedResponse(format!("reference corpus: {e}")))?;

        let entries = file
            .entries
            .into_iter()
            .map(|record| -> Result<ReferenceEntry> {
                Ok(ReferenceEntry {
                    name: record.name,
                    descriptor: record.descriptor,
                    cdf: record.cdf.into_cdf()?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { entries })
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let corpus = Self::from_json_slice(&data)?;
        info!(path = %path.display(), entries = corpus.len(), "Loaded reference corpus");
        Ok(corpus)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[ReferenceEntry] {
        &self.entries
    }
}

impl ReferenceMatcher for ReferenceCorpus {
    fn best_match(&self, descriptor: &TileDescriptor) -> Result<ReferenceMatch> {
        let mut best: Option<(&ReferenceEntry, f32)> = None;
        for entry in &self.entries {
            if entry.descriptor.len() != descriptor.embedding.len() {
                return Err(NormalizationError::DescriptorLengthMismatch {
                    expected: entry.descriptor.len(),
                    actual: descriptor.embedding.len(),
                });
            }
            let similarity = cosine_similarity(&entry.descriptor, &descriptor.embedding);
            if best.is_none_or(|(_, best_similarity)| similarity > best_similarity) {
                best = Some((entry, similarity));
            }
        }

        let (entry, similarity) = best.ok_or_else(|| {
            NormalizationError::InvalidConfig("reference corpus is empty".to_string())
        })?;
        debug!(reference = %entry.name, similarity, "Matched reference entry");

        Ok(ReferenceMatch {
            cdf: entry.cdf.clone(),
            similarity,
        })
    }
}

/// Cosine similarity clamped to [0, 1]; zero vectors score 0.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let (dot, norm_a, norm_b) = a.iter().zip(b).fold((0.0f64, 0.0f64, 0.0f64), |(dot, na, nb), (&x, &y)| {
        let (x, y) = (x as f64, y as f64);
        (dot + x * y, na + x * x, nb + y * y)
    });
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(0.0, 1.0) as f32
}

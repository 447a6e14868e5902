//! Reference matching types

use crate::color_normalization::histogram::Cdf;

/// Embedding of a tile handed to the reference service
#[derive(Debug, Clone, PartialEq)]
pub struct TileDescriptor {
    pub embedding: Vec<f32>,
}

/// Best-matching reference distribution for one tile
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceMatch {
    /// Cumulative distribution to match the tile against
    pub cdf: Cdf,
    /// Advisory similarity in [0, 1]; 1 is a perfect match
    pub similarity: f32,
}

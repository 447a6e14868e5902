//! Reference matching module
//!
//! Contract and helpers for the external reference-match service: tile descriptors
//! go in, the closest known-good distribution comes back.

mod matcher;
mod descriptor;
mod payload;
mod corpus;
mod retry;
pub mod types;

pub use matcher::ReferenceMatcher;
pub use descriptor::{DescriptorExtractor, HistogramDescriptor};
pub use payload::{
    BestMatchRequest,
    BestMatchResponse,
    CdfPayload,
    JsonReferenceMatcher,
    ReferenceTransport,
    parse_best_match_response,
};
pub use corpus::{ReferenceCorpus, ReferenceEntry};
pub use retry::RetryingMatcher;
pub use types::{ReferenceMatch, TileDescriptor};

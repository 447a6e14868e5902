use crate::color_normalization::common::Result;
use crate::color_normalization::reference::types::{ReferenceMatch, TileDescriptor};

/// Lookup of the reference distribution closest to a tile descriptor.
///
/// Calls are issued concurrently from a worker pool, hence `Sync`. Transport failures
/// should surface as `ServiceUnavailable` and undecodable payloads as `MalformedResponse`.
pub trait ReferenceMatcher: Sync {
    fn best_match(&self, descriptor: &TileDescriptor) -> Result<ReferenceMatch>;
}

impl<M: ReferenceMatcher + ?Sized> ReferenceMatcher for &M {
    fn best_match(&self, descriptor: &TileDescriptor) -> Result<ReferenceMatch> {
        (**self).best_match(descriptor)
    }
}

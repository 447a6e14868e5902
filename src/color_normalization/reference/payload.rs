//! JSON payloads of the reference-match service.
//!
//! Only the logical request/response shape lives here; moving the bytes is up to
//! an injected [`ReferenceTransport`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color_normalization::common::{Band, NormalizationError, Result};
use crate::color_normalization::histogram::Cdf;
use crate::color_normalization::reference::matcher::ReferenceMatcher;
use crate::color_normalization::reference::types::{ReferenceMatch, TileDescriptor};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BestMatchRequest {
    pub embedding: Vec<f32>,
}

/// Cumulative distribution as sent over the wire, one array per band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CdfPayload {
    pub r_cdf: Vec<u64>,
    pub g_cdf: Vec<u64>,
    pub b_cdf: Vec<u64>,
}

impl CdfPayload {
    pub fn from_cdf(cdf: &Cdf) -> Self {
        Self {
            r_cdf: cdf.band(Band::Red).to_vec(),
            g_cdf: cdf.band(Band::Green).to_vec(),
            b_cdf: cdf.band(Band::Blue).to_vec(),
        }
    }

    /// Checks the 256-entry shape and monotonicity; any violation is `MalformedResponse`.
    pub fn into_cdf(self) -> Result<Cdf> {
        let cdf = Cdf::from_bands(&self.r_cdf, &self.g_cdf, &self.b_cdf)
            .map_err(|e| NormalizationError::MalformedResponse(e.to_string()))?;
        if !cdf.is_monotonic() {
            return Err(NormalizationError::MalformedResponse(
                "reference CDF is not monotonically non-decreasing".to_string(),
            ));
        }
        Ok(cdf)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BestMatchResponse {
    pub best_match_cdf: CdfPayload,
    pub similarity: f32,
}

pub fn parse_best_match_response(body: &[u8]) -> Result<ReferenceMatch> {
    let response: BestMatchResponse = serde_json::from_slice(body)
        .map_err(|e| NormalizationError::MalformedResponse(e.to_string()))?;

    if !(0.0..=1.0).contains(&response.similarity) {
        return Err(NormalizationError::MalformedResponse(format!(
            "similarity {} outside [0, 1]",
            response.similarity
        )));
    }

    Ok(ReferenceMatch {
        cdf: response.best_match_cdf.into_cdf()?,
        similarity: response.similarity,
    })
}

/// Moves an encoded request to the service and returns the raw response body.
pub trait ReferenceTransport: Sync {
    fn post(&self, body: &[u8]) -> Result<Vec<u8>>;
}

/// Reference matcher speaking the JSON payloads over any transport.
pub struct JsonReferenceMatcher<T: ReferenceTransport> {
    transport: T,
}

impl<T: ReferenceTransport> JsonReferenceMatcher<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }
}

impl<T: ReferenceTransport> ReferenceMatcher for JsonReferenceMatcher<T> {
    fn best_match(&self, descriptor: &TileDescriptor) -> Result<ReferenceMatch> {
        let request = BestMatchRequest {
            embedding: descriptor.embedding.clone(),
        };
        let body = serde_json::to_vec(&request)
            .map_err(|e| NormalizationError::MalformedResponse(format!("encoding request: {e}")))?;
        debug!(request_bytes = body.len(), "Posting best-match request");

        let response = self.transport.post(&body)?;
        parse_best_match_response(&response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color_normalization::histogram::{BINS, Histogram, build_cdf};
    use std::sync::{Arc, Mutex};

    fn response_json(r: &[u64], similarity: f32) -> String {
        let payload = BestMatchResponse {
            best_match_cdf: CdfPayload {
                r_cdf: r.to_vec(),
                g_cdf: vec![7; BINS],
                b_cdf: (0..BINS as u64).collect(),
            },
            similarity,
        };
        serde_json::to_string(&payload).unwrap()
    }

    struct MockTransport {
        reply: Option<Vec<u8>>,
        requests: Arc<Mutex<Vec<BestMatchRequest>>>,
    }

    impl ReferenceTransport for MockTransport {
        fn post(&self, body: &[u8]) -> Result<Vec<u8>> {
            self.requests.lock().unwrap().push(serde_json::from_slice(body).unwrap());
            self.reply
                .clone()
                .ok_or_else(|| NormalizationError::ServiceUnavailable("connection refused".to_string()))
        }
    }

    #[test]
    fn test_parse_valid_response() {
        let json = response_json(&[100; BINS], 0.83);
        let matched = parse_best_match_response(json.as_bytes()).unwrap();
        assert_eq!(matched.similarity, 0.83);
        assert_eq!(matched.cdf.total(Band::Red), 100);
        assert_eq!(matched.cdf.band(Band::Blue)[17], 17);
    }

    #[test]
    fn test_cdf_survives_the_wire() {
        let bins: Vec<u64> = (0..BINS as u64).map(|level| level % 4).collect();
        let cdf = build_cdf(&Histogram::from_bands(&bins, &bins, &bins).unwrap());
        let body = serde_json::to_vec(&BestMatchResponse {
            best_match_cdf: CdfPayload::from_cdf(&cdf),
            similarity: 0.6,
        })
        .unwrap();

        let matched = parse_best_match_response(&body).unwrap();

        assert_eq!(matched.cdf, cdf);
        assert_eq!(matched.similarity, 0.6);
    }

    #[test]
    fn test_unparseable_payload_is_malformed() {
        let bodies: [&[u8]; 3] = [
            b"not json",
            br#"{"similarity": 0.5}"#,
            br#"{"best_match_cdf": 3, "similarity": 1}"#,
        ];
        for body in bodies {
            assert!(matches!(
                parse_best_match_response(body),
                Err(NormalizationError::MalformedResponse(_))
            ));
        }
    }

    #[test]
    fn test_wrong_shape_is_malformed() {
        let json = response_json(&[1; 255], 0.5);
        assert!(matches!(
            parse_best_match_response(json.as_bytes()),
            Err(NormalizationError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_non_monotonic_cdf_is_malformed() {
        let mut r: Vec<u64> = (0..BINS as u64).collect();
        r[200] = 0;
        let json = response_json(&r, 0.5);
        let err = parse_best_match_response(json.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("monotonically"));
    }

    #[test]
    fn test_similarity_out_of_range_is_malformed() {
        let json = response_json(&[1; BINS], 1.5);
        assert!(parse_best_match_response(json.as_bytes()).is_err());
    }

    #[test]
    fn test_json_matcher_sends_embedding_and_decodes_reply() {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let matcher = JsonReferenceMatcher::new(MockTransport {
            reply: Some(response_json(&[3; BINS], 0.25).into_bytes()),
            requests: requests.clone(),
        });
        let descriptor = TileDescriptor { embedding: vec![0.5, 0.25, 0.25] };

        let matched = matcher.best_match(&descriptor).unwrap();

        assert_eq!(matched.similarity, 0.25);
        let sent = requests.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].embedding, vec![0.5, 0.25, 0.25]);
    }

    #[test]
    fn test_json_matcher_propagates_transport_failure() {
        let matcher = JsonReferenceMatcher::new(MockTransport {
            reply: None,
            requests: Arc::new(Mutex::new(Vec::new())),
        });
        let err = matcher.best_match(&TileDescriptor { embedding: vec![] }).unwrap_err();
        assert!(err.is_retryable());
    }
}

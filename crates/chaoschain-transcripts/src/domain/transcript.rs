//! Transcript and blob-reference types.
//!
//! Reference: spec.md Section 3, **Transcript (OffchainData)** and
//! **BlobReference**.

use chaoschain_types::{ChainId, Discussion, Hash};
use serde::{Deserialize, Serialize};

/// The outcome of a terminated deliberation, as recorded in its transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Accepted,
    Rejected,
}

impl Outcome {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

/// Everything captured about one terminated deliberation, produced exactly
/// once and handed to the `BlobStore`.
///
/// Reference: spec.md Section 3, **Transcript (OffchainData)**.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OffchainData {
    pub chain_id: ChainId,
    pub block_hash: Hash,
    pub block_height: u64,
    pub discussions: Vec<Discussion>,
    pub votes: Vec<Discussion>,
    pub outcome: Outcome,
    pub agent_identities: std::collections::HashMap<String, String>,
    pub timestamp: u64,
}

/// Catalog entry pointing at one stored transcript blob.
///
/// Reference: spec.md Section 3, **BlobReference**. One-to-one with a
/// `Transcript`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlobReference {
    pub blob_id: String,
    pub chain_id: ChainId,
    pub block_hash: String,
    pub block_height: u64,
    pub timestamp: u64,
    pub outcome: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_renders_lowercase() {
        assert_eq!(Outcome::Accepted.as_str(), "accepted");
        assert_eq!(Outcome::Rejected.as_str(), "rejected");
    }
}

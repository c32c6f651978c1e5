//! # ChaosChain Transcripts
//!
//! Content-addressed off-chain storage of deliberation transcripts, plus
//! the durable master index mapping `(chain, block-hash)` and
//! `(chain, height)` to transcript blob ids (spec.md Section 4.2).

pub mod adapters;
pub mod blob_store;
pub mod domain;
pub mod master_index;

pub use adapters::file::FileBlobStore;
pub use adapters::memory::MemoryBlobStore;
pub use blob_store::BlobStore;
pub use domain::errors::{BlobStoreError, MasterIndexError};
pub use domain::transcript::{BlobReference, Outcome, OffchainData};
pub use master_index::{MasterIndex, MasterIndexStore, MASTER_INDEX_FILE};

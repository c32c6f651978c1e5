//! The per-chain pending transaction pool.

use super::entities::EphemeralState;
use super::errors::MempoolError;
use crate::ports::SignatureVerifier;
use chaoschain_types::{hash_to_hex, ChainId, Discussion, Transaction, ValidatorId};
use std::collections::HashMap;

/// Per-chain set of pending transactions plus ephemeral per-round
/// discussion state (spec.md Section 4.4).
///
/// Dedup key is the transaction's fingerprint (signature + chain id, hashed)
/// rather than the raw signature string, so a signature replayed across
/// chains never collides here.
#[derive(Debug)]
pub struct Mempool {
    chain_id: ChainId,
    by_fingerprint: HashMap<String, Transaction>,
    ephemeral: EphemeralState,
}

impl Mempool {
    pub fn new(chain_id: ChainId) -> Self {
        Self {
            chain_id,
            by_fingerprint: HashMap::new(),
            ephemeral: EphemeralState::default(),
        }
    }

    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    pub fn len(&self) -> usize {
        self.by_fingerprint.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_fingerprint.is_empty()
    }

    pub fn contains(&self, tx: &Transaction) -> bool {
        self.by_fingerprint.contains_key(&hash_to_hex(&tx.fingerprint()))
    }

    /// Adds a transaction. Rejects transactions from another chain or with
    /// an invalid signature; coalesces duplicates by fingerprint.
    pub fn add(
        &mut self,
        tx: Transaction,
        verifier: &dyn SignatureVerifier,
    ) -> Result<(), MempoolError> {
        if tx.chain_id != self.chain_id {
            return Err(MempoolError::WrongChain {
                tx_chain: tx.chain_id.clone(),
                pool_chain: self.chain_id.clone(),
            });
        }

        let message = format!("{}:{}:{}", tx.chain_id, tx.from, tx.to);
        if !verifier.verify(message.as_bytes(), &tx.signature, &tx.public_key) {
            return Err(MempoolError::InvalidSignature);
        }

        let key = hash_to_hex(&tx.fingerprint());
        if self.by_fingerprint.contains_key(&key) {
            return Err(MempoolError::Duplicate(key));
        }
        self.by_fingerprint.insert(key, tx);
        Ok(())
    }

    /// Re-adds a transaction without re-verifying, coalescing on fingerprint.
    /// Used to return rejected-block transactions to the pool (spec.md
    /// Section 4.6 Step 6): idempotent, so a transaction present before a
    /// rejection is present exactly once afterwards too.
    pub fn readd(&mut self, tx: Transaction) {
        let key = hash_to_hex(&tx.fingerprint());
        self.by_fingerprint.entry(key).or_insert(tx);
    }

    /// Snapshot of the current pending set. Order is not guaranteed.
    pub fn pending(&self) -> Vec<Transaction> {
        self.by_fingerprint.values().cloned().collect()
    }

    pub fn remove_by_fingerprint(&mut self, fingerprint_hex: &str) -> Result<Transaction, MempoolError> {
        self.by_fingerprint
            .remove(fingerprint_hex)
            .ok_or_else(|| MempoolError::NotFound(fingerprint_hex.to_string()))
    }

    pub fn remove(&mut self, tx: &Transaction) -> Result<Transaction, MempoolError> {
        self.remove_by_fingerprint(&hash_to_hex(&tx.fingerprint()))
    }

    /// Removes transactions older than `max_age_secs`, relative to `now`.
    pub fn expire_older_than(&mut self, max_age_secs: u64, now: u64) -> usize {
        let before = self.by_fingerprint.len();
        self.by_fingerprint
            .retain(|_, tx| now.saturating_sub(tx.timestamp) <= max_age_secs);
        before - self.by_fingerprint.len()
    }

    pub fn append_ephemeral_vote(&mut self, vote: Discussion) {
        self.ephemeral.votes.push(vote);
    }

    pub fn ephemeral_votes(&self) -> &[Discussion] {
        &self.ephemeral.votes
    }

    pub fn set_ephemeral_identity(&mut self, id: ValidatorId, name: String) {
        self.ephemeral.agent_identities.insert(id, name);
    }

    pub fn ephemeral_identity(&self, id: &str) -> Option<&String> {
        self.ephemeral.agent_identities.get(id)
    }

    /// Idempotent: clearing twice in a row, or clearing an already-empty
    /// ephemeral state, leaves the persistent transaction set untouched.
    pub fn clear_ephemeral_data(&mut self) {
        self.ephemeral.clear();
    }

    pub fn ephemeral_is_clear(&self) -> bool {
        self.ephemeral.is_empty()
    }
}

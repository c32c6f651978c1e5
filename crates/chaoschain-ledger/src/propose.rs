//! Transaction submission: `ProposeTransaction` (spec.md Section 4.3).
//!
//! Verifies the signature, enforces chain-matching, inserts into the
//! chain's mempool, and emits a `TRANSACTION` event on the bus. Orchestrates
//! across `ChainRegistry` and `chaoschain_mempool::MempoolRegistry` rather
//! than living as a method on either, since the lock-ordering discipline
//! (spec.md Section 5) is `Registry -> Chain -> Mempool` and this spans
//! both registries plus the bus.

use crate::domain::errors::LedgerError;
use crate::registry::ChainRegistry;
use chaoschain_bus::{DeliberationEvent, EventPublisher};
use chaoschain_mempool::{MempoolRegistry, SignatureVerifier};
use chaoschain_types::Transaction;

/// Verifies, deduplicates, and enqueues `tx` into its target chain's
/// mempool, then emits `TRANSACTION` on `bus`.
pub async fn propose_transaction(
    chains: &ChainRegistry,
    mempools: &MempoolRegistry,
    bus: &dyn EventPublisher,
    verifier: &dyn SignatureVerifier,
    tx: Transaction,
) -> Result<(), LedgerError> {
    let chain_handle = chains.get_chain(&tx.chain_id)?;
    let target_chain_id = chain_handle.state().read().id().to_string();
    if tx.chain_id != target_chain_id {
        return Err(LedgerError::TxWrongChain {
            tx_chain: tx.chain_id.clone(),
            target_chain: target_chain_id,
        });
    }

    let mempool = mempools.get_or_create(&tx.chain_id);
    {
        let mut pool = mempool.lock();
        pool.add(tx.clone(), verifier)
            .map_err(|e| LedgerError::MempoolRejected(e.to_string()))?;
    }

    bus.publish(DeliberationEvent::TransactionSubmitted {
        chain_id: tx.chain_id.clone(),
        tx,
    })
    .await;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chaoschain_bus::InMemoryEventBus;
    use chaoschain_mempool::AcceptAllVerifier;
    use chaoschain_types::TransactionType;

    fn tx(chain: &str, sig: &str) -> Transaction {
        Transaction {
            tx_type: TransactionType::Transfer,
            from: "alice".into(),
            to: "bob".into(),
            amount: 10,
            fee: 1,
            content: String::new(),
            reward: 0,
            timestamp: 0,
            signature: sig.into(),
            public_key: "pk".into(),
            chain_id: chain.into(),
            data: Vec::new(),
        }
    }

    #[tokio::test]
    async fn propose_rejects_unknown_chain() {
        let chains = ChainRegistry::new();
        let mempools = MempoolRegistry::new();
        let bus = InMemoryEventBus::new();
        let err = propose_transaction(&chains, &mempools, &bus, &AcceptAllVerifier, tx("missing", "s1"))
            .await
            .unwrap_err();
        assert_eq!(err, LedgerError::ChainNotFound("missing".into()));
    }

    #[tokio::test]
    async fn propose_inserts_into_mempool_and_publishes() {
        let chains = ChainRegistry::new();
        chains.create_chain("c1".into(), "prompt".into(), 0, 0).unwrap();
        let mempools = MempoolRegistry::new();
        let bus = InMemoryEventBus::new();
        let mut observer = bus.subscribe(chaoschain_bus::EventFilter::all());

        propose_transaction(&chains, &mempools, &bus, &AcceptAllVerifier, tx("c1", "s1"))
            .await
            .unwrap();

        assert_eq!(mempools.get_or_create("c1").lock().len(), 1);
        let event = observer.recv().await.unwrap();
        assert!(matches!(event, DeliberationEvent::TransactionSubmitted { .. }));
    }
}

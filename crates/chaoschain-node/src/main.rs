//! # ChaosChain Node Runtime
//!
//! Brings up the Deliberative Consensus Core as a standing process: the
//! bus, chain registry, mempool registry, transcript store, and consensus
//! manager registry are wired together and kept alive until interrupted.
//!
//! The HTTP/WS API surface, CLI, and peer-network transport that would
//! drive this process in production are out of this core's scope (spec.md
//! Section 1); this binary only proves the wiring comes up cleanly and
//! stays up.

use anyhow::Result;
use chaoschain_node::{NodeConfig, NodeContainer};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = NodeConfig::from_env();
    chaoschain_telemetry::init(&config.telemetry)?;

    info!("===========================================");
    info!("  ChaosChain Node Runtime");
    info!("===========================================");

    let container = NodeContainer::new(config).await?;
    info!(
        rounds = container.config().consensus.rounds,
        round_duration_ms = container.config().consensus.round_duration.as_millis() as u64,
        "deliberative consensus core ready"
    );

    info!("Node is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;
    info!("Shutting down gracefully...");

    Ok(())
}

//! # BigSpace Node
//!
//! ## Startup Sequence
//!
//! 1. Load configuration from the environment
//! 2. Initialize logging and report rejected variables
//! 3. Build the tokio worker pool
//! 4. Start the namespace runtime and wait for Ctrl+C

use anyhow::{Context, Result};
use tracing::{info, warn};

use bigspace_node::{init_logging, NodeConfig, NodeRuntime};

fn main() -> Result<()> {
    let (config, issues) = NodeConfig::from_env();
    init_logging(&config.telemetry)?;

    for issue in &issues {
        warn!(error = %issue, "Ignoring configuration value");
    }
    config.validate()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.runtime.worker_threads)
        .thread_name("bigspace-worker")
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?;

    runtime.block_on(run(config))
}

async fn run(config: NodeConfig) -> Result<()> {
    info!("===========================================");
    info!("  BigSpace Node v{}", env!("CARGO_PKG_VERSION"));
    info!("===========================================");
    info!(
        items = config.namespace.item_count,
        workers = config.runtime.worker_threads,
        tick_ms = config.simulation.interval.as_millis() as u64,
        write_policy = ?config.namespace.write_policy,
        "Configuration loaded"
    );

    let mut node = NodeRuntime::new(config).context("Failed to create namespace")?;
    node.start().context("Failed to start node")?;

    info!("Node is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    node.shutdown().await;
    Ok(())
}

//! Mempool-Driven DEX Arbitrage Bot
//!
//! Main entry point. Boot sequence:
//! - load configuration from the environment (fatal if incomplete)
//! - connect the RPC provider and verify the node is reachable (fatal)
//! - bind the signing wallet to the node's chain id
//! - hand everything to the engine and run the event source forever
//!
//! After boot nothing is fatal: decode/quote/build/submission failures
//! abort single passes, and the event source re-dials the node on any
//! subscription loss.
//!
//! Author: AI-Generated
//! Created: 2026-02-03
//! Modified: 2026-02-05 - startup venue/target summary

use anyhow::{Context, Result};
use clap::Parser;
use ethers::prelude::*;
use flasharb_bot::config::load_config_from_file;
use flasharb_bot::engine::Engine;
use flasharb_bot::mempool::run_event_source;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Mempool-driven DEX arbitrage bot (flash-loan execution, private relay)
#[derive(Parser)]
#[command(name = "flasharb-bot")]
struct Args {
    /// Env file to load configuration from
    #[arg(short, long, env = "ENV_FILE", default_value = ".env")]
    env_file: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();
    let config = load_config_from_file(&args.env_file)?;

    info!("Flasharb bot starting (mempool + private relay)...");
    info!(
        "RPC URL: {}",
        &config.rpc_url[..40.min(config.rpc_url.len())]
    );
    info!("Relay: {}", config.relay_url);
    info!("Executor contract: {:?}", config.executor_address);
    info!("Min profit: {} wei", config.min_profit_wei);
    info!("Max in-flight passes: {}", config.max_inflight_tasks);

    // RPC connection is held for the process lifetime. Unreachable node
    // at boot is the one fatal connectivity condition.
    let provider = Provider::<Ws>::connect(&config.rpc_url)
        .await
        .context("node unreachable at startup")?;
    let provider = Arc::new(provider);

    let head = provider
        .get_block_number()
        .await
        .context("initial block number fetch failed")?;
    let chain_id = provider
        .get_chainid()
        .await
        .context("chain id fetch failed")?
        .as_u64();
    info!("Connected! Head block {} | chain id {}", head, chain_id);

    let wallet: LocalWallet = config
        .private_key
        .parse::<LocalWallet>()
        .context("PRIVATE_KEY is not a valid key")?
        .with_chain_id(chain_id);
    info!("Wallet loaded: {:?}", wallet.address());

    if config.live_mode {
        warn!("LIVE MODE ENABLED - bundles will be submitted to the relay!");
    } else {
        info!("Dry run mode - bundles are built and logged, never submitted");
    }

    let registry = config.registry();
    info!(
        "Venues: {} (factory {:?}) vs {} (factory {:?})",
        registry.venue_a.name,
        registry.venue_a.factory,
        registry.venue_b.name,
        registry.venue_b.factory
    );
    for (address, label) in config.targets().iter() {
        info!("Watching: {} ({:?})", label, address);
    }
    if !config.tracked_pairs.is_empty() {
        info!(
            "Reserve snapshots enabled for {} pairs",
            config.tracked_pairs.len()
        );
    }

    let engine = Arc::new(Engine::new(
        config,
        Arc::clone(&provider),
        wallet,
        chain_id,
    )?);

    info!("Engine initialized, starting event source...");
    run_event_source(engine).await
}

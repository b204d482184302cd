//! Event Source
//!
//! Dials a dedicated WebSocket connection to the node, subscribes to
//! pending-transaction hashes and new block headers, and dispatches one
//! fire-and-forget engine pass per delivered item. Delivery order is
//! arrival order, not chain order.
//!
//! The subscription connection is separate from the engine's RPC
//! connection, so a dropped subscription never disturbs in-flight
//! quoting or execution. When either stream ends the whole session is
//! torn down and re-dialed after a fixed delay, forever; a lost node
//! connection is expected to be transient and needs no operator. Events
//! produced during the gap are not replayed.
//!
//! Author: AI-Generated
//! Created: 2026-02-04

use crate::engine::Engine;
use anyhow::{bail, Context, Result};
use ethers::prelude::*;
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Run the event source forever. Only returns through its Err paths
/// internally; the reconnect loop itself never exits.
pub async fn run_event_source<M: Middleware + 'static>(engine: Arc<Engine<M>>) -> Result<()> {
    let delay = Duration::from_secs(engine.config().reconnect_delay_secs);

    loop {
        match run_session(&engine).await {
            Ok(()) => warn!(
                "Event source streams ended; reconnecting in {}s",
                delay.as_secs()
            ),
            Err(e) => warn!(
                "Event source session failed: {:#}; reconnecting in {}s",
                e,
                delay.as_secs()
            ),
        }
        tokio::time::sleep(delay).await;
        info!("Event source re-dialing node...");
    }
}

/// One WS session: connect, subscribe, dispatch until a stream dies.
async fn run_session<M: Middleware + 'static>(engine: &Arc<Engine<M>>) -> Result<()> {
    let provider = Provider::<Ws>::connect(&engine.config().rpc_url)
        .await
        .context("event source WS connect failed")?;

    let mut pending_stream = provider
        .subscribe_pending_txs()
        .await
        .context("pending-transaction subscription failed")?;
    let mut block_stream = provider
        .subscribe_blocks()
        .await
        .context("new-block subscription failed")?;

    info!("Event source connected: pending-tx and new-block subscriptions active");

    loop {
        tokio::select! {
            maybe_hash = pending_stream.next() => match maybe_hash {
                Some(tx_hash) => Arc::clone(engine).spawn_pending_pass(tx_hash),
                None => bail!("pending-transaction stream ended"),
            },
            maybe_block = block_stream.next() => match maybe_block {
                Some(block) => Arc::clone(engine).spawn_block_pass(block),
                None => bail!("new-block stream ended"),
            },
        }
    }
}

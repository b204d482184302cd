//! Detection Engine
//!
//! Orchestrates one detection pass per delivered event: fetch and filter
//! the transaction, decode the swap intent, quote both venues, compare,
//! and on a profitable spread build and submit the bundle. Passes are
//! independent tasks; the only cross-task coordination is the semaphore
//! bounding in-flight passes and the nonce allocator.
//!
//! Every stage failure aborts only its own pass. Nothing here is fatal
//! to the process.
//!
//! Author: AI-Generated
//! Created: 2026-02-04
//! Modified: 2026-02-05 - block-scan passes + reserve snapshots

use crate::arbitrage::{
    BundleBuilder, NonceAllocator, OpportunityDetector, RelayClient, SubmitOutcome,
};
use crate::errors::DecodeError;
use crate::mempool::decoder;
use crate::observations::{JsonlSink, LogSink, ObservationRecord, ObservationSink};
use crate::pool::PoolQuoter;
use crate::types::{BotConfig, ContractTargets, Opportunity, PendingSwap, PoolRegistry};
use anyhow::Result;
use ethers::prelude::*;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, info, trace, warn};

pub struct Engine<M> {
    config: BotConfig,
    provider: Arc<M>,
    registry: PoolRegistry,
    targets: ContractTargets,
    quoter: PoolQuoter<M>,
    detector: OpportunityDetector,
    nonces: Arc<NonceAllocator<M>>,
    builder: BundleBuilder<M>,
    relay: RelayClient,
    sink: Arc<dyn ObservationSink>,
    permits: Arc<Semaphore>,
}

impl<M: Middleware + 'static> Engine<M> {
    pub fn new(
        config: BotConfig,
        provider: Arc<M>,
        wallet: LocalWallet,
        chain_id: u64,
    ) -> Result<Self> {
        let registry = config.registry();
        let targets = config.targets();
        let quoter = PoolQuoter::new(Arc::clone(&provider));
        let detector = OpportunityDetector::new(config.min_profit_wei);
        let nonces = Arc::new(NonceAllocator::new(Arc::clone(&provider), wallet.address()));
        let builder = BundleBuilder::new(
            Arc::clone(&provider),
            wallet,
            config.executor_address,
            config.gas_limit,
            chain_id,
            Arc::clone(&nonces),
        );
        let relay = RelayClient::new(config.relay_url.clone(), config.relay_timeout_secs)?;
        let sink: Arc<dyn ObservationSink> = match &config.observations_dir {
            Some(dir) => Arc::new(JsonlSink::open(dir)?),
            None => Arc::new(LogSink),
        };
        let permits = Arc::new(Semaphore::new(config.max_inflight_tasks));

        Ok(Self {
            config,
            provider,
            registry,
            targets,
            quoter,
            detector,
            nonces,
            builder,
            relay,
            sink,
            permits,
        })
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    /// Fire-and-forget dispatch of one pending-transaction pass.
    /// Sheds the event when all permits are taken: under mempool bursts
    /// the node connection is the bottleneck, and a pass that queued
    /// behind the burst would be quoting stale state anyway.
    pub fn spawn_pending_pass(self: Arc<Self>, tx_hash: H256) {
        let engine = Arc::clone(&self);
        self.spawn_gated("pending tx", async move {
            engine.process_pending_tx(tx_hash).await;
        });
    }

    /// Fire-and-forget dispatch of one new-block pass.
    pub fn spawn_block_pass(self: Arc<Self>, block: Block<H256>) {
        let engine = Arc::clone(&self);
        self.spawn_gated("block", async move {
            engine.process_block(block).await;
        });
    }

    fn spawn_gated<F>(&self, kind: &str, future: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let permit = match Arc::clone(&self.permits).try_acquire_owned() {
            Ok(permit) => permit,
            Err(_) => {
                trace!(
                    "Shedding {} event: {} passes already in flight",
                    kind,
                    self.config.max_inflight_tasks
                );
                return;
            }
        };
        tokio::spawn(async move {
            future.await;
            drop(permit);
        });
    }

    /// One detection pass for a pending-transaction notification.
    async fn process_pending_tx(&self, tx_hash: H256) {
        let tx = match self.provider.get_transaction(tx_hash).await {
            Ok(Some(tx)) => tx,
            // Dropped or evicted before we could fetch it; common churn.
            Ok(None) => return,
            Err(e) => {
                debug!("Fetch of pending tx {:?} failed: {}", tx_hash, e);
                return;
            }
        };

        // Raced into a block between notification and fetch.
        if tx.block_number.is_some() {
            return;
        }

        let to = match tx.to {
            Some(to) => to,
            None => return, // contract creation
        };
        let label = match self.targets.label_of(&to) {
            Some(label) => label.to_string(),
            None => return,
        };

        self.sink
            .publish(&ObservationRecord::from_pending(&tx, &label));

        let swap = match decoder::decode_calldata(&tx.input) {
            Ok(swap) => swap,
            Err(DecodeError::UnknownSelector(selector)) => {
                trace!("Skipping {} call {} on {:?}", label, selector, tx_hash);
                return;
            }
            Err(e) => {
                debug!("Dropping undecodable tx {:?} to {}: {}", tx_hash, label, e);
                return;
            }
        };

        let pending = PendingSwap {
            tx_hash,
            router: to,
            router_label: label,
            swap,
        };

        info!(
            "📥 Pending swap | {} | {} | {:?}->{:?} | in={}",
            pending.router_label,
            pending.swap.function_name,
            pending.swap.token_in,
            pending.swap.token_out,
            pending.swap.amount_in
        );

        // Pending path: freshest available state, best-effort comparison.
        self.run_detection(&pending, None).await;
    }

    /// One pass for a new block: snapshot tracked reserves, then scan the
    /// block's transactions for monitored-router calls and run a pinned
    /// detection pass per match.
    async fn process_block(self: Arc<Self>, block: Block<H256>) {
        let number = match block.number {
            Some(number) => number.as_u64(),
            None => return, // still-pending header, nothing to scan
        };

        if !self.config.tracked_pairs.is_empty() {
            self.snapshot_reserves(number).await;
        }

        if !self.config.block_scan_enabled {
            return;
        }

        let full_block = match self.provider.get_block_with_txs(number).await {
            Ok(Some(block)) => block,
            Ok(None) => {
                debug!("Block {} not yet available for scan", number);
                return;
            }
            Err(e) => {
                debug!("Block {} fetch failed: {}", number, e);
                return;
            }
        };

        for tx in full_block.transactions {
            let to = match tx.to {
                Some(to) => to,
                None => continue,
            };
            let label = match self.targets.label_of(&to) {
                Some(label) => label.to_string(),
                None => continue,
            };

            let engine = Arc::clone(&self);
            self.spawn_gated("matched block tx", async move {
                engine.process_mined_tx(tx, number, label).await;
            });
        }
    }

    /// Pass for a monitored transaction found in a mined block. The
    /// receipt enriches the observation record; quoting pins the block
    /// height so both venue reads see the post-swap reserves.
    async fn process_mined_tx(&self, tx: Transaction, block_number: u64, label: String) {
        let receipt = match self.provider.get_transaction_receipt(tx.hash).await {
            Ok(receipt) => receipt,
            Err(e) => {
                debug!("Receipt fetch for {:?} failed: {}", tx.hash, e);
                None
            }
        };

        self.sink.publish(&ObservationRecord::from_mined(
            &tx,
            &label,
            block_number,
            receipt.as_ref(),
        ));

        let swap = match decoder::decode_calldata(&tx.input) {
            Ok(swap) => swap,
            Err(DecodeError::UnknownSelector(_)) => return,
            Err(e) => {
                debug!("Undecodable mined tx {:?} to {}: {}", tx.hash, label, e);
                return;
            }
        };

        let pending = PendingSwap {
            tx_hash: tx.hash,
            router: tx.to.unwrap_or_default(),
            router_label: label,
            swap,
        };

        self.run_detection(&pending, Some(block_number)).await;
    }

    /// Quote both venues, compare, execute on a profitable spread.
    async fn run_detection(&self, pending: &PendingSwap, block: Option<u64>) {
        let swap = &pending.swap;
        if swap.amount_in.is_zero() {
            debug!("Zero-amount swap {:?}, nothing to quote", pending.tx_hash);
            return;
        }

        let (result_a, result_b) = tokio::join!(
            self.quoter.quote(
                &self.registry.venue_a,
                swap.token_in,
                swap.token_out,
                swap.amount_in,
                block,
            ),
            self.quoter.quote(
                &self.registry.venue_b,
                swap.token_in,
                swap.token_out,
                swap.amount_in,
                block,
            ),
        );

        let quote_a = match result_a {
            Ok(quote) => quote,
            Err(e) => {
                debug!("Quote failed for {:?}: {}", pending.tx_hash, e);
                return;
            }
        };
        let quote_b = match result_b {
            Ok(quote) => quote,
            Err(e) => {
                debug!("Quote failed for {:?}: {}", pending.tx_hash, e);
                return;
            }
        };

        let opportunity = match self.detector.evaluate(swap, &quote_a, &quote_b) {
            Some(opportunity) => opportunity,
            None => return,
        };

        info!(
            "💰 Opportunity | {:?}->{:?} | in={} | buy {} ({}) sell {} ({}) | profit={}",
            opportunity.token_in,
            opportunity.token_out,
            opportunity.amount_in,
            opportunity.buy.name,
            opportunity.buy_amount_out,
            opportunity.sell.name,
            opportunity.sell_amount_out,
            opportunity.profit
        );

        self.execute(&opportunity).await;
    }

    /// One execution attempt: build the bundle for head+1 and submit.
    /// Failures abort the attempt and release the reserved nonce back to
    /// the node's view.
    async fn execute(&self, opportunity: &Opportunity) {
        let current_block = match self.provider.get_block_number().await {
            Ok(number) => number.as_u64(),
            Err(e) => {
                warn!("Head block fetch failed, dropping opportunity: {}", e);
                return;
            }
        };

        let bundle = match self.builder.build(opportunity, current_block).await {
            Ok(bundle) => bundle,
            Err(e) => {
                warn!("Bundle build failed: {}", e);
                self.nonces.invalidate().await;
                return;
            }
        };

        if !self.config.live_mode {
            info!(
                "DRY RUN | bundle {:?} for block {} built, not submitted",
                bundle.tx_hash, bundle.target_block
            );
            return;
        }

        match self.relay.submit(&bundle).await {
            Ok(SubmitOutcome::Accepted) => {
                info!(
                    "✅ Bundle {:?} accepted by relay for block {}",
                    bundle.tx_hash, bundle.target_block
                );
            }
            Ok(SubmitOutcome::Rejected(message)) => {
                warn!(
                    "Relay rejected bundle {:?} for block {}: {}",
                    bundle.tx_hash, bundle.target_block, message
                );
                self.nonces.invalidate().await;
            }
            Err(e) => {
                warn!(
                    "Relay submission failed for bundle {:?}: {}",
                    bundle.tx_hash, e
                );
                self.nonces.invalidate().await;
            }
        }
    }

    /// Reserve snapshot of every tracked pair on both venues, pinned to
    /// the new block's height.
    async fn snapshot_reserves(&self, block_number: u64) {
        for pair in &self.config.tracked_pairs {
            for venue in [&self.registry.venue_a, &self.registry.venue_b] {
                match self
                    .quoter
                    .reserves(venue, pair.token0, pair.token1, Some(block_number))
                    .await
                {
                    Ok((pool, reserve0, reserve1)) => {
                        info!(
                            "Reserves | {} | {} | pool {:?} | {} / {} | block {}",
                            pair.symbol, venue.name, pool, reserve0, reserve1, block_number
                        );
                    }
                    Err(e) => {
                        debug!(
                            "Reserve snapshot failed for {} on {}: {}",
                            pair.symbol, venue.name, e
                        );
                    }
                }
            }
        }
    }
}

//! Core data structures for the arbitrage engine
//!
//! Everything here is either immutable-after-startup shared state
//! (BotConfig, Venue, PoolRegistry, ContractTargets) or a transient value
//! that lives for a single detection pass (PendingSwap, Quote,
//! Opportunity, SignedBundle).
//!
//! Author: AI-Generated
//! Created: 2026-02-03

use ethers::types::{Address, Bytes, H256, U256};
use std::collections::HashMap;
use std::fmt;

/// One AMM deployment under comparison: a V2-style pair factory plus the
/// router that trades against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Venue {
    pub name: String,
    pub factory: Address,
    pub router: Address,
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// The two venues whose pools are compared for every decoded swap.
/// Populated once at startup; detection passes only ever read it.
#[derive(Debug, Clone)]
pub struct PoolRegistry {
    pub venue_a: Venue,
    pub venue_b: Venue,
}

impl PoolRegistry {
    pub fn new(venue_a: Venue, venue_b: Venue) -> Self {
        Self { venue_a, venue_b }
    }
}

/// Monitored contract addresses (routers) mapped to human labels.
/// Filters the pending-transaction firehose down to the relevant subset.
/// Populated once at startup; never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct ContractTargets {
    map: HashMap<Address, String>,
}

impl ContractTargets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, address: Address, label: impl Into<String>) {
        self.map.insert(address, label.into());
    }

    /// Label for a monitored address, or None if the address is not watched.
    pub fn label_of(&self, address: &Address) -> Option<&str> {
        self.map.get(address).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Address, &String)> {
        self.map.iter()
    }
}

/// A token pair whose reserves get snapshotted every block (optional
/// observability feature; pairs come from TRACKED_PAIRS).
#[derive(Debug, Clone)]
pub struct TrackedPair {
    pub token0: Address,
    pub token1: Address,
    pub symbol: String,
}

/// Decoded swap calldata, independent of the carrying transaction.
#[derive(Debug, Clone)]
pub struct DecodedSwap {
    /// Function name from the selector table (e.g. "swapExactTokensForTokens")
    pub function_name: &'static str,
    /// First address of the swap path
    pub token_in: Address,
    /// Last address of the swap path. Intermediate hops are dropped:
    /// quoting only ever compares the path endpoints.
    pub token_out: Address,
    /// Input amount in raw token units
    pub amount_in: U256,
    /// Minimum output amount (the sender's slippage guard)
    pub amount_out_min: U256,
}

/// A decoded pending swap plus the transaction metadata a detection pass
/// needs. Exists only for the duration of one pass.
#[derive(Debug, Clone)]
pub struct PendingSwap {
    pub tx_hash: H256,
    /// Router the swap was addressed to
    pub router: Address,
    pub router_label: String,
    pub swap: DecodedSwap,
}

/// A computed output amount for one venue's pool.
/// Only comparable to another Quote for the identical token pair and
/// identical input amount.
#[derive(Debug, Clone)]
pub struct Quote {
    pub venue: Venue,
    /// Concrete pair contract the reserves were read from
    pub pool: Address,
    pub amount_out: U256,
}

/// A detected profitable spread. Triggers exactly one execution attempt.
#[derive(Debug, Clone)]
pub struct Opportunity {
    pub token_in: Address,
    pub token_out: Address,
    pub amount_in: U256,
    pub buy: Venue,
    pub sell: Venue,
    pub buy_amount_out: U256,
    pub sell_amount_out: U256,
    /// sell_amount_out - buy_amount_out, guaranteed > 0
    pub profit: U256,
}

/// A fully signed transaction ready for relay submission, valid for
/// exactly one block window. Discarded after the relay call returns.
#[derive(Debug, Clone)]
pub struct SignedBundle {
    /// RLP encoding of the signed transaction
    pub raw_tx: Bytes,
    pub tx_hash: H256,
    /// Block the bundle targets (head + 1 at build time)
    pub target_block: u64,
}

/// Bot configuration, loaded once from the environment at startup.
#[derive(Debug, Clone)]
pub struct BotConfig {
    // Network
    pub rpc_url: String,
    pub private_key: String,

    // Flash-loan executor contract (the on-chain half of the arbitrage)
    pub executor_address: Address,

    // Relay
    pub relay_url: String,
    pub relay_timeout_secs: u64,

    // Venues under comparison
    pub uniswap_factory: Address,
    pub uniswap_router: Address,
    pub sushiswap_factory: Address,
    pub sushiswap_router: Address,

    // Monitored routers: (address, label)
    pub target_routers: Vec<(Address, String)>,

    // Execution policy
    pub min_profit_wei: U256,
    pub gas_limit: u64,
    pub live_mode: bool,

    // Concurrency / resilience
    pub max_inflight_tasks: usize,
    pub reconnect_delay_secs: u64,

    // Block-scanning variant
    pub block_scan_enabled: bool,
    /// Pairs whose reserves are logged at every new block height
    pub tracked_pairs: Vec<TrackedPair>,

    // Downstream observation records (JSONL); None = log-only sink
    pub observations_dir: Option<String>,
}

impl BotConfig {
    /// The two venues as a PoolRegistry. Venue A is always Uniswap,
    /// venue B always SushiSwap; the detector's orientation depends on
    /// this ordering staying stable.
    pub fn registry(&self) -> PoolRegistry {
        PoolRegistry::new(
            Venue {
                name: "UniswapV2".to_string(),
                factory: self.uniswap_factory,
                router: self.uniswap_router,
            },
            Venue {
                name: "SushiSwap".to_string(),
                factory: self.sushiswap_factory,
                router: self.sushiswap_router,
            },
        )
    }

    /// Monitored router set as a lookup table.
    pub fn targets(&self) -> ContractTargets {
        let mut targets = ContractTargets::new();
        for (address, label) in &self.target_routers {
            targets.insert(*address, label.clone());
        }
        targets
    }
}

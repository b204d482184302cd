//! Configuration management
//!
//! Loads BotConfig from environment variables (.env supported).
//! Required variables fail startup with context; tunables fall back to
//! mainnet defaults matching the deployed contracts the bot watches.
//!
//! Author: AI-Generated
//! Created: 2026-02-03

use crate::types::{BotConfig, TrackedPair};
use anyhow::{bail, Context, Result};
use ethers::types::{Address, U256};
use std::str::FromStr;

// Mainnet deployments watched by default.
const UNISWAP_V2_ROUTER: &str = "0x7a250d5630B4cF539739dF2C5dAcb4c659F2488D";
const SUSHISWAP_ROUTER: &str = "0xd9e1cE17f2641f24aE83637ab66a2cca9C378B9F";
const UNISWAP_V2_FACTORY: &str = "0x5C69bEe701ef814a2B6a3EDD4B1652CB9cc5aA6f";
const SUSHISWAP_FACTORY: &str = "0xC0AEe478e3658e2610c5F7A4A2E1777cE9e4f2Ac";
const FLASHBOTS_RELAY: &str = "https://relay.flashbots.net";

/// Load configuration from a specific env file (e.g. ".env").
pub fn load_config_from_file(env_file: &str) -> Result<BotConfig> {
    dotenv::from_filename(env_file).ok();
    load_config()
}

/// Load configuration from the process environment (plus .env if present).
pub fn load_config() -> Result<BotConfig> {
    dotenv::dotenv().ok();

    let rpc_url = std::env::var("RPC_URL").context("RPC_URL not set")?;
    let private_key = std::env::var("PRIVATE_KEY").context("PRIVATE_KEY not set")?;
    let executor_address = parse_address_var("EXECUTOR_ADDRESS")
        .context("EXECUTOR_ADDRESS not set or invalid")?;

    let uniswap_router = parse_address_or("UNISWAP_ROUTER", UNISWAP_V2_ROUTER)?;
    let sushiswap_router = parse_address_or("SUSHISWAP_ROUTER", SUSHISWAP_ROUTER)?;
    let uniswap_factory = parse_address_or("UNISWAP_FACTORY", UNISWAP_V2_FACTORY)?;
    let sushiswap_factory = parse_address_or("SUSHISWAP_FACTORY", SUSHISWAP_FACTORY)?;

    // Monitored routers: "0xaddr:Label,0xaddr:Label". Defaults to the two
    // venue routers so every decodable swap on either venue is considered.
    let target_routers = match std::env::var("TARGET_ROUTERS") {
        Ok(raw) => parse_target_routers(&raw)?,
        Err(_) => vec![
            (uniswap_router, "Uniswap V2 Router".to_string()),
            (sushiswap_router, "SushiSwap Router".to_string()),
        ],
    };

    let min_profit_wei = match std::env::var("MIN_PROFIT_WEI") {
        Ok(raw) => U256::from_dec_str(raw.trim())
            .with_context(|| format!("MIN_PROFIT_WEI not a decimal integer: {}", raw))?,
        Err(_) => U256::zero(),
    };

    Ok(BotConfig {
        rpc_url,
        private_key,
        executor_address,
        relay_url: env_or_string("RELAY_URL", FLASHBOTS_RELAY),
        relay_timeout_secs: env_or("RELAY_TIMEOUT_SECS", 5u64)?,
        uniswap_factory,
        uniswap_router,
        sushiswap_factory,
        sushiswap_router,
        target_routers,
        min_profit_wei,
        gas_limit: env_or("GAS_LIMIT", 1_000_000u64)?,
        live_mode: env_or("LIVE_MODE", false)?,
        max_inflight_tasks: env_or("MAX_INFLIGHT_TASKS", 64usize)?,
        reconnect_delay_secs: env_or("RECONNECT_DELAY_SECS", 5u64)?,
        block_scan_enabled: env_or("BLOCK_SCAN_ENABLED", true)?,
        tracked_pairs: match std::env::var("TRACKED_PAIRS") {
            Ok(raw) => parse_tracked_pairs(&raw)?,
            Err(_) => Vec::new(),
        },
        observations_dir: std::env::var("OBSERVATIONS_DIR").ok(),
    })
}

fn parse_address_var(var: &str) -> Result<Address> {
    let raw = std::env::var(var).with_context(|| format!("{} not set", var))?;
    Address::from_str(raw.trim()).with_context(|| format!("{} is not an address: {}", var, raw))
}

fn parse_address_or(var: &str, default: &str) -> Result<Address> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    Address::from_str(raw.trim()).with_context(|| format!("{} is not an address: {}", var, raw))
}

fn env_or_string(var: &str, default: &str) -> String {
    std::env::var(var).unwrap_or_else(|_| default.to_string())
}

fn env_or<T: FromStr>(var: &str, default: T) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{} invalid: {}", var, e)),
        Err(_) => Ok(default),
    }
}

/// Parse "0xaddr:Label,0xaddr:Label" into the monitored-router list.
fn parse_target_routers(raw: &str) -> Result<Vec<(Address, String)>> {
    let mut routers = Vec::new();
    for entry in raw.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let (addr, label) = match entry.split_once(':') {
            Some(parts) => parts,
            None => bail!("TARGET_ROUTERS entry missing ':' separator: {}", entry),
        };
        let address = Address::from_str(addr.trim())
            .with_context(|| format!("TARGET_ROUTERS entry has invalid address: {}", entry))?;
        routers.push((address, label.trim().to_string()));
    }
    if routers.is_empty() {
        bail!("TARGET_ROUTERS set but contains no entries");
    }
    Ok(routers)
}

/// Parse "0xtoken0:0xtoken1:SYMBOL,..." into the per-block snapshot list.
fn parse_tracked_pairs(raw: &str) -> Result<Vec<TrackedPair>> {
    let mut pairs = Vec::new();
    for entry in raw.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let parts: Vec<&str> = entry.splitn(3, ':').collect();
        if parts.len() != 3 {
            bail!("TRACKED_PAIRS entry must be token0:token1:symbol: {}", entry);
        }
        pairs.push(TrackedPair {
            token0: Address::from_str(parts[0].trim())
                .with_context(|| format!("TRACKED_PAIRS token0 invalid: {}", entry))?,
            token1: Address::from_str(parts[1].trim())
                .with_context(|| format!("TRACKED_PAIRS token1 invalid: {}", entry))?,
            symbol: parts[2].trim().to_string(),
        });
    }
    Ok(pairs)
}

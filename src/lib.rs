//! Mempool-Driven DEX Arbitrage Bot Library
//!
//! Watches the pending-transaction pool and new blocks, quotes decoded
//! swaps against two V2-style AMM deployments, and captures profitable
//! spreads through a flash-loan executor contract submitted privately
//! via a block-builder relay.
//!
//! Author: AI-Generated
//! Created: 2026-02-03

pub mod arbitrage;
pub mod config;
pub mod contracts;
pub mod engine;
pub mod errors;
pub mod mempool;
pub mod observations;
pub mod pool;
pub mod types;

// Re-export commonly used types
pub use config::load_config;
pub use engine::Engine;
pub use errors::{BuildError, DecodeError, QuoteError, SubmissionError};
pub use types::{BotConfig, Opportunity, PendingSwap, Quote, SignedBundle, Venue};

//! Pool module
//!
//! Constant-product quoting against V2-style liquidity pools: pure math
//! plus the factory/pair RPC reads that feed it.
//!
//! Author: AI-Generated
//! Created: 2026-02-03

pub mod math;
pub mod quoter;

pub use quoter::PoolQuoter;

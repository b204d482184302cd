//! Arbitrage Module
//!
//! Opportunity detection and the execution pipeline: quote comparison,
//! nonce allocation, transaction building/signing, and private relay
//! submission.
//!
//! Author: AI-Generated
//! Created: 2026-02-03
//! Modified: 2026-02-04 - nonce allocator + relay client

pub mod detector;
pub mod executor;
pub mod nonce;
pub mod relay;

pub use detector::OpportunityDetector;
pub use executor::BundleBuilder;
pub use nonce::NonceAllocator;
pub use relay::{RelayClient, SubmitOutcome};

//! Centralized Error Taxonomy
//!
//! One error enum per pipeline stage. Every variant here is recoverable:
//! a decode error drops one message, a quote/build/submission error aborts
//! one detection pass. Nothing in this module is fatal to the process.
//! Fatal conditions (missing config, unreachable node) exist only at
//! startup and are reported through anyhow in main.
//!
//! Author: AI-Generated
//! Created: 2026-02-03

use thiserror::Error;

/// Calldata decoding failures. Always recoverable; the message is dropped.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Payload shorter than the 4-byte function selector.
    #[error("calldata shorter than 4-byte selector ({0} bytes)")]
    ShortCalldata(usize),

    /// Selector not in the known-function table. The common case for
    /// mempool noise; callers log this at trace level and move on.
    #[error("unrecognized selector {0}")]
    UnknownSelector(String),

    /// Selector matched but the argument encoding did not.
    #[error("abi decode failed: {0}")]
    Abi(#[from] ethers::abi::Error),

    /// Swap path must contain at least token-in and token-out.
    #[error("swap path has fewer than two addresses")]
    MalformedPath,
}

/// Quote computation failures. Recoverable; aborts the current pass.
#[derive(Debug, Error)]
pub enum QuoteError {
    /// The factory returned the zero address for this token pair.
    #[error("no pool for pair on {venue}")]
    PairNotFound { venue: String },

    /// One or both reserves are zero; the constant-product formula is
    /// undefined (division by zero) for an empty pool.
    #[error("zero reserves in pool {pool:?} on {venue}")]
    InsufficientLiquidity {
        venue: String,
        pool: ethers::types::Address,
    },

    /// The underlying eth_call failed (transport, revert, bad response).
    #[error("node call failed: {0}")]
    Node(String),
}

/// Transaction assembly failures. Recoverable; aborts the execution attempt.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("nonce acquisition failed: {0}")]
    Nonce(String),

    #[error("calldata encoding failed for {0}")]
    Encode(String),

    #[error("gas price fetch failed: {0}")]
    GasPrice(String),

    #[error("signing failed: {0}")]
    Sign(String),
}

/// Relay submission failures. Recoverable; logged, never retried (by the
/// time a retry would land, the target block has been produced).
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// HTTP transport failure or client timeout.
    #[error("relay transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Relay answered but the body was not a JSON object.
    #[error("relay returned unparseable body: {0}")]
    BadResponse(String),
}

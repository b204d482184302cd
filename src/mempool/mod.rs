//! Mempool Module
//!
//! The engine's inbound edge: calldata decoding plus the subscription
//! loop that turns node notifications into detection passes.
//!
//! Architecture:
//!     decoder.rs — raw calldata → DecodedSwap against the selector table
//!     watcher.rs — WS subscriptions, dispatch, reconnect loop
//!
//! Author: AI-Generated
//! Created: 2026-02-03
//! Modified: 2026-02-04

pub mod decoder;
pub mod watcher;

pub use watcher::run_event_source;

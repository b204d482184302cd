//! Downstream Observation Records
//!
//! Every monitored transaction the engine touches is summarized into an
//! ObservationRecord and handed to an ObservationSink for the external
//! ingest pipeline. Publication is strictly fire-and-forget: a sink
//! failure is logged and the detection pass carries on. The engine never
//! depends on a record landing anywhere.
//!
//! Author: AI-Generated
//! Created: 2026-02-04

use anyhow::{Context, Result};
use chrono::Utc;
use ethers::types::{Log, Transaction, TransactionReceipt};
use ethers::utils::hex;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{info, warn};

/// Structured record of one monitored transaction: identity, parties,
/// gas terms, calldata, and (for block-sourced observations) the
/// receipt's emitted log entries.
#[derive(Debug, Clone, Serialize)]
pub struct ObservationRecord {
    pub tx_hash: String,
    pub from: String,
    pub to: String,
    pub target_label: String,
    pub nonce: u64,
    pub gas_price_wei: String,
    pub gas_limit: u64,
    pub value_wei: String,
    pub input_data: String,
    pub observed_at: i64,
    /// None while the transaction is still pending
    pub block_number: Option<u64>,
    /// Present only for block-sourced observations with a receipt
    pub logs: Option<Vec<Log>>,
}

impl ObservationRecord {
    /// Record for a transaction seen in the pending pool.
    pub fn from_pending(tx: &Transaction, label: &str) -> Self {
        Self::build(tx, label, None, None)
    }

    /// Record for a transaction found in a mined block, enriched with
    /// its receipt when one was available.
    pub fn from_mined(
        tx: &Transaction,
        label: &str,
        block_number: u64,
        receipt: Option<&TransactionReceipt>,
    ) -> Self {
        Self::build(
            tx,
            label,
            Some(block_number),
            receipt.map(|r| r.logs.clone()),
        )
    }

    fn build(
        tx: &Transaction,
        label: &str,
        block_number: Option<u64>,
        logs: Option<Vec<Log>>,
    ) -> Self {
        Self {
            tx_hash: format!("{:?}", tx.hash),
            from: format!("{:?}", tx.from),
            to: tx.to.map(|a| format!("{:?}", a)).unwrap_or_default(),
            target_label: label.to_string(),
            nonce: tx.nonce.as_u64(),
            gas_price_wei: tx
                .gas_price
                .map(|p| p.to_string())
                .unwrap_or_default(),
            gas_limit: tx.gas.as_u64(),
            value_wei: tx.value.to_string(),
            input_data: format!("0x{}", hex::encode(&tx.input)),
            observed_at: Utc::now().timestamp(),
            block_number,
            logs,
        }
    }
}

/// Hand-off point to the external ingest pipeline.
pub trait ObservationSink: Send + Sync {
    fn publish(&self, record: &ObservationRecord);
}

/// Sink that only emits a structured log line. Default when no
/// observations directory is configured.
pub struct LogSink;

impl ObservationSink for LogSink {
    fn publish(&self, record: &ObservationRecord) {
        match serde_json::to_string(record) {
            Ok(json) => info!(target: "observations", "{}", json),
            Err(e) => warn!("Observation record serialization failed: {}", e),
        }
    }
}

/// Append-only JSONL sink: one record per line, date-stamped files.
pub struct JsonlSink {
    path: PathBuf,
    file: Mutex<std::fs::File>,
}

impl JsonlSink {
    pub fn open(dir: &str) -> Result<Self> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create observations dir: {}", dir))?;

        let date = Utc::now().format("%Y%m%d");
        let path = PathBuf::from(dir).join(format!("observations_{}.jsonl", date));
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open observations file: {:?}", path))?;

        info!("Observation records: {:?}", path);
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }
}

impl ObservationSink for JsonlSink {
    fn publish(&self, record: &ObservationRecord) {
        let json = match serde_json::to_string(record) {
            Ok(json) => json,
            Err(e) => {
                warn!("Observation record serialization failed: {}", e);
                return;
            }
        };

        let mut file = match self.file.lock() {
            Ok(file) => file,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(e) = writeln!(file, "{}", json) {
            warn!("Observation write to {:?} failed: {}", self.path, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::types::{Address, Bytes, H256, U256};

    fn test_tx() -> Transaction {
        Transaction {
            hash: H256::repeat_byte(0xab),
            from: Address::repeat_byte(0x01),
            to: Some(Address::repeat_byte(0x02)),
            nonce: U256::from(5),
            gas: U256::from(21_000u64),
            gas_price: Some(U256::from(30_000_000_000u64)),
            value: U256::from(12u64),
            input: Bytes::from(vec![0x38, 0xed, 0x17, 0x39]),
            ..Default::default()
        }
    }

    #[test]
    fn test_pending_record_fields() {
        let record = ObservationRecord::from_pending(&test_tx(), "Uniswap V2 Router");

        assert_eq!(record.target_label, "Uniswap V2 Router");
        assert_eq!(record.nonce, 5);
        assert_eq!(record.gas_price_wei, "30000000000");
        assert_eq!(record.input_data, "0x38ed1739");
        assert!(record.block_number.is_none());
        assert!(record.logs.is_none());
    }

    #[test]
    fn test_mined_record_carries_receipt_logs() {
        let receipt = TransactionReceipt {
            logs: vec![Log::default(), Log::default()],
            ..Default::default()
        };
        let record =
            ObservationRecord::from_mined(&test_tx(), "SushiSwap Router", 18_000_000, Some(&receipt));

        assert_eq!(record.block_number, Some(18_000_000));
        assert_eq!(record.logs.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn test_record_serializes_to_json() {
        let record = ObservationRecord::from_pending(&test_tx(), "Uniswap V2 Router");
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"target_label\":\"Uniswap V2 Router\""));
    }
}

//! Relay Submission
//!
//! Packages a signed transaction into a single-transaction bundle and
//! POSTs it to the block-builder relay as a JSON-RPC eth_sendBundle
//! call. The request carries a bounded timeout; on transport failure the
//! attempt is abandoned, never retried, because the target block will
//! have been produced before a retry could land.
//!
//! A relay-level rejection (an `error` field in an HTTP-200 body) is an
//! expected outcome, not a system fault: low-value bundles get refused
//! all the time. It is surfaced as a non-fatal outcome for logging.
//!
//! Author: AI-Generated
//! Created: 2026-02-04

use crate::errors::SubmissionError;
use crate::types::SignedBundle;
use anyhow::{Context, Result};
use ethers::utils::hex;
use serde_json::{json, Value};
use std::time::Duration;

/// Outcome of a bundle submission that reached the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted,
    /// The relay answered with an application-level error.
    Rejected(String),
}

pub struct RelayClient {
    http: reqwest::Client,
    url: String,
}

impl RelayClient {
    pub fn new(url: String, timeout_secs: u64) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("relay HTTP client construction failed")?;
        Ok(Self { http, url })
    }

    /// Submit a bundle for its target block.
    pub async fn submit(&self, bundle: &SignedBundle) -> Result<SubmitOutcome, SubmissionError> {
        let payload = bundle_payload(bundle);

        let response = self
            .http
            .post(&self.url)
            .header("Accept", "application/json")
            .json(&payload)
            .send()
            .await?;

        let body = response.text().await?;
        let body: Value = serde_json::from_str(&body)
            .map_err(|e| SubmissionError::BadResponse(format!("{}: {}", e, body)))?;

        Ok(parse_relay_response(&body))
    }
}

/// eth_sendBundle request body: one raw transaction, one target block.
fn bundle_payload(bundle: &SignedBundle) -> Value {
    let raw_tx_hex = format!("0x{}", hex::encode(bundle.raw_tx.as_ref()));
    json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "eth_sendBundle",
        "params": [{
            "txs": [raw_tx_hex],
            "blockNumber": format!("{:#x}", bundle.target_block),
        }],
    })
}

/// Application-level errors live in the body, independent of HTTP status.
fn parse_relay_response(body: &Value) -> SubmitOutcome {
    match body.get("error").filter(|e| !e.is_null()) {
        Some(error) => {
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .or_else(|| error.as_str())
                .unwrap_or("unspecified relay error")
                .to_string();
            SubmitOutcome::Rejected(message)
        }
        None => SubmitOutcome::Accepted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::types::{Bytes, H256};

    fn test_bundle() -> SignedBundle {
        SignedBundle {
            raw_tx: Bytes::from(vec![0xf8, 0x6b, 0x01, 0x02]),
            tx_hash: H256::repeat_byte(0xaa),
            target_block: 18_500_001,
        }
    }

    #[test]
    fn test_payload_shape() {
        let payload = bundle_payload(&test_bundle());

        assert_eq!(payload["method"], "eth_sendBundle");
        assert_eq!(payload["params"][0]["txs"][0], "0xf86b0102");
        // 18_500_001 = 0x11a49a1
        assert_eq!(payload["params"][0]["blockNumber"], "0x11a49a1");
    }

    #[test]
    fn test_relay_rejection_is_nonfatal_outcome() {
        let body: Value =
            serde_json::from_str(r#"{"error":{"message":"bundle too low"}}"#).unwrap();
        assert_eq!(
            parse_relay_response(&body),
            SubmitOutcome::Rejected("bundle too low".to_string())
        );
    }

    #[test]
    fn test_string_error_body() {
        let body: Value = serde_json::from_str(r#"{"error":"nope"}"#).unwrap();
        assert_eq!(
            parse_relay_response(&body),
            SubmitOutcome::Rejected("nope".to_string())
        );
    }

    #[test]
    fn test_success_body_accepted() {
        let body: Value =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":1,"result":{"bundleHash":"0xabc"}}"#)
                .unwrap();
        assert_eq!(parse_relay_response(&body), SubmitOutcome::Accepted);
    }

    #[test]
    fn test_null_error_accepted() {
        let body: Value = serde_json::from_str(r#"{"result":"0x1","error":null}"#).unwrap();
        assert_eq!(parse_relay_response(&body), SubmitOutcome::Accepted);
    }

    #[test]
    fn test_error_without_message() {
        let body: Value = serde_json::from_str(r#"{"error":{"code":-32000}}"#).unwrap();
        assert_eq!(
            parse_relay_response(&body),
            SubmitOutcome::Rejected("unspecified relay error".to_string())
        );
    }
}

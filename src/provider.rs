//! JSON-RPC provider client
//!
//! A thin `eth_getLogs` client over reqwest. Each audit talks to exactly two
//! of these; there is no pooling, failover, or retry. A request gets one
//! attempt within a fixed timeout and any failure aborts the whole run.

use crate::canonical::LogEntry;
use crate::config::ProviderConfig;
use crate::error::{ProviderError, Result};
use alloy::rpc::types::{Filter, Log};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// JSON-RPC 2.0 response envelope
#[derive(Debug, Deserialize)]
struct JsonRpcResponse<T> {
    #[serde(default)]
    result: Option<T>,
    #[serde(default)]
    error: Option<JsonRpcErrorObject>,
}

/// RPC-level error object
#[derive(Debug, Deserialize)]
struct JsonRpcErrorObject {
    code: i64,
    message: String,
}

/// Client for one provider endpoint
pub struct ProviderClient {
    /// HTTP client with the request timeout baked in
    http: reqwest::Client,
    /// Endpoint configuration
    config: ProviderConfig,
    /// Timeout, kept for error reporting
    timeout_secs: u64,
}

impl ProviderClient {
    /// Create a client for an endpoint
    pub fn new(config: ProviderConfig, timeout_secs: u64) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ProviderError::ConnectionFailed {
                url: config.url.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            http,
            config,
            timeout_secs,
        })
    }

    /// Endpoint URL
    pub fn url(&self) -> &str {
        &self.config.url
    }

    /// Fetch the chain id (`eth_chainId`)
    pub async fn chain_id(&self) -> Result<u64> {
        let hex: String = self.request("eth_chainId", json!([])).await?;
        self.parse_quantity(&hex)
    }

    /// Fetch the current head block number (`eth_blockNumber`)
    pub async fn block_number(&self) -> Result<u64> {
        let hex: String = self.request("eth_blockNumber", json!([])).await?;
        self.parse_quantity(&hex)
    }

    /// Fetch all logs matching `base_filter` over `[from, to]`.
    ///
    /// When the span exceeds the provider's configured `max_block_range` the
    /// request is split into sequential sub-queries issued in ascending block
    /// order and concatenated; any sub-query failure fails the whole fetch,
    /// so callers never see partial results. Every returned log is validated
    /// into a [`LogEntry`] before it is handed back.
    pub async fn get_logs(
        &self,
        base_filter: &Filter,
        from: u64,
        to: u64,
    ) -> Result<Vec<LogEntry>> {
        let chunks = split_range(from, to, self.config.max_block_range);
        if chunks.len() > 1 {
            tracing::debug!(
                url = %self.config.url,
                sub_queries = chunks.len(),
                "range exceeds provider limit, splitting"
            );
        }

        let mut entries = Vec::new();
        for (sub_from, sub_to) in chunks {
            let filter = base_filter.clone().from_block(sub_from).to_block(sub_to);
            let logs: Vec<Log> = self.request("eth_getLogs", json!([filter])).await?;

            tracing::debug!(
                url = %self.config.url,
                from = sub_from,
                to = sub_to,
                count = logs.len(),
                "fetched logs"
            );

            for log in &logs {
                entries.push(LogEntry::from_rpc_log(log, &self.config.url)?);
            }
        }

        Ok(entries)
    }

    /// Issue one JSON-RPC call and unwrap the envelope
    async fn request<T: DeserializeOwned + Default>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<T> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let response = self
            .http
            .post(&self.config.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.classify_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::HttpStatus {
                url: self.config.url.clone(),
                status: status.as_u16(),
            }
            .into());
        }

        let envelope: JsonRpcResponse<T> =
            response
                .json()
                .await
                .map_err(|e| ProviderError::InvalidResponse {
                    url: self.config.url.clone(),
                    reason: format!("malformed JSON-RPC response: {}", e),
                })?;

        if let Some(err) = envelope.error {
            return Err(ProviderError::Rpc {
                url: self.config.url.clone(),
                code: err.code,
                message: err.message,
            }
            .into());
        }

        envelope.result.ok_or_else(|| {
            ProviderError::InvalidResponse {
                url: self.config.url.clone(),
                reason: "response carries neither result nor error".to_string(),
            }
            .into()
        })
    }

    fn classify_transport_error(&self, e: reqwest::Error) -> crate::error::Error {
        if e.is_timeout() {
            ProviderError::Timeout {
                url: self.config.url.clone(),
                timeout_secs: self.timeout_secs,
            }
            .into()
        } else if e.is_connect() {
            ProviderError::ConnectionFailed {
                url: self.config.url.clone(),
                reason: e.to_string(),
            }
            .into()
        } else {
            ProviderError::Http(e).into()
        }
    }

    /// Parse a hex quantity string ("0x12ab") returned by the node
    fn parse_quantity(&self, hex: &str) -> Result<u64> {
        let digits = hex.strip_prefix("0x").unwrap_or(hex);
        u64::from_str_radix(digits, 16).map_err(|_| {
            ProviderError::InvalidResponse {
                url: self.config.url.clone(),
                reason: format!("invalid hex quantity: {}", hex),
            }
            .into()
        })
    }
}

/// Split `[from, to]` into inclusive sub-ranges of at most `max_range` blocks.
///
/// `max_range == 0` means the provider imposes no limit.
fn split_range(from: u64, to: u64, max_range: u64) -> Vec<(u64, u64)> {
    if max_range == 0 || to.saturating_sub(from) < max_range {
        return vec![(from, to)];
    }

    let mut chunks = Vec::new();
    let mut current = from;
    while current <= to {
        let chunk_end = current.saturating_add(max_range - 1).min(to);
        chunks.push((current, chunk_end));
        current = chunk_end + 1;
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_range() {
        assert_eq!(
            split_range(0, 100, 30),
            vec![(0, 29), (30, 59), (60, 89), (90, 100)]
        );
        assert_eq!(split_range(0, 10, 100), vec![(0, 10)]);
        assert_eq!(split_range(50, 50, 10), vec![(50, 50)]);
        // Zero means unlimited
        assert_eq!(split_range(0, 1_000_000, 0), vec![(0, 1_000_000)]);
        // Exact multiple still covers the closing block
        assert_eq!(split_range(0, 19, 10), vec![(0, 9), (10, 19)]);
    }

    #[test]
    fn test_split_range_inverted_input() {
        // An inverted span must stay a single chunk, not underflow
        assert_eq!(split_range(200, 100, 10_000), vec![(200, 100)]);
        assert_eq!(split_range(200, 100, 0), vec![(200, 100)]);
    }

    #[test]
    fn test_envelope_result() {
        let raw = r#"{"jsonrpc":"2.0","id":1,"result":"0x1"}"#;
        let envelope: JsonRpcResponse<String> = serde_json::from_str(raw).unwrap();
        assert_eq!(envelope.result.as_deref(), Some("0x1"));
        assert!(envelope.error.is_none());
    }

    #[test]
    fn test_envelope_error() {
        let raw = r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32602,"message":"invalid params"}}"#;
        let envelope: JsonRpcResponse<String> = serde_json::from_str(raw).unwrap();
        assert!(envelope.result.is_none());
        let err = envelope.error.unwrap();
        assert_eq!(err.code, -32602);
        assert_eq!(err.message, "invalid params");
    }

    #[test]
    fn test_parse_quantity() {
        let client = ProviderClient::new(
            ProviderConfig::new("https://eth.llamarpc.com").unwrap(),
            20,
        )
        .unwrap();

        assert_eq!(client.parse_quantity("0x1").unwrap(), 1);
        assert_eq!(client.parse_quantity("0x112a880").unwrap(), 18_000_000);
        assert!(client.parse_quantity("0xzz").is_err());
        assert!(client.parse_quantity("").is_err());
    }

    #[test]
    fn test_get_logs_response_schema() {
        // A representative eth_getLogs result entry must deserialize into the
        // alloy Log schema and validate into a LogEntry.
        let raw = serde_json::json!([{
            "address": "0xA0B86991C6218B36C1D19D4A2E9EB0CE3606EB48",
            "topics": [
                "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef",
                "0x00000000000000000000000099c9fc46f92e8a1c0dec1b1747d010903e884be1"
            ],
            "data": "0x00000000000000000000000000000000000000000000000000000000000003e8",
            "blockNumber": "0x112a880",
            "transactionHash": "0x8a7fc50330533cd0440b6dd6fa3e181a29ca4a346cf71dcb3e9b79ed6e8f8b8a",
            "transactionIndex": "0x3",
            "blockHash": "0x95b198e154acbfc64109dfd22d8224fe927fd8dfdedfae01587674482ba4baf3",
            "logIndex": "0x7",
            "removed": false
        }]);

        let logs: Vec<Log> = serde_json::from_value(raw).unwrap();
        let entry = LogEntry::from_rpc_log(&logs[0], "http://rpc-a").unwrap();

        assert_eq!(entry.block_number, 18_000_000);
        assert_eq!(entry.transaction_index, 3);
        assert_eq!(entry.log_index, 7);
        assert_eq!(entry.topics.len(), 2);
        // Mixed-case address hex normalizes to the same 20 bytes
        assert_eq!(
            format!("{:#x}", entry.address),
            "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48"
        );
    }
}

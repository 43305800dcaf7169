//! Audit configuration
//!
//! All inputs for one audit run live in an explicit [`AuditConfig`] passed
//! into the pipeline; there is no process-wide mutable state.

mod file;

pub use file::{ConfigFile, Settings};

use crate::error::{ConfigError, Result};
use alloy::primitives::{Address, B256};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Default timeout for each provider request
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Default per-request block span before a range is split into sub-queries
pub const DEFAULT_MAX_BLOCK_RANGE: u64 = 10_000;

/// End of the audited block range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockNumber {
    /// Explicit block number
    Number(u64),
    /// Chain head at fetch time, resolved via provider A
    Latest,
}

impl FromStr for BlockNumber {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("latest") {
            return Ok(Self::Latest);
        }
        s.parse::<u64>()
            .map(Self::Number)
            .map_err(|_| ConfigError::InvalidBlockNumber(s.to_string()))
    }
}

/// One JSON-RPC provider under audit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// HTTP(S) endpoint URL
    pub url: String,
    /// Largest block span this provider accepts per eth_getLogs call;
    /// wider requests are split into sub-queries
    #[serde(default = "default_max_block_range")]
    pub max_block_range: u64,
}

fn default_max_block_range() -> u64 {
    DEFAULT_MAX_BLOCK_RANGE
}

impl ProviderConfig {
    /// Create a provider config with defaults, validating the URL
    pub fn new(url: impl Into<String>) -> std::result::Result<Self, ConfigError> {
        let url = url.into();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::InvalidUrl(url));
        }
        Ok(Self {
            url,
            max_block_range: DEFAULT_MAX_BLOCK_RANGE,
        })
    }

    /// Builder-style setter for max_block_range (0 = unlimited)
    pub fn with_max_block_range(mut self, range: u64) -> Self {
        self.max_block_range = range;
        self
    }
}

/// Full configuration for one audit run
#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// Provider A
    pub provider_a: ProviderConfig,
    /// Provider B
    pub provider_b: ProviderConfig,
    /// Contract address filter; empty means any address
    pub addresses: Vec<Address>,
    /// Event signature (topic0) filter; `None` means any event
    pub topic0: Option<B256>,
    /// Start block (inclusive)
    pub from_block: u64,
    /// End block (inclusive)
    pub to_block: BlockNumber,
    /// Per-request timeout
    pub timeout_secs: u64,
}

impl AuditConfig {
    /// Normalize the config, fixing what can be fixed and warning about
    /// suspicious inputs.
    ///
    /// An inverted numeric range is swapped rather than rejected, matching
    /// the tool's forgiving CLI contract. Identical provider URLs are legal
    /// but make the comparison meaningless, so they get a warning.
    pub fn normalize(&mut self) {
        if let BlockNumber::Number(to) = self.to_block {
            if self.from_block > to {
                tracing::warn!(
                    from = self.from_block,
                    to,
                    "from-block is above to-block, swapping range"
                );
                self.to_block = BlockNumber::Number(self.from_block);
                self.from_block = to;
            }
        }

        if self.provider_a.url == self.provider_b.url {
            tracing::warn!(
                url = %self.provider_a.url,
                "both providers use the same URL, comparison may be meaningless"
            );
        }
    }
}

/// Parse a 20-byte contract address
pub fn parse_address(s: &str) -> Result<Address> {
    Address::from_str(s).map_err(|_| ConfigError::InvalidAddress(s.to_string()).into())
}

/// Parse a 32-byte topic (event signature hash)
pub fn parse_topic(s: &str) -> Result<B256> {
    B256::from_str(s).map_err(|_| ConfigError::InvalidTopic(s.to_string()).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_number_parse() {
        assert_eq!("latest".parse::<BlockNumber>().unwrap(), BlockNumber::Latest);
        assert_eq!("LATEST".parse::<BlockNumber>().unwrap(), BlockNumber::Latest);
        assert_eq!(
            "18000000".parse::<BlockNumber>().unwrap(),
            BlockNumber::Number(18_000_000)
        );
        assert!("0x123".parse::<BlockNumber>().is_err());
        assert!("-5".parse::<BlockNumber>().is_err());
    }

    #[test]
    fn test_provider_config_rejects_bad_url() {
        assert!(ProviderConfig::new("https://eth.llamarpc.com").is_ok());
        assert!(ProviderConfig::new("ws://eth.llamarpc.com").is_err());
        assert!(ProviderConfig::new("not a url").is_err());
    }

    #[test]
    fn test_parse_address() {
        assert!(parse_address("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48").is_ok());
        assert!(parse_address("0x1234").is_err());
        assert!(parse_address("vitalik.eth").is_err());
    }

    #[test]
    fn test_parse_topic() {
        assert!(parse_topic(
            "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"
        )
        .is_ok());
        assert!(parse_topic("0xddf252ad").is_err());
    }

    #[test]
    fn test_normalize_swaps_inverted_range() {
        let mut config = AuditConfig {
            provider_a: ProviderConfig::new("https://a.example/rpc").unwrap(),
            provider_b: ProviderConfig::new("https://b.example/rpc").unwrap(),
            addresses: vec![],
            topic0: None,
            from_block: 200,
            to_block: BlockNumber::Number(100),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        };

        config.normalize();
        assert_eq!(config.from_block, 100);
        assert_eq!(config.to_block, BlockNumber::Number(200));
    }

    #[test]
    fn test_normalize_keeps_latest() {
        let mut config = AuditConfig {
            provider_a: ProviderConfig::new("https://a.example/rpc").unwrap(),
            provider_b: ProviderConfig::new("https://b.example/rpc").unwrap(),
            addresses: vec![],
            topic0: None,
            from_block: 200,
            to_block: BlockNumber::Latest,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        };

        config.normalize();
        assert_eq!(config.from_block, 200);
        assert_eq!(config.to_block, BlockNumber::Latest);
    }
}

//! eth-log-audit - Cross-provider eth_getLogs consistency auditor
//!
//! Fetches event logs for the same filter and block range from two JSON-RPC
//! endpoints, canonicalizes each log into a versioned byte encoding, folds
//! each provider's set into a Keccak-256 commitment, and diffs the sets to
//! pinpoint any divergence.
//!
//! # Example
//!
//! ```rust,no_run
//! use eth_log_audit::{AuditConfig, Auditor, BlockNumber, ProviderConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = AuditConfig {
//!         provider_a: ProviderConfig::new("https://mainnet.infura.io/v3/key")?,
//!         provider_b: ProviderConfig::new("https://eth.llamarpc.com")?,
//!         addresses: vec!["0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48".parse()?],
//!         topic0: None,
//!         from_block: 18_000_000,
//!         to_block: BlockNumber::Number(18_000_100),
//!         timeout_secs: 20,
//!     };
//!     config.normalize();
//!
//!     let report = Auditor::new(config)?.run().await?;
//!     println!("{}", report.render_human());
//!     assert!(report.consistent);
//!     Ok(())
//! }
//! ```

pub mod audit;
pub mod canonical;
pub mod commitment;
pub mod config;
pub mod diff;
pub mod error;
pub mod provider;
pub mod report;

// Re-exports for convenience
pub use audit::Auditor;
pub use canonical::{LogEntry, SCHEME_VERSION};
pub use commitment::{commit, empty_commitment};
pub use config::{
    parse_address, parse_topic, AuditConfig, BlockNumber, ConfigFile, ProviderConfig,
};
pub use diff::{DiffResult, Discrepancy, DiscrepancyKind, FieldDelta};
pub use error::{ConfigError, Error, ProviderError, Result};
pub use provider::ProviderClient;
pub use report::{AuditReport, ProviderReport};

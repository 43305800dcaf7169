//! Audit pipeline
//!
//! Wires the stages together: fetch both providers concurrently, canonicalize,
//! commit, diff, report. Stateless; one [`Auditor`] performs one run.

use crate::canonical::{LogEntry, SCHEME_VERSION};
use crate::commitment;
use crate::config::{AuditConfig, BlockNumber};
use crate::diff::DiffResult;
use crate::error::Result;
use crate::provider::ProviderClient;
use crate::report::{AuditReport, ProviderReport};
use alloy::rpc::types::Filter;
use std::time::Instant;

/// One-shot audit runner
pub struct Auditor {
    config: AuditConfig,
    client_a: ProviderClient,
    client_b: ProviderClient,
}

impl Auditor {
    /// Build the two provider clients from a validated config
    pub fn new(config: AuditConfig) -> Result<Self> {
        let client_a = ProviderClient::new(config.provider_a.clone(), config.timeout_secs)?;
        let client_b = ProviderClient::new(config.provider_b.clone(), config.timeout_secs)?;

        Ok(Self {
            config,
            client_a,
            client_b,
        })
    }

    /// Run the full audit.
    ///
    /// The two fetches share no state and run concurrently; a failure in
    /// either aborts the run before any commitment is computed. There is no
    /// partial-success mode.
    pub async fn run(&self) -> Result<AuditReport> {
        let start = Instant::now();

        let (chain_a, chain_b) =
            tokio::try_join!(self.client_a.chain_id(), self.client_b.chain_id())?;
        if chain_a != chain_b {
            tracing::warn!(
                chain_a,
                chain_b,
                "chain id mismatch between providers, logs are not comparable"
            );
        }

        let resolved = self.resolve_to_block().await?;
        let (from_block, to_block) = order_range(self.config.from_block, resolved);
        let filter = self.base_filter();

        tracing::info!(
            from = from_block,
            to = to_block,
            "fetching logs from both providers"
        );

        let (set_a, set_b) = tokio::try_join!(
            self.client_a.get_logs(&filter, from_block, to_block),
            self.client_b.get_logs(&filter, from_block, to_block),
        )?;

        let report = assemble_report(
            from_block,
            to_block,
            (self.client_a.url(), chain_a, set_a),
            (self.client_b.url(), chain_b, set_b),
            start.elapsed().as_millis() as u64,
        );

        Ok(report)
    }

    /// Resolve a symbolic `latest` end block via provider A
    async fn resolve_to_block(&self) -> Result<u64> {
        match self.config.to_block {
            BlockNumber::Number(n) => Ok(n),
            BlockNumber::Latest => self.client_a.block_number().await,
        }
    }

    /// Filter shared by both providers; block bounds are applied per request
    fn base_filter(&self) -> Filter {
        let mut filter = Filter::new();
        if !self.config.addresses.is_empty() {
            filter = filter.address(self.config.addresses.clone());
        }
        if let Some(topic0) = self.config.topic0 {
            filter = filter.event_signature(topic0);
        }
        filter
    }
}

/// Order the audited bounds after `latest` resolution.
///
/// `AuditConfig::normalize` already swaps numeric inverted ranges, but a
/// symbolic `latest` can resolve below the requested start block; swap here
/// too so the fetch never sees an inverted span.
fn order_range(from: u64, to: u64) -> (u64, u64) {
    if from > to {
        tracing::warn!(from, to, "from-block is above the resolved to-block, swapping range");
        (to, from)
    } else {
        (from, to)
    }
}

/// Pure tail of the pipeline: commit and diff two fetched log sets.
fn assemble_report(
    from_block: u64,
    to_block: u64,
    (url_a, chain_a, set_a): (&str, u64, Vec<LogEntry>),
    (url_b, chain_b, set_b): (&str, u64, Vec<LogEntry>),
    elapsed_ms: u64,
) -> AuditReport {
    let commitment_a = commitment::commit(&set_a);
    let commitment_b = commitment::commit(&set_b);
    let diff = DiffResult::compute(&set_a, &set_b);

    AuditReport {
        scheme_version: SCHEME_VERSION,
        from_block,
        to_block,
        provider_a: ProviderReport {
            url: url_a.to_string(),
            chain_id: chain_a,
            log_count: set_a.len(),
            commitment: commitment_a,
        },
        provider_b: ProviderReport {
            url: url_b.to_string(),
            chain_id: chain_b,
            log_count: set_b.len(),
            commitment: commitment_b,
        },
        consistent: commitment_a == commitment_b,
        diff,
        elapsed_ms,
    }
}

//! Audit report rendering
//!
//! Renders both commitments, the equality verdict, and the diff detail in a
//! stable human-readable or JSON form. Writes nothing itself; `main` owns
//! stdout.

use crate::canonical::SCHEME_VERSION;
use crate::diff::{DiffResult, DiscrepancyKind};
use crate::error::Result;
use alloy::primitives::B256;
use serde::Serialize;

/// Per-provider side of the report
#[derive(Debug, Clone, Serialize)]
pub struct ProviderReport {
    /// Endpoint URL
    pub url: String,
    /// Chain id the endpoint reported
    pub chain_id: u64,
    /// Number of logs returned
    pub log_count: usize,
    /// Keccak-256 commitment over the canonicalized log set
    pub commitment: B256,
}

/// Complete outcome of one audit run
#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    /// Canonicalization scheme tag; commitments from different schemes are
    /// never comparable
    pub scheme_version: &'static str,
    /// Audited range start (inclusive)
    pub from_block: u64,
    /// Audited range end (inclusive, resolved if `latest` was requested)
    pub to_block: u64,
    /// Provider A summary
    pub provider_a: ProviderReport,
    /// Provider B summary
    pub provider_b: ProviderReport,
    /// True when the two commitments are identical
    pub consistent: bool,
    /// Key-level divergence detail
    pub diff: DiffResult,
    /// Wall-clock fetch + hash time in milliseconds
    pub elapsed_ms: u64,
}

impl AuditReport {
    /// Machine-readable rendering
    pub fn render_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Human-readable rendering
    pub fn render_human(&self) -> String {
        let mut out = String::new();

        let push = |out: &mut String, line: String| {
            out.push_str(&line);
            out.push('\n');
        };

        push(&mut out, format!("Log Consistency Audit ({})", SCHEME_VERSION));
        push(&mut out, "─".repeat(60));
        push(
            &mut out,
            format!("Blocks:      [{}, {}]", self.from_block, self.to_block),
        );
        push(
            &mut out,
            format!(
                "Provider A:  {} (chain {}, {} logs)",
                self.provider_a.url, self.provider_a.chain_id, self.provider_a.log_count
            ),
        );
        push(
            &mut out,
            format!(
                "Provider B:  {} (chain {}, {} logs)",
                self.provider_b.url, self.provider_b.chain_id, self.provider_b.log_count
            ),
        );
        push(
            &mut out,
            format!("Commit A:    {:#x}", self.provider_a.commitment),
        );
        push(
            &mut out,
            format!("Commit B:    {:#x}", self.provider_b.commitment),
        );
        push(&mut out, "─".repeat(60));

        if self.consistent {
            push(
                &mut out,
                format!(
                    "CONSISTENT: commitments match ({} logs)",
                    self.provider_a.log_count
                ),
            );
        } else {
            push(&mut out, "INCONSISTENT: commitments differ".to_string());

            if self.diff.discrepancies.is_empty() {
                // Same key-level content, different provider ordering
                push(
                    &mut out,
                    "  providers returned the same logs in a different order".to_string(),
                );
            }

            for d in &self.diff.discrepancies {
                match &d.kind {
                    DiscrepancyKind::OnlyInA => push(
                        &mut out,
                        format!(
                            "  only in A: block {} log {} (tx {:#x})",
                            d.block_number, d.log_index, d.transaction_hash
                        ),
                    ),
                    DiscrepancyKind::OnlyInB => push(
                        &mut out,
                        format!(
                            "  only in B: block {} log {} (tx {:#x})",
                            d.block_number, d.log_index, d.transaction_hash
                        ),
                    ),
                    DiscrepancyKind::Mismatched { fields } => {
                        push(
                            &mut out,
                            format!(
                                "  mismatch:  block {} log {} (tx {:#x})",
                                d.block_number, d.log_index, d.transaction_hash
                            ),
                        );
                        for delta in fields {
                            push(
                                &mut out,
                                format!("    {}: A={} B={}", delta.field, delta.a, delta.b),
                            );
                        }
                    }
                }
            }
        }

        push(&mut out, format!("Elapsed:     {}ms", self.elapsed_ms));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::Discrepancy;
    use alloy::primitives::b256;

    fn report(consistent: bool, discrepancies: Vec<Discrepancy>) -> AuditReport {
        let commitment_b = if consistent {
            b256!("c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470")
        } else {
            b256!("0000000000000000000000000000000000000000000000000000000000000001")
        };

        AuditReport {
            scheme_version: SCHEME_VERSION,
            from_block: 100,
            to_block: 200,
            provider_a: ProviderReport {
                url: "http://rpc-a".into(),
                chain_id: 1,
                log_count: 0,
                commitment: b256!(
                    "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
                ),
            },
            provider_b: ProviderReport {
                url: "http://rpc-b".into(),
                chain_id: 1,
                log_count: 0,
                commitment: commitment_b,
            },
            consistent,
            diff: DiffResult {
                matching: 0,
                discrepancies,
            },
            elapsed_ms: 42,
        }
    }

    #[test]
    fn test_human_consistent() {
        let rendered = report(true, vec![]).render_human();
        assert!(rendered.contains("CONSISTENT"));
        assert!(rendered.contains(SCHEME_VERSION));
        assert!(rendered.contains("[100, 200]"));
    }

    #[test]
    fn test_human_order_only_divergence() {
        let rendered = report(false, vec![]).render_human();
        assert!(rendered.contains("INCONSISTENT"));
        assert!(rendered.contains("different order"));
    }

    #[test]
    fn test_human_exclusive_entry() {
        let rendered = report(
            false,
            vec![Discrepancy {
                block_number: 150,
                log_index: 2,
                transaction_hash: b256!(
                    "8a7fc50330533cd0440b6dd6fa3e181a29ca4a346cf71dcb3e9b79ed6e8f8b8a"
                ),
                kind: DiscrepancyKind::OnlyInA,
            }],
        )
        .render_human();
        assert!(rendered.contains("only in A: block 150 log 2"));
    }

    #[test]
    fn test_json_carries_version_and_verdict() {
        let json = report(true, vec![]).render_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["scheme_version"], SCHEME_VERSION);
        assert_eq!(value["consistent"], true);
        assert!(value["provider_a"]["commitment"]
            .as_str()
            .unwrap()
            .starts_with("0x"));
    }
}

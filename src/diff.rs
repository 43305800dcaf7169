//! Log set differ
//!
//! A commitment mismatch alone says *that* the providers diverge, not *what*
//! diverges. The differ aligns the two sets by identity key
//! `(transactionHash, logIndex)` and classifies every key in the union as
//! matching, mismatched (with field-level deltas), or exclusive to one side.
//!
//! The diff is independent of the commitment scheme: it compares canonical
//! bytes, then drills into individual fields when they differ.

use crate::canonical::LogEntry;
use alloy::primitives::B256;
use serde::Serialize;
use std::collections::HashMap;

/// One differing field, rendered for the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDelta {
    /// Field name as it appears on the wire
    pub field: &'static str,
    /// Provider A's value
    pub a: String,
    /// Provider B's value
    pub b: String,
}

/// How a single identity key diverges between the providers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiscrepancyKind {
    /// Present in both sets with differing content
    Mismatched { fields: Vec<FieldDelta> },
    /// Only provider A returned this log
    OnlyInA,
    /// Only provider B returned this log
    OnlyInB,
}

/// One reported divergence, positioned for stable ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Discrepancy {
    pub block_number: u64,
    pub log_index: u64,
    pub transaction_hash: B256,
    #[serde(flatten)]
    pub kind: DiscrepancyKind,
}

/// Outcome of diffing two log sets.
#[derive(Debug, Clone, Serialize)]
pub struct DiffResult {
    /// Identity keys present in both sets with identical canonical bytes
    pub matching: usize,
    /// Divergent keys, ascending by `(blockNumber, logIndex)`
    pub discrepancies: Vec<Discrepancy>,
}

impl DiffResult {
    /// Diff provider A's log set against provider B's.
    ///
    /// Every identity key in the union of the two sets lands in exactly one
    /// category. Swapping the arguments swaps the exclusive categories and
    /// leaves matching/mismatched content unchanged.
    pub fn compute(set_a: &[LogEntry], set_b: &[LogEntry]) -> Self {
        let by_key_b: HashMap<(B256, u64), &LogEntry> =
            set_b.iter().map(|e| (e.identity_key(), e)).collect();
        let by_key_a: HashMap<(B256, u64), &LogEntry> =
            set_a.iter().map(|e| (e.identity_key(), e)).collect();

        let mut matching = 0usize;
        let mut discrepancies = Vec::new();

        for entry_a in set_a {
            match by_key_b.get(&entry_a.identity_key()) {
                Some(entry_b) => {
                    if entry_a.canonical_bytes() == entry_b.canonical_bytes() {
                        matching += 1;
                    } else {
                        discrepancies.push(Discrepancy {
                            block_number: entry_a.block_number,
                            log_index: entry_a.log_index,
                            transaction_hash: entry_a.transaction_hash,
                            kind: DiscrepancyKind::Mismatched {
                                fields: field_deltas(entry_a, entry_b),
                            },
                        });
                    }
                }
                None => discrepancies.push(Discrepancy {
                    block_number: entry_a.block_number,
                    log_index: entry_a.log_index,
                    transaction_hash: entry_a.transaction_hash,
                    kind: DiscrepancyKind::OnlyInA,
                }),
            }
        }

        for entry_b in set_b {
            if !by_key_a.contains_key(&entry_b.identity_key()) {
                discrepancies.push(Discrepancy {
                    block_number: entry_b.block_number,
                    log_index: entry_b.log_index,
                    transaction_hash: entry_b.transaction_hash,
                    kind: DiscrepancyKind::OnlyInB,
                });
            }
        }

        discrepancies.sort_by_key(|d| (d.block_number, d.log_index, d.transaction_hash));

        Self {
            matching,
            discrepancies,
        }
    }

    /// True when the two sets agree on every identity key.
    ///
    /// Note this is key-level agreement; the commitment additionally pins
    /// provider ordering, so equal diffs with unequal commitments indicate
    /// the providers returned the same logs in a different order.
    pub fn is_consistent(&self) -> bool {
        self.discrepancies.is_empty()
    }
}

/// Compare the canonical fields of two aligned entries.
///
/// Only fields that participate in the canonical encoding are compared;
/// `logIndex` and `transactionHash` are equal by construction of the key.
fn field_deltas(a: &LogEntry, b: &LogEntry) -> Vec<FieldDelta> {
    let mut deltas = Vec::new();

    if a.address != b.address {
        deltas.push(FieldDelta {
            field: "address",
            a: format!("{:#x}", a.address),
            b: format!("{:#x}", b.address),
        });
    }
    if a.topics != b.topics {
        deltas.push(FieldDelta {
            field: "topics",
            a: render_topics(&a.topics),
            b: render_topics(&b.topics),
        });
    }
    if a.data != b.data {
        deltas.push(FieldDelta {
            field: "data",
            a: format!("0x{}", hex::encode(&a.data)),
            b: format!("0x{}", hex::encode(&b.data)),
        });
    }
    if a.block_number != b.block_number {
        deltas.push(FieldDelta {
            field: "blockNumber",
            a: a.block_number.to_string(),
            b: b.block_number.to_string(),
        });
    }
    if a.transaction_index != b.transaction_index {
        deltas.push(FieldDelta {
            field: "transactionIndex",
            a: a.transaction_index.to_string(),
            b: b.transaction_index.to_string(),
        });
    }

    deltas
}

fn render_topics(topics: &[B256]) -> String {
    let rendered: Vec<String> = topics.iter().map(|t| format!("{:#x}", t)).collect();
    format!("[{}]", rendered.join(","))
}

//! Canonical log representation
//!
//! Maps a provider-returned log to a fixed byte encoding so that two
//! logically-identical logs hash and compare equal regardless of the source
//! provider's hex casing, key ordering, or optional-field quirks.
//!
//! Canonical encoding (version [`SCHEME_VERSION`]):
//!
//! ```text
//! address (20 bytes)
//! || topics length (u8)
//! || topics[0..n] (32 bytes each)
//! || data length (u32 big-endian)
//! || data
//! || block number (u64 big-endian)
//! || transaction index (u64 big-endian)
//! || log index (u64 big-endian)
//! ```
//!
//! Byte-string fields carry explicit length prefixes to rule out concatenation
//! collisions. Changing any part of this layout invalidates previously
//! computed commitments, so any change must bump [`SCHEME_VERSION`].

use crate::error::{ProviderError, Result};
use alloy::primitives::{Address, Bytes, B256};
use alloy::rpc::types::Log;
use serde::Serialize;

/// Canonicalization scheme tag, carried in every report so commitments
/// produced by different scheme versions are never compared as equal.
pub const SCHEME_VERSION: &str = "keccak-concat-v1";

/// One on-chain event log with every field the audit needs, validated.
///
/// Providers return pending-log fields as JSON `null`; an audit over a mined
/// block range must never see those, so ingestion rejects logs missing
/// `blockNumber`, `transactionIndex`, `logIndex`, `blockHash`, or
/// `transactionHash`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    /// Emitting contract address
    pub address: Address,
    /// Indexed topics (0-4 entries)
    pub topics: Vec<B256>,
    /// Opaque event data
    pub data: Bytes,
    /// Block containing the log
    pub block_number: u64,
    /// Position of the transaction within the block
    pub transaction_index: u64,
    /// Position of the log within the block
    pub log_index: u64,
    /// Hash of the containing block
    pub block_hash: B256,
    /// Hash of the emitting transaction
    pub transaction_hash: B256,
}

impl LogEntry {
    /// Validate a raw `eth_getLogs` entry into a [`LogEntry`].
    ///
    /// `provider_url` is only used to attribute schema violations.
    pub fn from_rpc_log(log: &Log, provider_url: &str) -> Result<Self> {
        let missing = |field: &'static str| ProviderError::MissingField {
            url: provider_url.to_string(),
            field,
        };

        let entry = Self {
            address: log.address(),
            topics: log.topics().to_vec(),
            data: log.data().data.clone(),
            block_number: log.block_number.ok_or_else(|| missing("blockNumber"))?,
            transaction_index: log
                .transaction_index
                .ok_or_else(|| missing("transactionIndex"))?,
            log_index: log.log_index.ok_or_else(|| missing("logIndex"))?,
            block_hash: log.block_hash.ok_or_else(|| missing("blockHash"))?,
            transaction_hash: log
                .transaction_hash
                .ok_or_else(|| missing("transactionHash"))?,
        };

        if entry.topics.len() > 4 {
            return Err(ProviderError::InvalidResponse {
                url: provider_url.to_string(),
                reason: format!("log has {} topics, maximum is 4", entry.topics.len()),
            }
            .into());
        }

        Ok(entry)
    }

    /// Identity key aligning the same log across providers.
    pub fn identity_key(&self) -> (B256, u64) {
        (self.transaction_hash, self.log_index)
    }

    /// Canonical byte encoding of this entry (see module docs).
    ///
    /// `blockHash` and `transactionHash` are deliberately excluded: the
    /// identity key already pins the transaction, and the position fields
    /// capture everything the commitment needs to be order-meaningful.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(20 + 1 + 32 * self.topics.len() + 4 + self.data.len() + 24);

        out.extend_from_slice(self.address.as_slice());
        out.push(self.topics.len() as u8);
        for topic in &self.topics {
            out.extend_from_slice(topic.as_slice());
        }
        out.extend_from_slice(&(self.data.len() as u32).to_be_bytes());
        out.extend_from_slice(&self.data);
        out.extend_from_slice(&self.block_number.to_be_bytes());
        out.extend_from_slice(&self.transaction_index.to_be_bytes());
        out.extend_from_slice(&self.log_index.to_be_bytes());

        out
    }
}

/// Test fixture shared across module tests.
#[cfg(test)]
pub(crate) fn sample_entry() -> LogEntry {
    use alloy::primitives::{address, b256, bytes};

    LogEntry {
        address: address!("a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48"),
        topics: vec![b256!(
            "ddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"
        )],
        data: bytes!("00000000000000000000000000000000000000000000000000000000000003e8"),
        block_number: 18_000_000,
        transaction_index: 3,
        log_index: 7,
        block_hash: b256!("95b198e154acbfc64109dfd22d8224fe927fd8dfdedfae01587674482ba4baf3"),
        transaction_hash: b256!("8a7fc50330533cd0440b6dd6fa3e181a29ca4a346cf71dcb3e9b79ed6e8f8b8a"),
    }
}

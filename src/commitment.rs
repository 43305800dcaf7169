//! Log set commitment hashing
//!
//! Folds a provider's full log set into a single Keccak-256 digest so two
//! providers can be compared without shipping full data around.
//!
//! The scheme is order-sensitive: canonical bytes of every entry are
//! concatenated in provider-returned order and hashed once, so two providers
//! returning the same logs in a different order produce different commitments.

use crate::canonical::LogEntry;
use alloy::primitives::{keccak256, B256};

/// Commitment of the empty log set: Keccak-256 of the empty byte string.
///
/// `0xc5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470`
pub fn empty_commitment() -> B256 {
    keccak256(&[] as &[u8])
}

/// Compute the commitment for a log set in provider-returned order.
pub fn commit(entries: &[LogEntry]) -> B256 {
    let mut preimage = Vec::new();
    for entry in entries {
        preimage.extend_from_slice(&entry.canonical_bytes());
    }
    keccak256(&preimage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::sample_entry;

    #[test]
    fn test_empty_commitment_constant() {
        assert_eq!(
            format!("{:#x}", empty_commitment()),
            "0xc5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
        assert_eq!(commit(&[]), empty_commitment());
    }

    #[test]
    fn test_commitment_pure() {
        let entries = vec![sample_entry(), sample_entry()];
        assert_eq!(commit(&entries), commit(&entries.clone()));
    }

    #[test]
    fn test_commitment_order_sensitive() {
        let mut second = sample_entry();
        second.log_index = 8;

        let forward = commit(&[sample_entry(), second.clone()]);
        let reversed = commit(&[second, sample_entry()]);
        assert_ne!(forward, reversed);
    }

    #[test]
    fn test_commitment_tracks_content() {
        let base = commit(&[sample_entry()]);

        let mut changed = sample_entry();
        changed.data = alloy::primitives::Bytes::from(vec![0xde, 0xad]);
        assert_ne!(commit(&[changed]), base);
    }
}

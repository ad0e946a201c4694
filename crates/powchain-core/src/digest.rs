//! The block identity function.
//!
//! A block's digest is SHA-256 over its fields rendered as text and joined
//! with no delimiter, in the order index, timestamp, payload, previous
//! digest, nonce. The output is lowercase hex.

use sha2::{Digest, Sha256};

use crate::constants::HASH_HEX_SIZE;

/// Derive the digest for the given block fields.
pub fn block_digest(
    index: u64,
    timestamp: u64,
    payload: &str,
    previous_digest: &str,
    nonce: u64,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(index.to_string().as_bytes());
    hasher.update(timestamp.to_string().as_bytes());
    hasher.update(payload.as_bytes());
    hasher.update(previous_digest.as_bytes());
    hasher.update(nonce.to_string().as_bytes());
    hex::encode(hasher.finalize())
}

/// Number of leading `'0'` characters in a hex digest.
pub fn leading_zero_hex(digest: &str) -> usize {
    digest.bytes().take_while(|b| *b == b'0').count()
}

/// True when `digest` carries at least `difficulty` leading zero hex digits.
pub fn meets_difficulty(digest: &str, difficulty: u32) -> bool {
    digest.len() == HASH_HEX_SIZE && leading_zero_hex(digest) >= difficulty as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genesis_known_vector() {
        let d = block_digest(0, 1_700_000_000_000, "Genesis Block", "0", 0);
        assert_eq!(
            d,
            "c99df2a16a22e8fbcd1101a8f58716240cbc14ca2f42217551a3260f1daf8269"
        );
    }

    #[test]
    fn payload_known_vector() {
        let d = block_digest(1, 1_700_000_000_000, "hello", "0", 7);
        assert_eq!(
            d,
            "2aa4f88fd55a35f084d6e032b5c9cf82dc41b7d93a364dc2549b2c8beff6605d"
        );
    }

    #[test]
    fn payload_is_hashed_as_utf8() {
        let d = block_digest(3, 42, "héllo ✓", "abc", 9);
        assert_eq!(
            d,
            "2e5261eb7ed13db9a9b290abe6537168ce6368f5b471fdb968e27d80aa14e63a"
        );
    }

    #[test]
    fn digest_is_deterministic() {
        let a = block_digest(5, 123, "payload", "prev", 99);
        let b = block_digest(5, 123, "payload", "prev", 99);
        assert_eq!(a, b);
    }

    #[test]
    fn digest_is_fixed_length_lowercase_hex() {
        let d = block_digest(0, 0, "", "", 0);
        assert_eq!(d.len(), HASH_HEX_SIZE);
        assert!(d.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
    }

    #[test]
    fn digest_changes_with_nonce() {
        let a = block_digest(1, 1, "x", "0", 1);
        let b = block_digest(1, 1, "x", "0", 2);
        assert_ne!(a, b);
    }

    #[test]
    fn leading_zero_hex_examples() {
        assert_eq!(leading_zero_hex("abc"), 0);
        assert_eq!(leading_zero_hex("0abc"), 1);
        assert_eq!(leading_zero_hex("0000f"), 4);
        assert_eq!(leading_zero_hex("0000"), 4);
        assert_eq!(leading_zero_hex(""), 0);
    }

    #[test]
    fn meets_difficulty_examples() {
        let d = "0038dcde0c9a0900093da86d75c4e1729c4f817586f2ae2ea05308d47a8fffb5";
        assert!(meets_difficulty(d, 0));
        assert!(meets_difficulty(d, 2));
        assert!(!meets_difficulty(d, 3));
        // An empty or truncated digest never qualifies.
        assert!(!meets_difficulty("", 0));
        assert!(!meets_difficulty("00", 2));
    }
}

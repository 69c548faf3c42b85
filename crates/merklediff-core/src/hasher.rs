//! SHA-256 digests for tree nodes.
//!
//! Leaves hash their encoded payload (or raw chunk). Internal nodes hash the
//! concatenation `left ++ right` of their children's 32-byte digests, with no
//! domain separation byte.

use sha2::{Digest as _, Sha256};

/// Raw 32-byte SHA-256 output
pub type Digest = [u8; 32];

/// Hash a leaf payload
pub fn hash_leaf(payload: &[u8]) -> Digest {
    Sha256::digest(payload).into()
}

/// Hash two child digests into their parent's digest
pub fn hash_pair(left: &Digest, right: &Digest) -> Digest {
    let mut hasher = Sha256::new();
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}

/// Full lowercase hex rendering (64 characters)
pub fn to_hex(digest: &Digest) -> String {
    hex::encode(digest)
}

/// First 16 hex characters, for human-facing output
pub fn short_hex(digest: &Digest) -> String {
    hex::encode(&digest[..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_leaf_known_vector() {
        assert_eq!(
            to_hex(&hash_leaf(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_hash_pair_is_concatenation() {
        let a = hash_leaf(b"a");
        let b = hash_leaf(b"b");
        let mut joined = a.to_vec();
        joined.extend_from_slice(&b);
        assert_eq!(hash_pair(&a, &b), hash_leaf(&joined));
    }

    #[test]
    fn test_hash_pair_order_sensitive() {
        let a = hash_leaf(b"a");
        let b = hash_leaf(b"b");
        assert_ne!(hash_pair(&a, &b), hash_pair(&b, &a));
    }

    #[test]
    fn test_short_hex_length() {
        let d = hash_leaf(b"x");
        assert_eq!(short_hex(&d).len(), 16);
        assert!(to_hex(&d).starts_with(&short_hex(&d)));
    }
}

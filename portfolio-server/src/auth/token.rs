//! Opaque bearer tokens
//!
//! Clients hold the raw token; the store only sees its SHA-256 digest.

use sha2::{Digest, Sha256};

const TOKEN_BYTES: usize = 32;

/// 32 random bytes, hex encoded
pub fn generate_token() -> String {
    let bytes: [u8; TOKEN_BYTES] = rand::random();
    hex::encode(bytes)
}

pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Comparison whose duration does not depend on where the inputs differ
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

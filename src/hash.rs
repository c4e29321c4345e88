//! BLAKE3 hashing utilities for bundle integrity

use blake3::Hasher;

/// Hash prefix for BLAKE3 hashes
pub const HASH_PREFIX: &str = "blake3:";

/// Calculate the BLAKE3 hash of in-memory content
pub fn hash_bytes(content: &[u8]) -> String {
    let mut hasher = Hasher::new();
    hasher.update(content);
    format!("{}{}", HASH_PREFIX, hasher.finalize().to_hex())
}

/// Verify content against an expected `blake3:<hex>` checksum.
///
/// Comparison ignores ASCII case of the hex digits.
pub fn verify_hash(expected: &str, content: &[u8]) -> bool {
    let actual = hash_bytes(content);
    expected.eq_ignore_ascii_case(&actual)
}

/// Check whether a string looks like a checksum this module produces
pub fn is_valid_hash(hash: &str) -> bool {
    hash.strip_prefix(HASH_PREFIX)
        .is_some_and(|hex| hex.len() == 64 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

//! Content checksums used to derive import-queue identifiers.

use sha2::{Digest, Sha256};

/// SHA-256 of `content`, hex encoded.
pub fn calculate_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

/// Stable `uid` for an import request: the same user queueing the same
/// payload twice gets the same identifier.
pub fn import_uid(user_id: i64, request_data: &str) -> String {
    calculate_checksum(&format!("{}:{}", user_id, request_data.trim()))
}

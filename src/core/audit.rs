//! Audit trace helpers.
//!
//! Values never appear in logs in full: they are shown as a truncated base64
//! preview with their length, and generated public keys by fingerprint.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use sha2::{Digest, Sha256};

use crate::core::constants::PREVIEW_CHARS;

/// Truncated base64 preview of a value, e.g. `LS0tLS1CRUdJTiBQVUJMSUMg… (451 bytes)`.
pub fn preview(value: &str) -> String {
    if value.is_empty() {
        return "(empty)".to_string();
    }

    let encoded = STANDARD.encode(value.as_bytes());
    if encoded.len() <= PREVIEW_CHARS {
        return format!("{} ({} bytes)", encoded, value.len());
    }
    format!("{}… ({} bytes)", &encoded[..PREVIEW_CHARS], value.len())
}

/// SHA-256 fingerprint of a PEM value, as `SHA256:<hex>`.
pub fn fingerprint(pem: &str) -> String {
    let digest = Sha256::digest(pem.trim().as_bytes());
    let hex: String = digest.iter().map(|b| format!("{:02x}", b)).collect();
    format!("SHA256:{}", hex)
}

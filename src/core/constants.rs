//! Constants used throughout keyrot.
//!
//! Centralizes slot suffixes, key parameters and environment names.

/// Suffix of the active public key slot.
pub const PUBLIC_KEY_SUFFIX: &str = "_PUBLIC_KEY";

/// Suffix of the active private key slot.
pub const PRIVATE_KEY_SUFFIX: &str = "_PRIVATE_KEY";

/// Suffix appended to an active slot name to form its archive slot.
pub const PREV_SUFFIX: &str = "_PREV";

/// RSA modulus size for generated key pairs.
pub const RSA_KEY_BITS: usize = 4096;

/// Smallest RSA modulus the generator accepts.
pub const MIN_RSA_KEY_BITS: usize = 4096;

/// Default GitHub REST endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// GitHub REST API version header value.
pub const GITHUB_API_VERSION: &str = "2022-11-28";

/// Default HTTP timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Number of base64 characters shown in audit previews.
pub const PREVIEW_CHARS: usize = 24;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "KEYROT_LOG";

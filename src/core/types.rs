//! Type aliases for domain concepts.
//!
//! Provides semantic type aliases to make function signatures more descriptive.

/// A credential name (e.g., TOKENIZE_SERVICE).
///
/// Slot names are derived from it by suffixing.
pub type CredentialName = String;

/// A secret slot name in the store (e.g., TOKENIZE_SERVICE_PUBLIC_KEY).
pub type SlotName = String;

/// A PEM-encoded key.
pub type Pem = String;

/// Identifier of the store public key a value was sealed with.
pub type KeyId = String;

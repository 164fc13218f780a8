//! Input validation for keyrot operations.
//!
//! Validates credential names before any slot name is derived from them.

use crate::error::{InputError, Result};

/// Validate a credential name.
///
/// Credential names become secret name prefixes, so they follow the
/// GitHub secret naming rules:
/// - Only A-Z, a-z, 0-9, and underscore
/// - Cannot start with a digit
/// - Cannot start with the reserved `GITHUB_` prefix
/// - Cannot be empty
///
/// # Arguments
///
/// * `index` - Position of the entry in the batch (for error messages)
/// * `name` - The name to validate
///
/// # Errors
///
/// Returns `InputError::InvalidName` if the name is invalid.
pub fn validate_name(index: usize, name: &str) -> Result<()> {
    let invalid = |reason: String| InputError::InvalidName {
        index,
        name: name.to_string(),
        reason,
    };

    if name.is_empty() {
        return Err(invalid("cannot be empty".to_string()).into());
    }

    if let Some(first_char) = name.chars().next() {
        if first_char.is_ascii_digit() {
            return Err(invalid("cannot start with a digit".to_string()).into());
        }
    }

    if name.to_ascii_uppercase().starts_with("GITHUB_") {
        return Err(invalid("cannot start with GITHUB_".to_string()).into());
    }

    for (i, ch) in name.chars().enumerate() {
        if !ch.is_ascii_alphanumeric() && ch != '_' {
            return Err(invalid(format!(
                "invalid character '{}' at position {}. Only letters, digits, and underscore are allowed",
                ch,
                i + 1
            ))
            .into());
        }
    }

    Ok(())
}

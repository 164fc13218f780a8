//! Credential pairs and slot naming.
//!
//! A credential pair is read from a JSON array such as
//!
//! ```json
//! [{ "name": "TOKENIZE_SERVICE", "public": "-----BEGIN ...", "private": "-----BEGIN ..." }]
//! ```
//!
//! Values usually arrive through a workflow input, where multi-line PEM
//! blocks end up as raw newlines inside JSON strings. Those are escaped
//! before parsing.

use std::fmt;

use serde_json::{Map, Value};
use tracing::debug;
use zeroize::Zeroizing;

use crate::core::constants::{PREV_SUFFIX, PRIVATE_KEY_SUFFIX, PUBLIC_KEY_SUFFIX};
use crate::core::types::{CredentialName, SlotName};
use crate::core::validation;
use crate::error::{InputError, Result};

/// A named public/private value tuple to rotate.
pub struct CredentialPair {
    pub name: CredentialName,
    pub public: String,
    pub private: Zeroizing<String>,
}

impl CredentialPair {
    pub fn new(
        name: impl Into<String>,
        public: impl Into<String>,
        private: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            public: public.into(),
            private: Zeroizing::new(private.into()),
        }
    }

    /// Slot names derived from this pair's name.
    pub fn slots(&self) -> SlotNames {
        SlotNames::derive(&self.name)
    }
}

impl fmt::Debug for CredentialPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialPair")
            .field("name", &self.name)
            .field("public", &format_args!("<{} bytes>", self.public.len()))
            .field("private", &format_args!("<redacted>"))
            .finish()
    }
}

/// The four store slots owned by one credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotNames {
    pub public: SlotName,
    pub private: SlotName,
    pub public_prev: SlotName,
    pub private_prev: SlotName,
}

impl SlotNames {
    /// Derive slot names from a credential name.
    pub fn derive(name: &str) -> Self {
        let public = format!("{}{}", name, PUBLIC_KEY_SUFFIX);
        let private = format!("{}{}", name, PRIVATE_KEY_SUFFIX);
        Self {
            public_prev: format!("{}{}", public, PREV_SUFFIX),
            private_prev: format!("{}{}", private, PREV_SUFFIX),
            public,
            private,
        }
    }

    /// Slots in the order a rotation writes them.
    pub fn publish_order(&self) -> [&str; 4] {
        [
            &self.public_prev,
            &self.private_prev,
            &self.public,
            &self.private,
        ]
    }
}

/// Escape raw control characters found inside JSON string literals.
///
/// Newlines outside strings are structural whitespace and left alone, so
/// both single-line and pretty-printed arrays parse.
pub fn normalize_newlines(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_string = false;
    let mut escaped = false;

    for ch in raw.chars() {
        if in_string {
            match ch {
                _ if escaped => {
                    escaped = false;
                    out.push(ch);
                }
                '\\' => {
                    escaped = true;
                    out.push(ch);
                }
                '"' => {
                    in_string = false;
                    out.push(ch);
                }
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                _ => out.push(ch),
            }
        } else {
            if ch == '"' {
                in_string = true;
            }
            out.push(ch);
        }
    }

    out
}

/// Parse and validate a batch of credential pairs.
///
/// # Errors
///
/// Returns an `InputError` describing the first offending entry, or
/// `InputError::Empty` for an empty array.
pub fn parse_pairs(raw: &str) -> Result<Vec<CredentialPair>> {
    let normalized = normalize_newlines(raw);
    if normalized.len() != raw.len() {
        debug!("escaped embedded newlines in credential pairs");
    }

    let value: Value = serde_json::from_str(&normalized).map_err(InputError::Malformed)?;
    let Value::Array(entries) = value else {
        return Err(InputError::NotAnArray.into());
    };

    if entries.is_empty() {
        return Err(InputError::Empty.into());
    }

    let pairs = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| -> Result<CredentialPair> {
            let Value::Object(fields) = entry else {
                return Err(InputError::NotAnObject { index }.into());
            };
            let name = string_field(fields, index, "name")?;
            validation::validate_name(index, name)?;
            Ok(CredentialPair::new(
                name,
                string_field(fields, index, "public")?,
                string_field(fields, index, "private")?,
            ))
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(count = pairs.len(), "parsed credential pairs");
    Ok(pairs)
}

fn string_field<'a>(
    fields: &'a Map<String, Value>,
    index: usize,
    field: &'static str,
) -> Result<&'a str> {
    match fields.get(field) {
        None | Some(Value::Null) => Err(InputError::MissingField { index, field }.into()),
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(_) => Err(InputError::NotAString { index, field }.into()),
    }
}

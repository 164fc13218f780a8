//! Secret store abstraction.
//!
//! A secret write is a small protocol: fetch the store's encryption key,
//! seal the value under it, optionally attach organization visibility, then
//! upsert. [`SecretSink`] exposes those steps; [`set_secret`] runs them in
//! order and classifies the response.
//!
//! ## Adding a New Store
//!
//! 1. Implement the `SecretSink` trait
//! 2. Add the implementation in a new file (e.g., `vault.rs`)
//! 3. Re-export from this module

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::types::KeyId;
use crate::error::PublishError;

mod github;

pub use github::{seal, GitHubSink, Target};

/// Outcome of one completed write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationResult {
    /// HTTP-style status code.
    pub status: u16,
    /// Raw response body.
    pub data: String,
}

impl RotationResult {
    pub fn new(status: u16, data: impl Into<String>) -> Self {
        Self {
            status,
            data: data.into(),
        }
    }

    /// Whether the status marks a failed write (>= 400).
    pub fn is_failure(&self) -> bool {
        self.status >= 400
    }
}

/// The store's current public encryption key.
#[derive(Debug, Clone, Deserialize)]
pub struct EncryptionKey {
    pub key_id: KeyId,
    /// Base64-encoded key bytes.
    pub key: String,
}

/// Who can read an organization secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visibility {
    All,
    Private,
    Selected(Vec<u64>),
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::All => "all",
            Visibility::Private => "private",
            Visibility::Selected(_) => "selected",
        }
    }
}

/// An encrypted value ready for upload.
#[derive(Debug, Clone, Serialize)]
pub struct SealedPayload {
    pub encrypted_value: String,
    pub key_id: KeyId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_repository_ids: Option<Vec<u64>>,
}

impl SealedPayload {
    pub fn new(encrypted_value: String, key_id: KeyId) -> Self {
        Self {
            encrypted_value,
            key_id,
            visibility: None,
            selected_repository_ids: None,
        }
    }

    /// Attach organization visibility fields.
    pub fn apply_visibility(&mut self, visibility: &Visibility) {
        self.visibility = Some(visibility.as_str());
        self.selected_repository_ids = match visibility {
            Visibility::Selected(ids) => Some(ids.clone()),
            _ => None,
        };
    }
}

/// A durable, encrypted secret store.
#[async_trait]
pub trait SecretSink: Send + Sync {
    /// Fetch the key values must be sealed with.
    async fn encryption_key(&self) -> Result<EncryptionKey, PublishError>;

    /// Seal `value` for storage under `name`.
    fn prepare(
        &self,
        key: &EncryptionKey,
        name: &str,
        value: &str,
    ) -> Result<SealedPayload, PublishError>;

    /// Store a sealed payload under `name`.
    ///
    /// A response with any status is `Ok`; `Err` means no response was
    /// received.
    async fn publish(&self, payload: SealedPayload, name: &str)
        -> Result<RotationResult, PublishError>;

    /// Whether visibility fields apply to this store.
    fn is_organization_scoped(&self) -> bool;
}

/// Write one secret: fetch key, seal, attach visibility, upsert.
///
/// Organization-scoped sinks always receive a visibility; `None` means
/// [`Visibility::Private`].
///
/// # Errors
///
/// Returns `PublishError::Rejected` when the store answers with a status
/// of 400 or above, or the underlying error when no response was received.
pub async fn set_secret<S: SecretSink + ?Sized>(
    sink: &S,
    visibility: Option<&Visibility>,
    name: &str,
    value: &str,
) -> Result<RotationResult, PublishError> {
    let key = sink.encryption_key().await?;
    debug!(name, key_id = %key.key_id, "sealing secret");

    let mut payload = sink.prepare(&key, name, value)?;
    if sink.is_organization_scoped() {
        payload.apply_visibility(visibility.unwrap_or(&Visibility::Private));
    }

    let result = sink.publish(payload, name).await?;
    if result.is_failure() {
        warn!(name, status = result.status, data = %result.data, "secret store rejected write");
        return Err(PublishError::Rejected {
            name: name.to_string(),
            result,
        });
    }

    info!(name, status = result.status, "secret written");
    Ok(result)
}

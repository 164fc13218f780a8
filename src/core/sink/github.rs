//! GitHub Actions secrets backend.
//!
//! Writes repository or organization secrets through the REST API. Values
//! are sealed with a libsodium-compatible sealed box under the public key
//! GitHub publishes for the target.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::rngs::OsRng;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Client;
use tracing::{debug, trace};

use super::{EncryptionKey, RotationResult, SealedPayload, SecretSink};
use crate::core::constants::GITHUB_API_VERSION;
use crate::error::{ConfigError, PublishError};

const SEALED_BOX_KEY_LEN: usize = 32;

/// Where secrets are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Repository { owner: String, repo: String },
    Organization(String),
}

impl Target {
    fn path(&self) -> String {
        match self {
            Target::Repository { owner, repo } => format!("repos/{}/{}", owner, repo),
            Target::Organization(org) => format!("orgs/{}", org),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Repository { owner, repo } => write!(f, "{}/{}", owner, repo),
            Target::Organization(org) => write!(f, "org {}", org),
        }
    }
}

/// GitHub Actions secret store.
pub struct GitHubSink {
    client: Client,
    api_url: String,
    target: Target,
}

impl GitHubSink {
    /// Create a client for `target` authenticated with `token`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the token is not a valid header value or
    /// the HTTP client cannot be built.
    pub fn new(
        api_url: &str,
        token: &str,
        target: Target,
        timeout: Duration,
    ) -> Result<Self, ConfigError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| ConfigError::InvalidToken)?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "x-github-api-version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("keyrot/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(ConfigError::Client)?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            target,
        })
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    fn url(&self, suffix: &str) -> String {
        format!("{}/{}/{}", self.api_url, self.target.path(), suffix)
    }
}

#[async_trait]
impl SecretSink for GitHubSink {
    async fn encryption_key(&self) -> Result<EncryptionKey, PublishError> {
        let url = self.url("actions/secrets/public-key");
        trace!(url = %url, "fetching public key");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| PublishError::KeyFetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PublishError::KeyFetch(format!(
                "{} {}",
                status.as_u16(),
                body
            )));
        }

        let key: EncryptionKey = response
            .json()
            .await
            .map_err(|e| PublishError::KeyFetch(e.to_string()))?;
        debug!(key_id = %key.key_id, destination = %self.target, "fetched public key");
        Ok(key)
    }

    fn prepare(
        &self,
        key: &EncryptionKey,
        name: &str,
        value: &str,
    ) -> Result<SealedPayload, PublishError> {
        let encrypted_value = seal(key, name, value)?;
        Ok(SealedPayload::new(encrypted_value, key.key_id.clone()))
    }

    async fn publish(
        &self,
        payload: SealedPayload,
        name: &str,
    ) -> Result<RotationResult, PublishError> {
        let url = self.url(&format!("actions/secrets/{}", name));
        trace!(url = %url, "writing secret");

        let transport = |e: reqwest::Error| PublishError::Transport {
            name: name.to_string(),
            message: e.to_string(),
        };

        let response = self
            .client
            .put(&url)
            .json(&payload)
            .send()
            .await
            .map_err(transport)?;
        let status = response.status().as_u16();
        let data = response.text().await.map_err(transport)?;

        Ok(RotationResult { status, data })
    }

    fn is_organization_scoped(&self) -> bool {
        matches!(self.target, Target::Organization(_))
    }
}

/// Seal the value of secret `name` under a base64-encoded X25519 public key.
///
/// Returns the base64-encoded sealed box.
///
/// # Errors
///
/// Returns `PublishError::InvalidKey` if the key is not 32 base64 bytes.
pub fn seal(key: &EncryptionKey, name: &str, value: &str) -> Result<String, PublishError> {
    let bytes = STANDARD
        .decode(&key.key)
        .map_err(|e| PublishError::InvalidKey(e.to_string()))?;
    let bytes: [u8; SEALED_BOX_KEY_LEN] = bytes.as_slice().try_into().map_err(|_| {
        PublishError::InvalidKey(format!(
            "expected {} bytes, got {}",
            SEALED_BOX_KEY_LEN,
            bytes.len()
        ))
    })?;

    let public = crypto_box::PublicKey::from(bytes);
    let sealed = public
        .seal(&mut OsRng, value.as_bytes())
        .map_err(|e| PublishError::Sealing {
            name: name.to_string(),
            message: e.to_string(),
        })?;

    Ok(STANDARD.encode(sealed))
}

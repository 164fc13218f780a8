//! Run configuration.
//!
//! Settings come from three layers, highest priority first: command-line
//! flags, `INPUT_*` environment variables (both collected by the CLI into
//! [`Inputs`]), and an optional TOML file:
//!
//! ```toml
//! repository = "octo-org"
//! org = true
//! visibility = "selected"
//! selected_repository_ids = [1296269, 1296270]
//! fail_on = "any"
//! ```
//!
//! The access token and the credential pairs are never read from the file.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;
use zeroize::Zeroizing;

use crate::core::batch::FailurePolicy;
use crate::core::constants::{DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
use crate::core::sink::{Target, Visibility};
use crate::error::{ConfigError, Error, Result};

/// Contents of a config file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub repository: Option<String>,
    pub org: Option<bool>,
    pub visibility: Option<String>,
    pub selected_repository_ids: Option<Vec<u64>>,
    pub api_url: Option<String>,
    pub fail_on: Option<FailurePolicy>,
    pub timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Load a config file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadFile` if the file cannot be read, or
    /// `ConfigError::Parse` if the TOML is malformed.
    pub fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading config");
        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let config = toml::from_str(&contents).map_err(ConfigError::Parse)?;
        Ok(config)
    }
}

/// Raw values from flags and environment. Empty strings count as unset,
/// since workflow runners pass every declared input even when blank.
#[derive(Default, Clone)]
pub struct Inputs {
    pub repository: Option<String>,
    /// Repository of the running workflow (`GITHUB_REPOSITORY`).
    pub default_repository: Option<String>,
    pub token: Option<String>,
    pub org: Option<String>,
    pub visibility: Option<String>,
    pub selected_repository_ids: Option<String>,
    pub api_url: Option<String>,
    pub fail_on: Option<FailurePolicy>,
    pub passphrase: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Fully resolved settings for one run.
#[derive(Clone)]
pub struct Config {
    pub target: Target,
    pub token: String,
    /// Only set for organization targets.
    pub visibility: Option<Visibility>,
    pub api_url: String,
    pub policy: FailurePolicy,
    pub passphrase: Zeroizing<String>,
    pub timeout: Duration,
}

impl Config {
    /// Merge inputs over the file config.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for a missing token or repository, or an
    /// invalid repository, visibility, or id list.
    pub fn resolve(inputs: Inputs, file: FileConfig) -> Result<Self> {
        let token = non_empty(inputs.token).ok_or(ConfigError::MissingToken)?;

        let org = match non_empty(inputs.org) {
            Some(flag) => is_truthy(&flag),
            None => file.org.unwrap_or(false),
        };

        let repository = non_empty(inputs.repository)
            .or(file.repository)
            .or(non_empty(inputs.default_repository))
            .ok_or(ConfigError::MissingRepository)?;
        let target = parse_target(&repository, org)?;

        let visibility = if org {
            let ids = match non_empty(inputs.selected_repository_ids) {
                Some(raw) => parse_repository_ids(&raw)?,
                None => file.selected_repository_ids.unwrap_or_default(),
            };
            let kind = non_empty(inputs.visibility)
                .or(file.visibility)
                .unwrap_or_else(|| "private".to_string());
            Some(parse_visibility(&kind, ids)?)
        } else {
            None
        };

        let config = Self {
            target,
            token,
            visibility,
            api_url: non_empty(inputs.api_url)
                .or(file.api_url)
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            policy: inputs.fail_on.or(file.fail_on).unwrap_or_default(),
            passphrase: Zeroizing::new(inputs.passphrase.unwrap_or_default()),
            timeout: Duration::from_secs(
                inputs
                    .timeout_secs
                    .or(file.timeout_secs)
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
        };

        debug!(
            destination = %config.target,
            api_url = %config.api_url,
            policy = ?config.policy,
            "config resolved"
        );
        Ok(config)
    }
}

fn redacted(value: &Option<String>) -> Option<&'static str> {
    value.as_ref().map(|_| "<redacted>")
}

impl fmt::Debug for Inputs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Inputs")
            .field("repository", &self.repository)
            .field("default_repository", &self.default_repository)
            .field("token", &redacted(&self.token))
            .field("org", &self.org)
            .field("visibility", &self.visibility)
            .field("selected_repository_ids", &self.selected_repository_ids)
            .field("api_url", &self.api_url)
            .field("fail_on", &self.fail_on)
            .field("passphrase", &redacted(&self.passphrase))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("target", &self.target)
            .field("token", &format_args!("<redacted>"))
            .field("visibility", &self.visibility)
            .field("api_url", &self.api_url)
            .field("policy", &self.policy)
            .field("passphrase", &format_args!("<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Whether a flag string means "on". Empty, `false`, `0` and `no` are off.
pub fn is_truthy(value: &str) -> bool {
    let value = value.trim();
    !(value.is_empty()
        || value.eq_ignore_ascii_case("false")
        || value == "0"
        || value.eq_ignore_ascii_case("no"))
}

/// Parse `owner/name`, or an organization name when `org` is set.
///
/// For organizations an `owner/name` value resolves to its owner.
pub fn parse_target(repository: &str, org: bool) -> Result<Target> {
    let repository = repository.trim();
    let invalid = || ConfigError::InvalidRepository(repository.to_string());

    if org {
        let name = repository.split('/').next().unwrap_or_default();
        if name.is_empty() {
            return Err(invalid().into());
        }
        return Ok(Target::Organization(name.to_string()));
    }

    match repository.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok(Target::Repository {
                owner: owner.to_string(),
                repo: repo.to_string(),
            })
        }
        _ => Err(invalid().into()),
    }
}

/// Parse a visibility keyword.
///
/// # Errors
///
/// Returns `ConfigError::NoSelectedRepositories` for `selected` without ids.
pub fn parse_visibility(kind: &str, ids: Vec<u64>) -> Result<Visibility> {
    match kind.trim().to_ascii_lowercase().as_str() {
        "all" => Ok(Visibility::All),
        "private" => Ok(Visibility::Private),
        "selected" if ids.is_empty() => Err(ConfigError::NoSelectedRepositories.into()),
        "selected" => Ok(Visibility::Selected(ids)),
        _ => Err(ConfigError::InvalidVisibility(kind.to_string()).into()),
    }
}

/// Parse repository ids given as a JSON array or a comma/space separated list.
pub fn parse_repository_ids(raw: &str) -> Result<Vec<u64>> {
    let raw = raw.trim();
    let invalid = || ConfigError::InvalidRepositoryIds(raw.to_string());

    if raw.starts_with('[') {
        return serde_json::from_str(raw).map_err(|_| Error::from(invalid()));
    }

    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<u64>().map_err(|_| Error::from(invalid())))
        .collect()
}

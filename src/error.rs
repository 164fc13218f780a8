//! Error types for keyrot.
//!
//! The top-level [`Error`] wraps one enum per concern so callers can match
//! on the failure class (input, generation, publish, config) without string
//! inspection.

use thiserror::Error;

use crate::core::batch::BatchReport;
use crate::core::sink::RotationResult;

/// Top-level error.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Publish(#[from] PublishError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Key generation failed mid-batch. Carries the writes made so far.
    #[error("rotation of {credential} aborted: {source}")]
    Aborted {
        credential: String,
        source: GenerationError,
        report: Box<BatchReport>,
    },

    #[error("rotation failed: {0}")]
    Failed(String),
}

/// The credential-pair batch could not be read.
///
/// Always raised before any secret is written.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("malformed credential pairs: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("malformed credential pairs: expected a JSON array of objects")]
    NotAnArray,

    #[error("malformed credential pairs: entry {index} is not an object")]
    NotAnObject { index: usize },

    #[error("malformed credential pairs: entry {index} is missing `{field}`")]
    MissingField { index: usize, field: &'static str },

    #[error("malformed credential pairs: entry {index} field `{field}` must be a string")]
    NotAString { index: usize, field: &'static str },

    #[error("malformed credential pairs: entry {index} has invalid name '{name}': {reason}")]
    InvalidName {
        index: usize,
        name: String,
        reason: String,
    },

    #[error("no credential pairs to rotate")]
    Empty,
}

/// Key-pair generation failed.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("key generation failed: {0}")]
    Rsa(#[from] rsa::Error),

    #[error("private key encoding failed: {0}")]
    Pkcs8(#[from] pkcs8::Error),

    #[error("public key encoding failed: {0}")]
    Spki(#[from] pkcs8::spki::Error),

    #[error("key size {bits} is below the {minimum}-bit minimum")]
    KeySize { bits: usize, minimum: usize },

    #[error("key generation task failed: {0}")]
    Task(String),
}

/// Writing a single secret failed.
///
/// Non-fatal during rotation: recorded in the step report and the run
/// carries on with the next slot.
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("{name}: secret store answered {} {}", .result.status, .result.data)]
    Rejected { name: String, result: RotationResult },

    #[error("{name}: request failed: {message}")]
    Transport { name: String, message: String },

    #[error("failed to fetch the secret store public key: {0}")]
    KeyFetch(String),

    #[error("invalid secret store public key: {0}")]
    InvalidKey(String),

    #[error("{name}: failed to seal value: {message}")]
    Sealing { name: String, message: String },
}

impl PublishError {
    /// Slot named in the message, for variants that carry one.
    pub fn slot(&self) -> Option<&str> {
        match self {
            PublishError::Rejected { name, .. }
            | PublishError::Transport { name, .. }
            | PublishError::Sealing { name, .. } => Some(name),
            PublishError::KeyFetch(_) | PublishError::InvalidKey(_) => None,
        }
    }

    /// The response carried by a rejected write, if one was received.
    pub fn result(&self) -> Option<&RotationResult> {
        match self {
            PublishError::Rejected { result, .. } => Some(result),
            _ => None,
        }
    }
}

/// Configuration could not be resolved.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing access token")]
    MissingToken,

    #[error("access token contains characters not allowed in a header")]
    InvalidToken,

    #[error("missing target repository")]
    MissingRepository,

    #[error("missing credential pairs")]
    MissingPairs,

    #[error("invalid repository '{0}': expected owner/name")]
    InvalidRepository(String),

    #[error("invalid visibility '{0}': expected all, private or selected")]
    InvalidVisibility(String),

    #[error("invalid selected repository ids '{0}'")]
    InvalidRepositoryIds(String),

    #[error("visibility `selected` requires at least one repository id")]
    NoSelectedRepositories,

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("failed to start runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

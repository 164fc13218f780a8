//! Key-pair generation.
//!
//! Produces RSA key pairs as PEM: the public key as SPKI, the private key as
//! PKCS#8. A non-empty passphrase encrypts the private key (PBES2, scrypt
//! and AES-256-CBC); an empty one leaves it unencrypted.

use std::fmt;

use async_trait::async_trait;
use pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::RsaPrivateKey;
use tracing::{debug, trace};
use zeroize::Zeroizing;

use crate::core::constants::{MIN_RSA_KEY_BITS, RSA_KEY_BITS};
use crate::core::types::Pem;
use crate::error::GenerationError;

/// A freshly generated key pair.
///
/// The private half is wiped from memory on drop.
pub struct KeyPair {
    pub public_key: Pem,
    pub private_key: Zeroizing<Pem>,
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key)
            .field("private_key", &format_args!("<redacted>"))
            .finish()
    }
}

/// Source of new key pairs.
///
/// Implementations may take a long time; callers await them one at a time.
#[async_trait]
pub trait KeyPairGenerator: Send + Sync {
    /// Generate a key pair, encrypting the private key under `passphrase`
    /// unless it is empty.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError` if the primitive or the encoding fails.
    async fn generate(&self, passphrase: &str) -> Result<KeyPair, GenerationError>;
}

/// RSA key-pair generator.
#[derive(Debug, Clone)]
pub struct RsaGenerator {
    bits: usize,
}

impl Default for RsaGenerator {
    fn default() -> Self {
        Self { bits: RSA_KEY_BITS }
    }
}

impl RsaGenerator {
    /// Generator with the default 4096-bit modulus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Generator with a custom modulus size.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::KeySize` below the 4096-bit minimum.
    pub fn with_bits(bits: usize) -> Result<Self, GenerationError> {
        if bits < MIN_RSA_KEY_BITS {
            return Err(GenerationError::KeySize {
                bits,
                minimum: MIN_RSA_KEY_BITS,
            });
        }
        Ok(Self { bits })
    }

    pub fn bits(&self) -> usize {
        self.bits
    }

    #[cfg(test)]
    fn unchecked(bits: usize) -> Self {
        Self { bits }
    }
}

#[async_trait]
impl KeyPairGenerator for RsaGenerator {
    async fn generate(&self, passphrase: &str) -> Result<KeyPair, GenerationError> {
        let bits = self.bits;
        let passphrase = Zeroizing::new(passphrase.to_string());

        debug!(bits, encrypted = !passphrase.is_empty(), "generating RSA key pair");

        tokio::task::spawn_blocking(move || generate_rsa(bits, &passphrase))
            .await
            .map_err(|e| GenerationError::Task(e.to_string()))?
    }
}

fn generate_rsa(bits: usize, passphrase: &str) -> Result<KeyPair, GenerationError> {
    let mut rng = rand::thread_rng();
    let private = RsaPrivateKey::new(&mut rng, bits)?;

    let public_key = private.to_public_key().to_public_key_pem(LineEnding::LF)?;
    let private_key = if passphrase.is_empty() {
        private.to_pkcs8_pem(LineEnding::LF)?
    } else {
        private.to_pkcs8_encrypted_pem(&mut rng, passphrase.as_bytes(), LineEnding::LF)?
    };

    trace!(
        public_len = public_key.len(),
        private_len = private_key.len(),
        "encoded RSA key pair"
    );

    Ok(KeyPair {
        public_key,
        private_key,
    })
}

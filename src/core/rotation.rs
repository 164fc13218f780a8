//! Single-credential rotation.
//!
//! Rotating a credential writes four slots in a fixed order:
//!
//! 1. current public value → `<NAME>_PUBLIC_KEY_PREV`
//! 2. current private value → `<NAME>_PRIVATE_KEY_PREV`
//! 3. (generate a new key pair)
//! 4. new public key → `<NAME>_PUBLIC_KEY`
//! 5. new private key → `<NAME>_PRIVATE_KEY`
//!
//! A failed write is recorded and the next one still runs. Only a key
//! generation failure stops the rotation.

use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::core::audit;
use crate::core::keygen::KeyPairGenerator;
use crate::core::pair::CredentialPair;
use crate::core::sink::{self, RotationResult, SecretSink, Visibility};
use crate::core::types::{CredentialName, SlotName};
use crate::error::{GenerationError, PublishError, Result};

/// Outcome of writing one slot.
#[derive(Debug)]
pub struct PublishOutcome {
    pub slot: SlotName,
    pub result: std::result::Result<RotationResult, PublishError>,
}

impl PublishOutcome {
    /// The store response, including rejected ones. `None` when no
    /// response was received.
    pub fn response(&self) -> Option<&RotationResult> {
        match &self.result {
            Ok(result) => Some(result),
            Err(e) => e.result(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Ordered outcomes of one credential's rotation.
#[derive(Debug)]
pub struct StepReport {
    pub name: CredentialName,
    pub outcomes: Vec<PublishOutcome>,
}

impl StepReport {
    /// Response of the last write that received one.
    pub fn last_result(&self) -> Option<&RotationResult> {
        self.outcomes.iter().rev().find_map(PublishOutcome::response)
    }

    pub fn failures(&self) -> impl Iterator<Item = &PublishOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(PublishOutcome::is_success)
    }
}

/// Rotates credentials against one sink with one generator.
pub struct Rotator<'a, S: ?Sized, G: ?Sized> {
    sink: &'a S,
    generator: &'a G,
    visibility: Option<Visibility>,
    passphrase: Zeroizing<String>,
}

impl<'a, S, G> Rotator<'a, S, G>
where
    S: SecretSink + ?Sized,
    G: KeyPairGenerator + ?Sized,
{
    pub fn new(sink: &'a S, generator: &'a G) -> Self {
        Self {
            sink,
            generator,
            visibility: None,
            passphrase: Zeroizing::new(String::new()),
        }
    }

    /// Visibility attached to every write when the sink is organization
    /// scoped.
    pub fn with_visibility(mut self, visibility: Option<Visibility>) -> Self {
        self.visibility = visibility;
        self
    }

    /// Passphrase protecting generated private keys. Empty by default.
    pub fn with_passphrase(mut self, passphrase: impl Into<String>) -> Self {
        self.passphrase = Zeroizing::new(passphrase.into());
        self
    }

    /// Rotate one credential pair.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError` if a new key pair cannot be produced. Write
    /// failures are not errors; they are recorded in the report.
    pub async fn rotate(&self, pair: &CredentialPair) -> Result<StepReport> {
        let mut report = StepReport {
            name: pair.name.clone(),
            outcomes: Vec::with_capacity(4),
        };
        self.rotate_into(pair, &mut report).await?;
        Ok(report)
    }

    /// Rotate one credential pair, appending outcomes to `report` as they
    /// happen.
    ///
    /// On a generation failure `report` keeps the writes that already ran.
    pub(crate) async fn rotate_into(
        &self,
        pair: &CredentialPair,
        report: &mut StepReport,
    ) -> std::result::Result<(), GenerationError> {
        let slots = pair.slots();
        info!(
            credential = %pair.name,
            public = %audit::preview(&pair.public),
            private = %audit::preview(&pair.private),
            "archiving current values"
        );

        report
            .outcomes
            .push(self.publish(&slots.public_prev, &pair.public).await);
        report
            .outcomes
            .push(self.publish(&slots.private_prev, &pair.private).await);

        let fresh = self.generator.generate(&self.passphrase).await?;
        info!(
            credential = %pair.name,
            fingerprint = %audit::fingerprint(&fresh.public_key),
            public = %audit::preview(&fresh.public_key),
            private = %audit::preview(&fresh.private_key),
            "generated new key pair"
        );

        report
            .outcomes
            .push(self.publish(&slots.public, &fresh.public_key).await);
        report
            .outcomes
            .push(self.publish(&slots.private, &fresh.private_key).await);

        if report.is_success() {
            info!(credential = %pair.name, "rotated");
        } else {
            warn!(
                credential = %pair.name,
                failed = report.failures().count(),
                "rotated with failed writes"
            );
        }
        Ok(())
    }

    async fn publish(&self, slot: &str, value: &str) -> PublishOutcome {
        let result = sink::set_secret(self.sink, self.visibility.as_ref(), slot, value).await;
        if let Err(e) = &result {
            warn!(slot, error = %e, "write failed, continuing");
        }
        PublishOutcome {
            slot: slot.to_string(),
            result,
        }
    }
}

//! Batch rotation.
//!
//! Parses the credential list, rotates each pair in input order, and
//! returns every outcome. Callers pick how to turn the report into a run
//! status with [`FailurePolicy`].

use tracing::{debug, error, info};

use crate::core::keygen::KeyPairGenerator;
use crate::core::pair::{self, CredentialPair};
use crate::core::rotation::{PublishOutcome, Rotator, StepReport};
use crate::core::sink::{RotationResult, SecretSink};
use crate::error::{Error, Result};

/// How a batch report maps to success or failure.
#[derive(clap::ValueEnum, serde::Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Fail only if the last completed write was rejected.
    ///
    /// Earlier failures are masked by a later success.
    #[default]
    Last,
    /// Fail if any write failed.
    Any,
}

/// Outcomes of a whole batch, in processing order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub steps: Vec<StepReport>,
}

impl BatchReport {
    /// Response of the most recent write that received one, across the
    /// whole batch.
    pub fn last_result(&self) -> Option<&RotationResult> {
        self.steps.iter().rev().find_map(StepReport::last_result)
    }

    /// Every failed write, in order.
    pub fn failures(&self) -> impl Iterator<Item = &PublishOutcome> {
        self.steps.iter().flat_map(|step| step.failures())
    }

    pub fn publish_count(&self) -> usize {
        self.steps.iter().map(|step| step.outcomes.len()).sum()
    }

    /// The chronologically last write of the batch, whatever its outcome.
    pub fn last_outcome(&self) -> Option<&PublishOutcome> {
        self.steps.iter().rev().find_map(|step| step.outcomes.last())
    }

    /// Whether the run should be reported as failed under `policy`.
    ///
    /// A batch in which no write received a response always fails. Under
    /// [`FailurePolicy::Last`] the final write decides, including one that
    /// got no response at all.
    pub fn is_failure(&self, policy: FailurePolicy) -> bool {
        if self.last_result().is_none() {
            return true;
        }
        match policy {
            FailurePolicy::Last => self.last_outcome().map_or(true, |o| !o.is_success()),
            FailurePolicy::Any => self.failures().next().is_some(),
        }
    }
}

/// Parse `raw` and rotate every pair in it.
///
/// # Errors
///
/// Returns `InputError` before any write if `raw` is malformed or empty,
/// and `Error::Aborted` if key generation fails, in which case the
/// remaining pairs are not processed.
pub async fn run<S, G>(rotator: &Rotator<'_, S, G>, raw: &str) -> Result<BatchReport>
where
    S: SecretSink + ?Sized,
    G: KeyPairGenerator + ?Sized,
{
    let pairs = pair::parse_pairs(raw)?;
    run_pairs(rotator, &pairs).await
}

/// Rotate already-validated pairs sequentially.
///
/// # Errors
///
/// Returns `Error::Aborted` if key generation fails. The error carries the
/// report up to and including the archive writes of the failed credential.
pub async fn run_pairs<S, G>(
    rotator: &Rotator<'_, S, G>,
    pairs: &[CredentialPair],
) -> Result<BatchReport>
where
    S: SecretSink + ?Sized,
    G: KeyPairGenerator + ?Sized,
{
    info!(count = pairs.len(), "rotating credential pairs");

    let mut report = BatchReport::default();
    for (index, pair) in pairs.iter().enumerate() {
        debug!(index, credential = %pair.name, "starting rotation");
        let mut step = StepReport {
            name: pair.name.clone(),
            outcomes: Vec::with_capacity(4),
        };
        let result = rotator.rotate_into(pair, &mut step).await;
        report.steps.push(step);

        if let Err(source) = result {
            error!(credential = %pair.name, error = %source, "key generation failed, stopping batch");
            return Err(Error::Aborted {
                credential: pair.name.clone(),
                source,
                report: Box::new(report),
            });
        }
    }

    info!(
        credentials = report.steps.len(),
        writes = report.publish_count(),
        failed = report.failures().count(),
        "batch complete"
    );
    Ok(report)
}

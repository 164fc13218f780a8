//! Rotate command.
//!
//! Resolves configuration, rotates every credential pair against GitHub,
//! prints a per-slot summary and sets the `status` and `data` outputs from
//! the last completed write.

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use crate::cli::{actions, output};
use crate::core::batch::{self, BatchReport, FailurePolicy};
use crate::core::config::{Config, FileConfig, Inputs};
use crate::core::keygen::RsaGenerator;
use crate::core::rotation::{PublishOutcome, Rotator};
use crate::core::sink::GitHubSink;
use crate::error::{ConfigError, Error, PublishError, Result};

/// Arguments for `keyrot rotate`.
///
/// Every flag can also be given as the matching workflow input variable.
#[derive(Args, Debug, Default)]
pub struct RotateArgs {
    /// Credential pairs: JSON array of {"name", "public", "private"}
    #[arg(long, env = "INPUT_PAIRS", hide_env_values = true)]
    pub pairs: Option<String>,

    /// Read credential pairs from a file (takes precedence over --pairs)
    #[arg(long, value_name = "PATH")]
    pub pairs_file: Option<PathBuf>,

    /// Target repository (owner/name), or organization with --org
    #[arg(long, env = "INPUT_REPOSITORY")]
    pub repository: Option<String>,

    /// Repository of the running workflow, used when --repository is unset
    #[arg(long, env = "GITHUB_REPOSITORY", hide = true)]
    pub default_repository: Option<String>,

    /// Access token with permission to write secrets
    #[arg(long, env = "INPUT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Write organization secrets (any value except false/0/no)
    #[arg(long, env = "INPUT_ORG")]
    pub org: Option<String>,

    /// Organization secret visibility: all, private or selected
    #[arg(long, env = "INPUT_VISIBILITY")]
    pub visibility: Option<String>,

    /// Repository ids for `selected` visibility (comma separated or JSON array)
    #[arg(long, env = "INPUT_SELECTED_REPOSITORY_IDS")]
    pub selected_repository_ids: Option<String>,

    /// Passphrase for generated private keys (empty: unencrypted)
    #[arg(long, env = "INPUT_PASSPHRASE", hide_env_values = true)]
    pub passphrase: Option<String>,

    /// When to fail the run
    #[arg(long, value_enum, env = "INPUT_FAIL_ON")]
    pub fail_on: Option<FailurePolicy>,

    /// GitHub API base URL
    #[arg(long, env = "GITHUB_API_URL")]
    pub api_url: Option<String>,

    /// HTTP timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// TOML config file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl RotateArgs {
    fn inputs(&self) -> Inputs {
        Inputs {
            repository: self.repository.clone(),
            default_repository: self.default_repository.clone(),
            token: self.token.clone(),
            org: self.org.clone(),
            visibility: self.visibility.clone(),
            selected_repository_ids: self.selected_repository_ids.clone(),
            api_url: self.api_url.clone(),
            fail_on: self.fail_on,
            passphrase: self.passphrase.clone(),
            timeout_secs: self.timeout,
        }
    }

    fn raw_pairs(&self) -> Result<String> {
        if let Some(path) = &self.pairs_file {
            return Ok(std::fs::read_to_string(path)?);
        }
        self.pairs
            .clone()
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingPairs.into())
    }
}

/// Execute a rotation run.
pub fn execute(args: RotateArgs) -> Result<()> {
    let raw = args.raw_pairs()?;
    let file = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let config = Config::resolve(args.inputs(), file)?;

    let sink = GitHubSink::new(
        &config.api_url,
        &config.token,
        config.target.clone(),
        config.timeout,
    )?;
    let generator = RsaGenerator::new();
    let rotator = Rotator::new(&sink, &generator)
        .with_visibility(config.visibility.clone())
        .with_passphrase(config.passphrase.as_str());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(ConfigError::Runtime)?;

    output::section("Key Rotation");
    output::kv("target:", &config.target);
    if let Some(visibility) = &config.visibility {
        output::kv("visibility:", visibility.as_str());
    }

    let report = match runtime.block_on(batch::run(&rotator, &raw)) {
        Ok(report) => report,
        Err(e) => {
            // Writes made before a generation failure are still reported.
            if let Error::Aborted { report, .. } = &e {
                summarize(report);
                set_outputs(report)?;
            }
            return Err(e);
        }
    };
    summarize(&report);
    set_outputs(&report)?;
    finish(&report, config.policy)
}

fn summarize(report: &BatchReport) {
    for step in &report.steps {
        output::section(&step.name);
        for outcome in &step.outcomes {
            match &outcome.result {
                Ok(result) => output::slot_written(&outcome.slot, result.status),
                Err(_) => output::slot_failed(&failure_line(outcome)),
            }
        }
    }
    println!();
}

/// Summary text for a failed write, always naming the slot.
fn failure_line(outcome: &PublishOutcome) -> String {
    match &outcome.result {
        Err(e) if e.slot() == Some(outcome.slot.as_str()) => e.to_string(),
        Err(e) => format!("{}: {}", outcome.slot, e),
        Ok(result) => format!("{}: {}", outcome.slot, result.status),
    }
}

/// Set `status` and `data` from the last write that got a response.
fn set_outputs(report: &BatchReport) -> Result<()> {
    if let Some(last) = report.last_result() {
        actions::set_output("status", &last.status.to_string())?;
        actions::set_output("data", &last.data)?;
    }
    Ok(())
}

/// Map the report to the run status.
fn finish(report: &BatchReport, policy: FailurePolicy) -> Result<()> {
    if !report.is_failure(policy) {
        info!(policy = ?policy, "rotation succeeded");
        output::success(&format!(
            "rotated {} credential(s), {} write(s)",
            report.steps.len(),
            report.publish_count()
        ));
        return Ok(());
    }

    let message = match (report.last_outcome(), report.last_result(), policy) {
        (_, None, _) => "no publish call completed".to_string(),
        (Some(outcome), Some(_), FailurePolicy::Last) => match &outcome.result {
            Err(PublishError::Rejected { result, .. }) => {
                format!("last write answered {}: {}", result.status, result.data)
            }
            _ => format!("last write failed: {}", failure_line(outcome)),
        },
        (_, Some(_), _) => format!(
            "{} of {} write(s) failed",
            report.failures().count(),
            report.publish_count()
        ),
    };
    Err(Error::Failed(message))
}

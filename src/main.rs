//! Keyrot - rotate RSA credential pairs stored as GitHub Actions secrets.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use keyrot::cli::{actions, execute, output, Cli};
use keyrot::core::constants::LOG_ENV;
use keyrot::error::{ConfigError, Error};

fn main() {
    let cli = Cli::parse();

    // Rotation steps are logged at info level as the audit trace.
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("keyrot=debug")
        } else {
            EnvFilter::new("keyrot=info")
        }
    });

    let json = cli.json_logs;
    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| {
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr)
        }))
        .init();

    if let Err(e) = execute(cli.command) {
        let error_msg = e.to_string();
        let suggestion = match &e {
            Error::Config(ConfigError::MissingToken) => Some("pass --token or set INPUT_TOKEN"),
            Error::Config(ConfigError::MissingRepository) => {
                Some("pass --repository owner/name or set INPUT_REPOSITORY")
            }
            Error::Config(ConfigError::MissingPairs) => {
                Some("pass --pairs, --pairs-file or set INPUT_PAIRS")
            }
            Error::Input(_) => Some(r#"pairs must look like [{"name": "SVC", "public": "...", "private": "..."}]"#),
            _ => None,
        };

        output::error(&error_msg);
        actions::error_annotation(&error_msg);
        if let Some(hint) = suggestion {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}

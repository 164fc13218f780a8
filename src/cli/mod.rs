//! Command-line interface.

pub mod actions;
pub mod completions;
pub mod output;
pub mod rotate;

use clap::{Parser, Subcommand};

/// Keyrot - rotate RSA credential pairs stored as GitHub Actions secrets.
#[derive(Parser)]
#[command(
    name = "keyrot",
    about = "Rotate RSA credential pairs stored as GitHub Actions secrets",
    version
)]
pub struct Cli {
    /// Show debug logs
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Archive current key pairs to *_PREV and publish fresh ones
    Rotate(rotate::RotateArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Execute a command.
pub fn execute(command: Command) -> crate::error::Result<()> {
    match command {
        Command::Rotate(args) => rotate::execute(args),
        Command::Completions { shell } => completions::execute(shell),
    }
}

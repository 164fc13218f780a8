//! GitHub Actions workflow commands.
//!
//! Outputs go to the file named by `GITHUB_OUTPUT` using the multi-line
//! delimiter syntax; annotations are printed as `::error::` commands.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::cli::output;
use crate::error::Result;

/// Whether we are running inside a workflow.
pub fn is_actions() -> bool {
    std::env::var("GITHUB_ACTIONS").map_or(false, |v| v == "true")
}

/// Set a step output, or print it when not in a workflow.
pub fn set_output(name: &str, value: &str) -> Result<()> {
    match std::env::var_os("GITHUB_OUTPUT") {
        Some(path) if !path.is_empty() => {
            write_output(Path::new(&path), name, value)?;
            debug!(name, "wrote step output");
        }
        _ => output::kv(&format!("{}:", name), value),
    }
    Ok(())
}

/// Append `name=value` to an output file in delimiter form.
pub fn write_output(path: &Path, name: &str, value: &str) -> std::io::Result<()> {
    let delimiter = loop {
        let candidate = format!("ghadelimiter_{:016x}", rand::random::<u64>());
        if !value.contains(&candidate) {
            break candidate;
        }
    };

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}<<{}", name, delimiter)?;
    writeln!(file, "{}", value)?;
    writeln!(file, "{}", delimiter)?;
    Ok(())
}

/// Emit an error annotation when in a workflow.
pub fn error_annotation(message: &str) {
    if is_actions() {
        println!("::error::{}", escape_data(message));
    }
}

fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

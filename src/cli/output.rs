//! Terminal output for rotation runs.
//!
//! Human-readable output goes to stdout; errors and hints go to stderr so
//! they stay visible when stdout is captured. Color is dropped when
//! `NO_COLOR` is set.

use console::style;
use std::fmt::Display;

const RULE_WIDTH: usize = 56;

fn colors_enabled() -> bool {
    std::env::var("NO_COLOR").is_err()
}

/// `✓ msg` in green.
pub fn success(msg: &str) {
    if colors_enabled() {
        println!("{} {}", style("✓").green(), msg);
    } else {
        println!("✓ {}", msg);
    }
}

/// `✗ msg` in red, on stderr.
pub fn error(msg: &str) {
    if colors_enabled() {
        eprintln!("{} {}", style("✗").red(), msg);
    } else {
        eprintln!("✗ {}", msg);
    }
}

/// `→ msg` in cyan, on stderr.
///
/// Example: `→ pass --token or set INPUT_TOKEN`
pub fn hint(msg: &str) {
    if colors_enabled() {
        eprintln!("{} {}", style("→").cyan(), style(msg).cyan());
    } else {
        eprintln!("→ {}", msg);
    }
}

/// Aligned `label  value` line.
///
/// Example: `  target:  octo/hello`
pub fn kv(label: &str, value: impl Display) {
    if colors_enabled() {
        println!(
            "  {}  {}",
            style(label).dim(),
            style(value.to_string()).bold()
        );
    } else {
        println!("  {}  {}", label, value);
    }
}

/// Blank line, bold title and a rule.
pub fn section(title: &str) {
    println!();
    if colors_enabled() {
        println!("{}", style(title).bold());
        println!("{}", style("─".repeat(RULE_WIDTH)).dim());
    } else {
        println!("{}", title);
        println!("{}", "─".repeat(RULE_WIDTH));
    }
}

/// A write the store accepted.
///
/// Example: `✓ SVC_PUBLIC_KEY (201)`
pub fn slot_written(slot: &str, status: u16) {
    let slot = if colors_enabled() {
        style(slot).cyan().to_string()
    } else {
        slot.to_string()
    };
    success(&format!("{} ({})", slot, status));
}

/// A write that failed, with the reason.
///
/// Example: `⚠ SVC_PUBLIC_KEY: secret store answered 422 ...`
pub fn slot_failed(reason: &str) {
    if colors_enabled() {
        println!("{} {}", style("⚠").yellow(), style(reason).yellow());
    } else {
        println!("⚠ {}", reason);
    }
}

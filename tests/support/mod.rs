//! Test support utilities for keyrot integration tests.
//!
//! Provides an isolated CLI environment and in-memory fakes for the secret
//! store and key generator.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;
pub mod fakes;
pub mod fixtures;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fakes::*;
#[allow(unused_imports)]
pub use fixtures::*;

use tempfile::TempDir;

/// Test environment with an isolated working directory.
///
/// Child processes use `.current_dir()` and a scrubbed environment, so
/// tests can safely run in parallel and never see the runner's own inputs.
pub struct Test {
    /// Temporary working directory
    pub dir: TempDir,
}

impl Test {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        Self { dir }
    }

    /// Write a file into the working directory and return its path.
    pub fn write(&self, name: &str, contents: &str) -> std::path::PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, contents).expect("failed to write fixture file");
        path
    }
}

//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::process::Output;

/// Variables the binary reads that must not leak in from the runner.
const SCRUBBED_ENV: &[&str] = &[
    "INPUT_PAIRS",
    "INPUT_REPOSITORY",
    "INPUT_TOKEN",
    "INPUT_ORG",
    "INPUT_VISIBILITY",
    "INPUT_SELECTED_REPOSITORY_IDS",
    "INPUT_PASSPHRASE",
    "INPUT_FAIL_ON",
    "GITHUB_REPOSITORY",
    "GITHUB_API_URL",
    "GITHUB_OUTPUT",
    "GITHUB_ACTIONS",
    "KEYROT_LOG",
];

impl Test {
    /// Create a keyrot command with a clean environment.
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("keyrot").expect("failed to find keyrot binary");
        for var in SCRUBBED_ENV {
            cmd.env_remove(var);
        }
        cmd.env("NO_COLOR", "1");
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// `keyrot rotate` against `api_url` with a token and repository set.
    pub fn rotate(&self, api_url: &str, pairs: &str, extra: &[&str]) -> Output {
        self.cmd()
            .args([
                "rotate",
                "--token",
                "ghp_test",
                "--repository",
                "octo/hello",
                "--api-url",
                api_url,
                "--pairs",
                pairs,
            ])
            .args(extra)
            .output()
            .expect("failed to run keyrot rotate")
    }
}

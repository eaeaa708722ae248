use std::path::PathBuf;
use tempfile::TempDir;

/// Helper struct for managing test resources
pub struct TestContext {
    /// Temporary directory for scenario and config files
    pub temp_dir: TempDir,
}

impl TestContext {
    pub fn new() -> Result<Self, std::io::Error> {
        let temp_dir = TempDir::new()?;
        Ok(TestContext { temp_dir })
    }

    pub fn temp_path(&self) -> PathBuf {
        self.temp_dir.path().to_path_buf()
    }

    /// Write a file into the temporary directory
    pub fn create_file(&self, name: &str, content: &str) -> Result<PathBuf, std::io::Error> {
        let file_path = self.temp_path().join(name);
        std::fs::write(&file_path, content)?;
        Ok(file_path)
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new().expect("Failed to create test context")
    }
}

/// The skip-client command, run from a scratch directory so that no
/// `.skip-client.toml` in the checkout is picked up.
#[allow(deprecated)]
pub fn cmd(ctx: &TestContext) -> assert_cmd::Command {
    let mut cmd =
        assert_cmd::Command::cargo_bin("skip-client").expect("Failed to find skip-client binary");
    cmd.current_dir(ctx.temp_path())
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("SKIP_CLIENT_JSON");
    cmd
}

/// Two small scenarios in the bare JSON layout
pub fn two_scenarios_json() -> &'static str {
    r#"[
        [{"type": "request", "payload": {"resource": "computed"}}],
        [
            {"type": "write", "payload": [{"collection": "cells", "entries": [["A1", ["1"]]]}]},
            {"type": "log", "payload": {"resource": "computed"}}
        ]
    ]"#
}

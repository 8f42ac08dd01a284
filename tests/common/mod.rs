#![allow(dead_code)]

pub mod server;

use std::process::{Command, Output};
use tempfile::TempDir;

/// Helper struct to run puzzle-browser commands in an isolated temp directory
pub struct BrowserTest {
    pub temp_dir: TempDir,
    binary_path: &'static str,
    backend_url: Option<String>,
}

impl BrowserTest {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");

        BrowserTest {
            temp_dir,
            binary_path: env!("CARGO_BIN_EXE_puzzle-browser"),
            backend_url: None,
        }
    }

    /// Point commands at `url` through the environment override
    pub fn with_backend(mut self, url: &str) -> Self {
        self.backend_url = Some(url.to_string());
        self
    }

    pub fn run(&self, args: &[&str]) -> Output {
        let mut command = Command::new(self.binary_path);
        command
            .args(args)
            .current_dir(self.temp_dir.path())
            .env_remove("PUZZLE_BROWSER_ROOT")
            .env_remove("PUZZLE_BROWSER_BACKEND_URL")
            .env("NO_COLOR", "1")
            .env("RUST_LOG", "off");
        if let Some(url) = &self.backend_url {
            command.env("PUZZLE_BROWSER_BACKEND_URL", url);
        }
        command
            .output()
            .expect("Failed to execute puzzle-browser command")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            panic!(
                "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
                args,
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            !output.status.success(),
            "Expected command {:?} to fail, but it succeeded",
            args
        );
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    pub fn run_json(&self, args: &[&str]) -> serde_json::Value {
        let stdout = self.run_success(args);
        serde_json::from_str(&stdout).expect("Command output was not valid JSON")
    }

    pub fn config_path(&self) -> std::path::PathBuf {
        self.temp_dir.path().join(".puzzle-browser").join("config.yaml")
    }
}

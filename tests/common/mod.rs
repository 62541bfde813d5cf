//! Common test utilities and fixtures
//!
//! Fixture paths plus a helper that runs the real binary on a free port.

#![allow(dead_code)]

use std::fs;
use std::net::TcpListener;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::time::Duration;

use tempfile::TempDir;

/// Get the path to the test fixtures directory
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Get a path to a specific fixture file
pub fn fixture_path(name: &str) -> PathBuf {
    fixtures_dir().join(name)
}

pub fn valid_config_fixture() -> PathBuf {
    fixture_path("valid_config.toml")
}

pub fn invalid_config_fixture() -> PathBuf {
    fixture_path("invalid_config.toml")
}

fn free_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .and_then(|l| l.local_addr())
        .map(|a| a.port())
        .expect("Failed to find a free port")
}

/// A `living-map serve` process bound to 127.0.0.1 on a free port
///
/// The process is killed when the value is dropped.
pub struct TestServer {
    pub base_url: String,
    child: Child,
    _root: TempDir,
}

impl TestServer {
    /// Start with the default mock generator
    pub async fn start() -> Self {
        Self::start_with("").await
    }

    /// Start with extra TOML appended to the generated config
    pub async fn start_with(extra_toml: &str) -> Self {
        let root = TempDir::new().expect("Failed to create temp directory");
        let config_path = root.path().join("living-map.toml");
        let port = free_port();

        let config = format!(
            "[server]\nhost = \"127.0.0.1\"\nport = {port}\n\n[logging]\nlevel = \"warn\"\n\n{extra_toml}\n"
        );
        fs::write(&config_path, config).expect("Failed to write config");

        let child = Command::new(env!("CARGO_BIN_EXE_living-map"))
            .arg("--quiet")
            .arg("serve")
            .arg("--config")
            .arg(&config_path)
            .env_remove("LIVING_MAP_PORT")
            .env_remove("LIVING_MAP_HOST")
            .env_remove("LIVING_MAP_GENERATOR")
            .env_remove("LIVING_MAP_MOCK_FAIL_WITH")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .expect("Failed to spawn living-map");

        let server = Self {
            base_url: format!("http://127.0.0.1:{port}"),
            child,
            _root: root,
        };
        server.wait_ready().await;
        server
    }

    async fn wait_ready(&self) {
        let client = reqwest::Client::new();
        for _ in 0..100 {
            if let Ok(res) = client.get(self.url("/health")).send().await {
                if res.status().is_success() {
                    return;
                }
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        panic!("living-map did not become ready at {}", self.base_url);
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures_dir_exists() {
        assert!(fixtures_dir().exists(), "Fixtures directory should exist");
    }

    #[test]
    fn test_valid_config_exists() {
        assert!(valid_config_fixture().exists());
    }

    #[test]
    fn test_invalid_config_exists() {
        assert!(invalid_config_fixture().exists());
    }
}

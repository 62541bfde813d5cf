//! Configuration system for the Living Map server
//!
//! Supports multiple configuration sources with the following precedence (highest to lowest):
//! 1. CLI arguments
//! 2. Environment variables (LIVING_MAP_* prefix)
//! 3. Configuration file (TOML)
//! 4. Default values

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::generation::{GeneratorType, DEFAULT_MOCK_VIDEO_URL};

/// Main server configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// HTTP listener settings
    pub server: ServerSettings,

    /// Video generation adapter settings
    pub generator: GeneratorSettings,

    /// Logging configuration
    pub logging: LoggingSettings,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Interface to bind
    pub host: String,

    /// TCP port to bind
    pub port: u16,

    /// Tokio worker threads (0 = runtime default)
    pub worker_threads: usize,

    /// Send permissive CORS headers
    pub enable_cors: bool,
}

/// Video generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    /// Which generator to use: mock, minimax
    pub backend: String,

    /// Upper bound for one whole generation call, in seconds
    pub timeout_secs: u64,

    /// Mock generator settings
    pub mock: MockSettings,

    /// MiniMax video API settings
    pub minimax: MiniMaxSettings,
}

/// Mock generator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MockSettings {
    /// Video returned for every prompt
    pub video_url: String,

    /// Artificial delay before answering, in milliseconds
    pub latency_ms: u64,

    /// When set, every generation fails with this message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fail_with: Option<String>,
}

/// MiniMax video generation API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MiniMaxSettings {
    /// API base URL
    pub base_url: String,

    /// API key (required when backend = "minimax")
    pub api_key: String,

    /// Video model identifier
    pub model: String,

    /// Timeout for each individual HTTP request, in seconds
    pub request_timeout_secs: u64,

    /// Delay between task status polls, in milliseconds
    pub poll_interval_ms: u64,

    /// Number of status polls before giving up
    pub max_poll_attempts: u32,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level: trace, debug, info, warn, error
    pub level: String,

    /// Log file path (empty = no file logging)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Number of rotated log files to keep
    pub max_files: u32,

    /// Enable JSON formatted logging
    pub json_format: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            worker_threads: 0,
            enable_cors: true,
        }
    }
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            backend: "mock".to_string(),
            timeout_secs: 600,
            mock: MockSettings::default(),
            minimax: MiniMaxSettings::default(),
        }
    }
}

impl Default for MockSettings {
    fn default() -> Self {
        Self {
            video_url: DEFAULT_MOCK_VIDEO_URL.to_string(),
            latency_ms: 0,
            fail_with: None,
        }
    }
}

impl Default for MiniMaxSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.minimax.io".to_string(),
            api_key: String::new(),
            model: "video-01".to_string(),
            request_timeout_secs: 30,
            poll_interval_ms: 5000,
            max_poll_attempts: 100,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            max_files: 5,
            json_format: false,
        }
    }
}

impl MapConfig {
    /// Load configuration from file with environment variable overrides
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = Self::find_config_file(config_path)? {
            debug!(path = %path.display(), "Loading configuration file");
            let content = fs::read_to_string(&path).map_err(|e| Error::ConfigNotFound {
                path: path.clone(),
                source: Some(e),
            })?;
            config = toml::from_str(&content).map_err(|e| {
                Error::config_parse(format!("{}: {}", path.display(), e.message()), e)
            })?;
            info!(path = %path.display(), "Configuration loaded from file");
        }

        config.apply_env_overrides();
        config.expand_paths();
        config.validate()?;

        Ok(config)
    }

    /// Apply `--host` / `--port` overrides and re-validate
    pub fn with_listen_overrides(mut self, host: Option<String>, port: Option<u16>) -> Result<Self> {
        if let Some(host) = host {
            self.server.host = host;
        }
        if let Some(port) = port {
            self.server.port = port;
        }
        self.validate()?;
        Ok(self)
    }

    /// Address string the server binds to
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    fn find_config_file(explicit_path: Option<&str>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit_path {
            let path = PathBuf::from(expand_path(path));
            if path.exists() {
                return Ok(Some(path));
            }
            return Err(Error::config_not_found(path));
        }

        let search_paths = [
            PathBuf::from("living-map.toml"),
            dirs::config_dir()
                .map(|p| p.join("living-map").join("config.toml"))
                .unwrap_or_default(),
            dirs::home_dir()
                .map(|p| p.join(".living-map").join("config.toml"))
                .unwrap_or_default(),
            PathBuf::from("/etc/living-map/config.toml"),
        ];

        for path in &search_paths {
            if !path.as_os_str().is_empty() && path.exists() {
                debug!(path = %path.display(), "Found configuration file");
                return Ok(Some(path.clone()));
            }
        }

        debug!("No configuration file found, using defaults");
        Ok(None)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("LIVING_MAP_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("LIVING_MAP_PORT") {
            if let Ok(n) = val.parse() {
                self.server.port = n;
            }
        }
        if let Ok(val) = std::env::var("LIVING_MAP_WORKER_THREADS") {
            if let Ok(n) = val.parse() {
                self.server.worker_threads = n;
            }
        }
        if let Ok(val) = std::env::var("LIVING_MAP_ENABLE_CORS") {
            self.server.enable_cors = parse_bool(&val);
        }

        if let Ok(val) = std::env::var("LIVING_MAP_GENERATOR") {
            self.generator.backend = val;
        }
        if let Ok(val) = std::env::var("LIVING_MAP_GENERATOR_TIMEOUT_SECS") {
            if let Ok(n) = val.parse() {
                self.generator.timeout_secs = n;
            }
        }
        if let Ok(val) = std::env::var("LIVING_MAP_MOCK_VIDEO_URL") {
            self.generator.mock.video_url = val;
        }
        if let Ok(val) = std::env::var("LIVING_MAP_MOCK_FAIL_WITH") {
            self.generator.mock.fail_with = Some(val).filter(|v| !v.is_empty());
        }
        if let Ok(val) = std::env::var("LIVING_MAP_MINIMAX_BASE_URL") {
            self.generator.minimax.base_url = val;
        }
        if let Ok(val) = std::env::var("LIVING_MAP_MINIMAX_API_KEY") {
            self.generator.minimax.api_key = val;
        }
        if let Ok(val) = std::env::var("LIVING_MAP_MINIMAX_MODEL") {
            self.generator.minimax.model = val;
        }

        if let Ok(val) = std::env::var("LIVING_MAP_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = std::env::var("LIVING_MAP_LOG_FILE") {
            self.logging.file = Some(val);
        }
        if let Ok(val) = std::env::var("LIVING_MAP_LOG_JSON") {
            self.logging.json_format = parse_bool(&val);
        }
    }

    fn expand_paths(&mut self) {
        if let Some(ref file) = self.logging.file {
            self.logging.file = Some(expand_path(file));
        }
    }

    fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(Error::config_field_invalid("server.host", "host cannot be empty"));
        }

        let backend = GeneratorType::from_str(&self.generator.backend).ok_or_else(|| {
            Error::config_field_invalid(
                "generator.backend",
                format!(
                    "unknown generator '{}'. Must be one of: {}",
                    self.generator.backend,
                    GeneratorType::all()
                        .iter()
                        .map(|t| t.name())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            )
        })?;

        if self.generator.timeout_secs == 0 {
            return Err(Error::config_field_invalid(
                "generator.timeout_secs",
                "timeout must be greater than zero",
            ));
        }

        validate_http_url("generator.mock.video_url", &self.generator.mock.video_url)?;

        if backend == GeneratorType::MiniMax {
            let minimax = &self.generator.minimax;
            validate_http_url("generator.minimax.base_url", &minimax.base_url)?;
            if minimax.api_key.is_empty() {
                return Err(Error::config_field_invalid(
                    "generator.minimax.api_key",
                    "an API key is required for the minimax generator",
                ));
            }
            if minimax.request_timeout_secs == 0 || minimax.max_poll_attempts == 0 {
                return Err(Error::config_field_invalid(
                    "generator.minimax",
                    "request_timeout_secs and max_poll_attempts must be greater than zero",
                ));
            }
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(Error::config_field_invalid(
                "logging.level",
                format!(
                    "invalid log level '{}'. Must be one of: {}",
                    self.logging.level,
                    valid_levels.join(", ")
                ),
            ));
        }

        Ok(())
    }
}

fn validate_http_url(field: &str, raw: &str) -> Result<()> {
    let parsed = url::Url::parse(raw)
        .map_err(|e| Error::config_field_invalid(field, format!("invalid URL '{}': {}", raw, e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(Error::config_field_invalid(
            field,
            format!("URL scheme must be http or https, got '{}'", other),
        )),
    }
}

fn parse_bool(val: &str) -> bool {
    val.eq_ignore_ascii_case("true") || val == "1"
}

/// Expand ~ and environment variables in paths
fn expand_path(path: &str) -> String {
    shellexpand::full(path)
        .unwrap_or_else(|_| std::borrow::Cow::Borrowed(path))
        .into_owned()
}

/// Initialize a new configuration file
pub fn init_config(path: Option<&str>, force: bool) -> Result<PathBuf> {
    let config_path = path
        .map(|p| PathBuf::from(expand_path(p)))
        .unwrap_or_else(|| PathBuf::from("living-map.toml"));

    if config_path.exists() && !force {
        return Err(Error::Config(format!(
            "Configuration file already exists: {}. Use --force to overwrite.",
            config_path.display()
        )));
    }

    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::IoWrite {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    fs::write(&config_path, generate_default_config()).map_err(|e| Error::IoWrite {
        path: config_path.clone(),
        source: e,
    })?;

    Ok(config_path)
}

/// Default configuration content with comments
fn generate_default_config() -> &'static str {
    r#"# Living Map server configuration

[server]
# Interface and port to listen on
host = "0.0.0.0"
port = 5000

# Tokio worker threads (0 = runtime default)
worker_threads = 0

# Send permissive CORS headers
enable_cors = true

[generator]
# Video generator: mock, minimax
backend = "mock"

# Upper bound for one whole generation call, in seconds
timeout_secs = 600

[generator.mock]
# Video returned for every prompt
video_url = "https://www.w3schools.com/html/mov_bbb.mp4"
latency_ms = 0
# Make every generation fail with this message
# fail_with = "simulated provider outage"

[generator.minimax]
base_url = "https://api.minimax.io"
# api_key = "..."
model = "video-01"
request_timeout_secs = 30
poll_interval_ms = 5000
max_poll_attempts = 100

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log file path (comment out to disable file logging)
# file = "~/.living-map/logs/server.log"

# Number of rotated log files to keep
max_files = 5

# Enable JSON formatted logging
json_format = false
"#
}

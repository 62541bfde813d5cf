//! Error types for the Living Map server
//!
//! Provides structured error handling with:
//! - Numeric error codes for machine parsing
//! - HTTP status mapping and a JSON error body for request handlers
//! - User-friendly hints and exit codes for the CLI

use std::fmt;
use std::path::PathBuf;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::generation::GenerationOutcome;

/// Result type alias for server operations
pub type Result<T> = std::result::Result<T, Error>;

/// Message returned to callers when a registration lacks prompt or coordinates
pub const MISSING_FIELDS_MESSAGE: &str = "Missing required fields";

/// Numeric error codes for machine parsing and documentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ErrorCode {
    // Configuration errors (1xx)
    ConfigNotFound = 100,
    ConfigParseError = 101,
    ConfigValidation = 102,

    // IO errors (2xx)
    IoRead = 200,
    IoWrite = 201,
    IoPermission = 202,
    IoNotFound = 203,

    // Request validation errors (4xx)
    MissingFields = 400,
    MalformedRequest = 401,
    RequestBodyRejected = 402,

    // Generation errors (5xx)
    GenerationFailed = 500,
    GenerationTimeout = 501,
    GenerationMalformed = 502,
    GenerationQuota = 503,

    // Server errors (6xx)
    ServerBind = 600,
    ServerRuntime = 601,

    // Internal errors (9xx)
    InternalError = 900,
    NotSupported = 902,
}

impl ErrorCode {
    /// Get the string code (e.g., "E100")
    pub fn as_str(&self) -> String {
        format!("E{}", *self as u16)
    }

    /// Get the exit code for CLI (maps to 1-125 range)
    pub fn exit_code(&self) -> i32 {
        match *self as u16 {
            100..=199 => 10,
            200..=299 => 20,
            400..=499 => 40,
            500..=599 => 50,
            600..=699 => 60,
            900..=999 => 90,
            _ => 1,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type for the server
#[derive(Error, Debug)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        path: PathBuf,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Configuration parse error
    #[error("Failed to parse configuration: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<toml::de::Error>,
    },

    /// Configuration validation error
    #[error("Configuration validation failed: {message}")]
    ConfigValidation { message: String, field: Option<String> },

    /// Generic configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    // ─────────────────────────────────────────────────────────────
    // IO Errors
    // ─────────────────────────────────────────────────────────────

    /// File write error
    #[error("Failed to write file: {path}")]
    IoWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    Toml(#[from] toml::ser::Error),

    // ─────────────────────────────────────────────────────────────
    // Request Validation Errors
    // ─────────────────────────────────────────────────────────────

    /// Prompt is empty or a coordinate is absent
    #[error("{}", MISSING_FIELDS_MESSAGE)]
    MissingFields { fields: Vec<&'static str> },

    /// Request body is not the expected JSON shape
    #[error("Malformed request body: {message}")]
    MalformedRequest { message: String },

    /// Body could not be read (too large, aborted)
    #[error("Request body rejected: {message}")]
    RequestBodyRejected { status: StatusCode, message: String },

    // ─────────────────────────────────────────────────────────────
    // Generation Errors
    // ─────────────────────────────────────────────────────────────

    /// Provider reported a failure or an unexpected HTTP status
    #[error("Video generation failed ({provider}): {message}")]
    GenerationFailed { provider: String, message: String },

    /// Provider did not finish within the allotted time
    #[error("Video generation timed out ({provider}) after {timeout_secs}s")]
    GenerationTimeout { provider: String, timeout_secs: u64 },

    /// Provider answered with a body we could not interpret
    #[error("Malformed response from video provider ({provider}): {message}")]
    GenerationMalformed { provider: String, message: String },

    /// Provider rejected the call for rate or balance reasons
    #[error("Video provider quota exceeded ({provider}): {message}")]
    GenerationQuota { provider: String, message: String },

    // ─────────────────────────────────────────────────────────────
    // Server Errors
    // ─────────────────────────────────────────────────────────────

    /// Could not bind the listening socket
    #[error("Failed to bind {addr}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// HTTP server terminated with an error
    #[error("Server error: {0}")]
    Server(String),

    // ─────────────────────────────────────────────────────────────
    // Internal Errors
    // ─────────────────────────────────────────────────────────────

    /// Feature not supported
    #[error("Not supported: {0}")]
    NotSupported(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    // ─────────────────────────────────────────────────────────────
    // Error Classification
    // ─────────────────────────────────────────────────────────────

    /// Get the numeric error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::ConfigNotFound { .. } => ErrorCode::ConfigNotFound,
            Error::ConfigParse { .. } => ErrorCode::ConfigParseError,
            Error::ConfigValidation { .. } => ErrorCode::ConfigValidation,
            Error::Config(_) => ErrorCode::ConfigValidation,

            Error::IoWrite { .. } => ErrorCode::IoWrite,
            Error::Io(e) => match e.kind() {
                std::io::ErrorKind::NotFound => ErrorCode::IoNotFound,
                std::io::ErrorKind::PermissionDenied => ErrorCode::IoPermission,
                _ => ErrorCode::IoRead,
            },
            Error::Toml(_) => ErrorCode::ConfigParseError,

            Error::MissingFields { .. } => ErrorCode::MissingFields,
            Error::MalformedRequest { .. } => ErrorCode::MalformedRequest,
            Error::RequestBodyRejected { .. } => ErrorCode::RequestBodyRejected,

            Error::GenerationFailed { .. } => ErrorCode::GenerationFailed,
            Error::GenerationTimeout { .. } => ErrorCode::GenerationTimeout,
            Error::GenerationMalformed { .. } => ErrorCode::GenerationMalformed,
            Error::GenerationQuota { .. } => ErrorCode::GenerationQuota,

            Error::Bind { .. } => ErrorCode::ServerBind,
            Error::Server(_) => ErrorCode::ServerRuntime,

            Error::NotSupported(_) => ErrorCode::NotSupported,
            Error::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// Whether the caller is at fault (reported as a 4xx)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::MissingFields { .. }
                | Error::MalformedRequest { .. }
                | Error::RequestBodyRejected { .. }
        )
    }

    /// Whether the error came from the video generation provider
    pub fn is_generation_error(&self) -> bool {
        matches!(self.code() as u16, 500..=599)
    }

    /// HTTP status used when this error ends a request
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::MissingFields { .. } | Error::MalformedRequest { .. } => {
                StatusCode::BAD_REQUEST
            }
            Error::RequestBodyRejected { status, .. } => *status,
            Error::GenerationTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            Error::GenerationFailed { .. }
            | Error::GenerationMalformed { .. }
            | Error::GenerationQuota { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the exit code for CLI
    pub fn exit_code(&self) -> i32 {
        self.code().exit_code()
    }

    // ─────────────────────────────────────────────────────────────
    // User-Friendly Messages
    // ─────────────────────────────────────────────────────────────

    /// Get a user-friendly suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Error::ConfigNotFound { .. } => Some(
                "Run 'living-map config init' to create a default configuration file."
            ),
            Error::ConfigParse { .. } => Some(
                "Check your configuration file syntax. Run 'living-map config validate' to see details."
            ),
            Error::ConfigValidation { .. } | Error::Config(_) => Some(
                "Review the configuration file and fix the invalid values."
            ),
            Error::Bind { .. } => Some(
                "Another process may already use this port. Pick another with --port."
            ),
            Error::GenerationQuota { .. } => Some(
                "Check the balance and rate limits of your video provider account."
            ),
            Error::GenerationTimeout { .. } => Some(
                "Raise 'generator.timeout_secs' or check the provider status."
            ),
            _ => None,
        }
    }

    /// Format the error for terminal display with colors
    pub fn format_for_terminal(&self) -> String {
        let mut output = format!("\x1b[31mError [{}]\x1b[0m: {}\n", self.code(), self);

        if let Error::ConfigValidation {
            field: Some(field), ..
        } = self
        {
            output.push_str(&format!("  Field: {}\n", field));
        }

        if let Some(hint) = self.suggestion() {
            output.push_str(&format!("\n\x1b[33mHint\x1b[0m: {}\n", hint));
        }

        output
    }

    /// Format the error for logging (no colors)
    pub fn format_for_log(&self) -> String {
        format!("[{}] {}", self.code(), self)
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn config_not_found(path: impl Into<PathBuf>) -> Self {
        Error::ConfigNotFound {
            path: path.into(),
            source: None,
        }
    }

    pub fn config_parse(message: impl Into<String>, source: toml::de::Error) -> Self {
        Error::ConfigParse {
            message: message.into(),
            source: Some(source),
        }
    }

    pub fn config_field_invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::ConfigValidation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    pub fn malformed_request(message: impl Into<String>) -> Self {
        Error::MalformedRequest {
            message: message.into(),
        }
    }

    pub fn generation_failed(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Error::GenerationFailed {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn generation_malformed(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Error::GenerationMalformed {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn generation_quota(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Error::GenerationQuota {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn generation_timeout(provider: impl Into<String>, timeout_secs: u64) -> Self {
        Error::GenerationTimeout {
            provider: provider.into(),
            timeout_secs,
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// HTTP Mapping
// ─────────────────────────────────────────────────────────────────

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if self.is_client_error() {
            tracing::debug!(code = %self.code(), error = %self, "Request rejected");
        } else if self.is_generation_error() {
            tracing::warn!(code = %self.code(), error = %self, "Video generation failed");
        } else {
            tracing::error!(code = %self.code(), error = %self, "Request failed");
        }

        let body = GenerationOutcome::Error {
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────

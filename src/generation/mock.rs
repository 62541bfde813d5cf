//! Mock generator
//!
//! Answers every prompt with the same configured video. Used as the default
//! generator and, with its failure knobs, in tests.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::time::Duration;
use tracing::debug;

use crate::error::{Error, Result};

use super::{GeneratedVideo, GenerationRequest, VideoGenerator};

/// Video used when no URL is configured
pub const DEFAULT_MOCK_VIDEO_URL: &str = "https://www.w3schools.com/html/mov_bbb.mp4";

// ─────────────────────────────────────────────────────────────────
// Mock Configuration
// ─────────────────────────────────────────────────────────────────

/// Configuration for mock generator behavior
#[derive(Debug, Clone)]
pub struct MockConfig {
    /// Video returned for every prompt
    pub video_url: String,

    /// Simulated provider latency
    pub latency_ms: u64,

    /// When set, every call fails with this message
    pub fail_with: Option<String>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            video_url: DEFAULT_MOCK_VIDEO_URL.to_string(),
            latency_ms: 0,
            fail_with: None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Mock Generator
// ─────────────────────────────────────────────────────────────────

pub struct MockGenerator {
    config: MockConfig,
    calls: RwLock<u32>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::with_config(MockConfig::default())
    }

    pub fn with_config(config: MockConfig) -> Self {
        Self {
            config,
            calls: RwLock::new(0),
        }
    }

    /// A generator whose every call fails with `message`
    #[cfg(test)]
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_config(MockConfig {
            fail_with: Some(message.into()),
            ..Default::default()
        })
    }

    /// Number of `generate` calls made so far
    #[cfg(test)]
    pub fn call_count(&self) -> u32 {
        *self.calls.read()
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VideoGenerator for MockGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedVideo> {
        let call = {
            let mut calls = self.calls.write();
            *calls += 1;
            *calls
        };

        if self.config.latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.latency_ms)).await;
        }

        if let Some(ref message) = self.config.fail_with {
            return Err(Error::generation_failed("mock", message.clone()));
        }

        debug!(prompt = %request.prompt, call, "Mock video generated");

        Ok(GeneratedVideo {
            video_url: self.config.video_url.clone(),
            persona: request.prompt.clone(),
        })
    }
}

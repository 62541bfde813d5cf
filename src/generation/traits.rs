//! Generator trait definitions
//!
//! Defines the `VideoGenerator` seam and the wire form of its result.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::Result;
use crate::identity::Coordinates;

// ─────────────────────────────────────────────────────────────────
// Request / Result
// ─────────────────────────────────────────────────────────────────

/// Input to a single generation call
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Persona description, already trimmed and non-empty
    pub prompt: String,

    /// Where the persona was dropped on the map
    pub location: Coordinates,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, location: Coordinates) -> Self {
        Self {
            prompt: prompt.into(),
            location,
        }
    }
}

/// A successfully generated video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedVideo {
    /// Where the video can be fetched
    pub video_url: String,

    /// Label for the generated persona
    pub persona: String,
}

/// JSON body returned by `POST /generate`
///
/// Serializes as `{"status":"success","video_url":..,"persona":..}` or
/// `{"status":"error","message":..}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum GenerationOutcome {
    Success { video_url: String, persona: String },
    Error { message: String },
}

impl From<GeneratedVideo> for GenerationOutcome {
    fn from(video: GeneratedVideo) -> Self {
        GenerationOutcome::Success {
            video_url: video.video_url,
            persona: video.persona,
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// VideoGenerator Trait
// ─────────────────────────────────────────────────────────────────

/// Produces a video reference for a persona prompt
///
/// Implementations report provider problems as `Err` values; they never
/// panic across this boundary. The trait is object-safe so the server can
/// hold whichever implementation the configuration selects.
#[async_trait]
pub trait VideoGenerator: Send + Sync {
    /// Generate a persona video for the prompt at the given location
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedVideo>;
}

/// Type alias for a shared generator reference
pub type SharedGenerator = Arc<dyn VideoGenerator>;

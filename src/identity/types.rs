//! Persona identity records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::generation::GeneratedVideo;

/// A point on the map
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// One record per successful generation
///
/// Created only by the registration workflow and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaIdentity {
    pub id: Uuid,
    pub prompt: String,
    pub lat: f64,
    pub lng: f64,
    pub video_url: String,
    pub persona: String,
    pub created_at: DateTime<Utc>,
}

impl PersonaIdentity {
    pub fn new(prompt: impl Into<String>, location: Coordinates, video: GeneratedVideo) -> Self {
        Self {
            id: Uuid::new_v4(),
            prompt: prompt.into(),
            lat: location.lat,
            lng: location.lng,
            video_url: video.video_url,
            persona: video.persona,
            created_at: Utc::now(),
        }
    }
}

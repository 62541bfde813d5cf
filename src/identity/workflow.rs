//! Registration workflow
//!
//! validate → generate → append → return the generator's result.
//! A record is appended only after the generator succeeded, so a failed or
//! timed-out call leaves the registry exactly as it was.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::generation::{GeneratedVideo, GenerationRequest, GeneratorType, SharedGenerator};

use super::registry::IdentityRegistry;
use super::types::{Coordinates, PersonaIdentity};

/// Body of `POST /generate`, as sent by the caller
///
/// Every field is optional at this stage so that absent values surface as
/// a validation error rather than a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RegistrationRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
}

impl RegistrationRequest {
    #[cfg(test)]
    pub fn new(prompt: impl Into<String>, lat: Option<f64>, lng: Option<f64>) -> Self {
        Self {
            prompt: Some(prompt.into()),
            lat,
            lng,
        }
    }

    /// Check presence of every field and trim the prompt
    pub fn validate(&self) -> Result<GenerationRequest> {
        let prompt = self.prompt.as_deref().map(str::trim).unwrap_or_default();

        match (prompt.is_empty(), self.lat, self.lng) {
            (false, Some(lat), Some(lng)) => {
                Ok(GenerationRequest::new(prompt, Coordinates::new(lat, lng)))
            }
            _ => {
                let mut fields = Vec::new();
                if prompt.is_empty() {
                    fields.push("prompt");
                }
                if self.lat.is_none() {
                    fields.push("lat");
                }
                if self.lng.is_none() {
                    fields.push("lng");
                }
                Err(Error::MissingFields { fields })
            }
        }
    }
}

/// Ties the generator to the registry
pub struct RegistrationService {
    generator: SharedGenerator,
    generator_type: GeneratorType,
    registry: Arc<IdentityRegistry>,
    timeout: Duration,
}

impl RegistrationService {
    pub fn new(
        generator: SharedGenerator,
        generator_type: GeneratorType,
        registry: Arc<IdentityRegistry>,
        timeout: Duration,
    ) -> Self {
        Self {
            generator,
            generator_type,
            registry,
            timeout,
        }
    }

    pub fn generator_type(&self) -> GeneratorType {
        self.generator_type
    }

    pub fn registry(&self) -> &Arc<IdentityRegistry> {
        &self.registry
    }

    /// Validate, generate, and on success append a new persona
    pub async fn register(&self, request: &RegistrationRequest) -> Result<GeneratedVideo> {
        let generation = request.validate().map_err(|e| {
            match e {
                Error::MissingFields { ref fields } => {
                    debug!(error = %e, fields = ?fields, "Registration rejected")
                }
                _ => debug!(error = %e, "Registration rejected"),
            }
            e
        })?;

        debug!(
            prompt = %generation.prompt,
            lat = generation.location.lat,
            lng = generation.location.lng,
            generator = %self.generator_type,
            "Generating persona video"
        );

        let video = match tokio::time::timeout(self.timeout, self.generator.generate(&generation)).await {
            Ok(Ok(video)) => video,
            Ok(Err(e)) => {
                warn!(error = %e.format_for_log(), prompt = %generation.prompt, "Video generation failed");
                return Err(e);
            }
            Err(_) => {
                let e = Error::generation_timeout(self.generator_type.name(), self.timeout.as_secs());
                warn!(error = %e.format_for_log(), prompt = %generation.prompt, "Video generation timed out");
                return Err(e);
            }
        };

        let identity = PersonaIdentity::new(generation.prompt, generation.location, video.clone());
        let id = identity.id;
        let total = self.registry.append(identity);

        info!(
            id = %id,
            persona = %video.persona,
            lat = generation.location.lat,
            lng = generation.location.lng,
            total,
            "Persona registered"
        );

        Ok(video)
    }

    /// Every registered persona in insertion order
    pub fn list_all(&self) -> Vec<PersonaIdentity> {
        self.registry.list_all()
    }
}

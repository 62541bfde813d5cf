//! HTTP handlers

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::response::Html;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::generation::GenerationOutcome;
use crate::identity::{PersonaIdentity, RegistrationRequest};

use super::state::AppState;

const INDEX_HTML: &str = include_str!("../../static/index.html");

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub generator: String,
    pub identities: usize,
    pub version: String,
    pub started_at: DateTime<Utc>,
}

/// Serve the map page
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Register a persona at a location
///
/// The body is parsed regardless of content type; anything that is not a
/// JSON object with the expected field types is a malformed request. A body
/// that cannot be read at all keeps the rejection's status.
pub async fn generate(
    State(state): State<AppState>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Result<Json<GenerationOutcome>> {
    let body = body.map_err(|rejection| Error::RequestBodyRejected {
        status: rejection.status(),
        message: rejection.body_text(),
    })?;

    let request: RegistrationRequest =
        serde_json::from_slice(&body).map_err(|e| Error::malformed_request(e.to_string()))?;

    let video = state.registration.register(&request).await?;
    Ok(Json(video.into()))
}

/// List every registered persona in insertion order
pub async fn list_identities(State(state): State<AppState>) -> Json<Vec<PersonaIdentity>> {
    Json(state.registration.list_all())
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        generator: state.registration.generator_type().to_string(),
        identities: state.registration.registry().len(),
        version: state.version.clone(),
        started_at: state.started_at,
    })
}

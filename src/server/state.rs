//! Application state for request handlers

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::identity::RegistrationService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Registration workflow (owns the generator and the registry)
    pub registration: Arc<RegistrationService>,

    /// Server version
    pub version: String,

    /// Server start time
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(registration: Arc<RegistrationService>) -> Self {
        Self {
            registration,
            version: env!("CARGO_PKG_VERSION").to_string(),
            started_at: Utc::now(),
        }
    }
}

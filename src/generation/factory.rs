//! Generator selection
//!
//! Maps the configured backend name onto a concrete `VideoGenerator`.

use std::sync::Arc;

use crate::config::GeneratorSettings;
use crate::error::{Error, Result};

use super::{MiniMaxConfig, MiniMaxGenerator, MockConfig, MockGenerator, SharedGenerator};

/// Supported generator types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneratorType {
    /// Fixed-URL mock (default)
    Mock,
    /// MiniMax video generation API
    MiniMax,
}

impl GeneratorType {
    pub fn all() -> &'static [GeneratorType] {
        &[GeneratorType::Mock, GeneratorType::MiniMax]
    }

    pub fn name(&self) -> &'static str {
        match self {
            GeneratorType::Mock => "mock",
            GeneratorType::MiniMax => "minimax",
        }
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "mock" => Some(GeneratorType::Mock),
            "minimax" => Some(GeneratorType::MiniMax),
            _ => None,
        }
    }
}

impl std::fmt::Display for GeneratorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Factory for creating generators
pub struct GeneratorFactory;

impl GeneratorFactory {
    /// Build the generator named by `settings.backend`
    pub fn create(settings: &GeneratorSettings) -> Result<(GeneratorType, SharedGenerator)> {
        let generator_type = GeneratorType::from_str(&settings.backend).ok_or_else(|| {
            Error::NotSupported(format!("unknown generator '{}'", settings.backend))
        })?;

        let generator: SharedGenerator = match generator_type {
            GeneratorType::Mock => Arc::new(MockGenerator::with_config(MockConfig {
                video_url: settings.mock.video_url.clone(),
                latency_ms: settings.mock.latency_ms,
                fail_with: settings.mock.fail_with.clone(),
            })),
            GeneratorType::MiniMax => Arc::new(MiniMaxGenerator::new(MiniMaxConfig::from(
                &settings.minimax,
            ))?),
        };

        Ok((generator_type, generator))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::{GenerationRequest, VideoGenerator};
    use crate::identity::Coordinates;

    #[test]
    fn test_generator_type_parsing() {
        assert_eq!(GeneratorType::from_str("mock"), Some(GeneratorType::Mock));
        assert_eq!(GeneratorType::from_str("MiniMax"), Some(GeneratorType::MiniMax));
        assert_eq!(GeneratorType::from_str("sora"), None);
        assert_eq!(GeneratorType::MiniMax.to_string(), "minimax");
    }

    #[test]
    fn test_create_default_is_mock() {
        let (generator_type, _) = GeneratorFactory::create(&GeneratorSettings::default()).unwrap();
        assert_eq!(generator_type, GeneratorType::Mock);
    }

    #[tokio::test]
    async fn test_mock_failure_from_settings() {
        let mut settings = GeneratorSettings::default();
        settings.mock.fail_with = Some("simulated outage".to_string());

        let (_, generator) = GeneratorFactory::create(&settings).unwrap();
        let request = GenerationRequest::new("wizard", Coordinates::new(1.0, 2.0));
        let err = generator.generate(&request).await.unwrap_err();

        assert!(err.is_generation_error());
        assert!(err.to_string().contains("simulated outage"));
    }

    #[test]
    fn test_create_minimax() {
        let mut settings = GeneratorSettings::default();
        settings.backend = "minimax".to_string();
        settings.minimax.api_key = "key".to_string();

        let (generator_type, _) = GeneratorFactory::create(&settings).unwrap();
        assert_eq!(generator_type, GeneratorType::MiniMax);
    }

    #[test]
    fn test_create_unknown() {
        let mut settings = GeneratorSettings::default();
        settings.backend = "sora".to_string();
        assert!(matches!(
            GeneratorFactory::create(&settings),
            Err(Error::NotSupported(_))
        ));
    }
}

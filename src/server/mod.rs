//! HTTP server setup and lifecycle

pub mod handlers;
pub mod router;
pub mod state;

use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::MapConfig;
use crate::error::{Error, Result};
use crate::generation::GeneratorFactory;
use crate::identity::{IdentityRegistry, RegistrationService};

pub use router::create_router;
pub use state::AppState;

/// Living Map HTTP server
pub struct Server {
    config: MapConfig,
    state: AppState,
}

impl Server {
    /// Create the generator, an empty registry and the shared state
    pub fn new(config: MapConfig) -> Result<Self> {
        let (generator_type, generator) = GeneratorFactory::create(&config.generator)?;
        let registry = Arc::new(IdentityRegistry::new());

        let service = RegistrationService::new(
            generator,
            generator_type,
            registry,
            Duration::from_secs(config.generator.timeout_secs),
        );

        Ok(Self {
            config,
            state: AppState::new(Arc::new(service)),
        })
    }

    /// Bind and serve until Ctrl+C or SIGTERM
    pub async fn run(self) -> Result<()> {
        let addr = self.config.listen_addr();
        let listener = TcpListener::bind(&addr).await.map_err(|e| Error::Bind {
            addr: addr.clone(),
            source: e,
        })?;
        let local_addr = listener.local_addr()?;

        info!(
            addr = %local_addr,
            generator = %self.state.registration.generator_type(),
            cors = self.config.server.enable_cors,
            "Living Map listening"
        );

        let registry = self.state.registration.registry().clone();
        let app = create_router(self.state, self.config.server.enable_cors);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| Error::Server(e.to_string()))?;

        if !registry.is_empty() {
            info!(identities = registry.len(), "Discarding in-memory identities");
        }
        info!("Living Map shut down");
        Ok(())
    }
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}

//! Router configuration

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::state::AppState;

/// Build the application router
pub fn create_router(state: AppState, enable_cors: bool) -> Router {
    let router = Router::new()
        .route("/", get(handlers::index))
        .route("/generate", post(handlers::generate))
        .route("/identities", get(handlers::list_identities))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http());

    let router = if enable_cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    };

    router.with_state(state)
}

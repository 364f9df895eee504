use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use super::health;
use super::home;
use super::state::AppState;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home::index))
        .route("/home", get(home::home))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

//! Reference server for the bus attendance protocol.
//!
//! Mints rotating tokens, caches each bus's latest position in memory, and marks
//! attendance when a scanned token is fresh and the student stands within the
//! geofence around the bus.

pub mod error;
pub mod geofence;
pub mod routes;
pub mod state;
pub mod token;

use axum::Router;
use state::ServerState;
use tower_http::cors::CorsLayer;

pub fn app(state: ServerState) -> Router {
    Router::new()
        .nest("/api", routes::routes())
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::room;
use crate::shared::AppState;
use crate::websockets::websocket_handler;

/// Builds the HTTP/WebSocket router
pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "Mafia lobby server" }))
        .route("/rooms", get(room::list_rooms))
        .route("/ws", get(websocket_handler))
        .layer(TraceLayer::new_for_http())
        // The browser client is served from a different origin
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

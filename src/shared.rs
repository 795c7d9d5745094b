use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::lobby::LobbySettings;
use crate::room::{repository::RoomRepository, RoomCodeGenerator, RoomService};
use crate::websockets::{
    event_handlers::{ChatEventHandlers, ConnectionEventHandlers, LobbyEventHandlers},
    ConnectionManager, WebsocketReceiveHandler,
};

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub room_repository: Arc<dyn RoomRepository + Send + Sync>,
    pub room_service: Arc<RoomService>,
    pub connection_manager: Arc<dyn ConnectionManager>,
    pub receive_handler: Arc<WebsocketReceiveHandler>,
    pub connection_events: Arc<ConnectionEventHandlers>,
}

impl AppState {
    pub fn new(
        room_repository: Arc<dyn RoomRepository + Send + Sync>,
        connection_manager: Arc<dyn ConnectionManager>,
        code_generator: Arc<dyn RoomCodeGenerator>,
        settings: LobbySettings,
    ) -> Self {
        let room_service = Arc::new(RoomService::new(
            room_repository.clone(),
            code_generator,
            settings,
        ));

        let lobby_events = Arc::new(LobbyEventHandlers::new(
            room_service.clone(),
            connection_manager.clone(),
        ));
        let chat_events = Arc::new(ChatEventHandlers::new(
            room_service.clone(),
            connection_manager.clone(),
        ));
        let connection_events = Arc::new(ConnectionEventHandlers::new(
            room_service.clone(),
            connection_manager.clone(),
        ));

        Self {
            room_repository,
            room_service,
            connection_manager,
            receive_handler: Arc::new(WebsocketReceiveHandler::new(lobby_events, chat_events)),
            connection_events,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Registry error: {0}")]
    RegistryError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::RegistryError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Registry error: {}", msg),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}

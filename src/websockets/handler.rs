use async_trait::async_trait;
use axum::{
    extract::{State, WebSocketUpgrade},
    response::Response,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::room::types::JoinLobbyPayload;
use crate::shared::AppState;
use crate::websockets::event_handlers::{ChatEventHandlers, HandlerError, LobbyEventHandlers};
use crate::websockets::messages::{
    CreateLobbyPayload, MessageType, TextPayload, WebSocketMessage,
};

use super::socket::{Connection, MessageHandler};

/// Message handler for receiving WebSocket messages from the client
pub struct WebsocketReceiveHandler {
    lobby_events: Arc<LobbyEventHandlers>,
    chat_events: Arc<ChatEventHandlers>,
}

impl WebsocketReceiveHandler {
    pub fn new(lobby_events: Arc<LobbyEventHandlers>, chat_events: Arc<ChatEventHandlers>) -> Self {
        Self {
            lobby_events,
            chat_events,
        }
    }

    async fn dispatch(
        &self,
        connection_id: &str,
        ws_message: WebSocketMessage,
    ) -> Result<(), HandlerError> {
        match ws_message.message_type {
            MessageType::CreateLobby => {
                let payload: CreateLobbyPayload = ws_message.payload_as().unwrap_or_default();
                self.lobby_events
                    .handle_create_lobby(connection_id, payload)
                    .await
            }
            MessageType::JoinLobby => {
                // A missing or malformed payload is reported as an invalid join
                let payload: JoinLobbyPayload = ws_message.payload_as().unwrap_or_default();
                self.lobby_events
                    .handle_join_lobby(connection_id, payload)
                    .await
            }
            MessageType::ResetLobby => self.lobby_events.handle_reset_lobby(connection_id).await,
            MessageType::Message => match chat_text(&ws_message) {
                Some(text) => {
                    self.chat_events
                        .handle_chat_message(connection_id, &text)
                        .await
                }
                None => {
                    warn!(connection_id = %connection_id, "Chat message without text");
                    Ok(())
                }
            },
            other => {
                debug!(
                    connection_id = %connection_id,
                    message_type = %other,
                    "Unhandled message type"
                );
                Ok(())
            }
        }
    }
}

/// Accepts `{"text": "..."}` as well as a bare string payload
fn chat_text(message: &WebSocketMessage) -> Option<String> {
    if let Some(text) = message.payload.as_str() {
        return Some(text.to_string());
    }
    message
        .payload_as::<TextPayload>()
        .ok()
        .map(|payload| payload.text)
}

#[async_trait]
impl MessageHandler for WebsocketReceiveHandler {
    async fn handle_message(&self, connection_id: &str, message: String) {
        let ws_message = match serde_json::from_str::<WebSocketMessage>(&message) {
            Ok(ws_message) => ws_message,
            Err(e) => {
                warn!(
                    connection_id = %connection_id,
                    error = %e,
                    "Failed to parse WebSocket message"
                );
                return;
            }
        };

        let event = ws_message.message_type;
        debug!(connection_id = %connection_id, event = %event, "Received message");

        if let Err(e) = self.dispatch(connection_id, ws_message).await {
            error!(
                connection_id = %connection_id,
                event = %event,
                error = %e,
                "Event handler failed"
            );
        }
    }
}

/// WebSocket endpoint
/// GET /ws
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(app_state): State<AppState>,
) -> Response {
    ws.on_upgrade(move |socket| handle_websocket_connection(socket, app_state))
}

/// Handle the upgraded WebSocket connection
async fn handle_websocket_connection(socket: axum::extract::ws::WebSocket, app_state: AppState) {
    let connection_id = Uuid::new_v4().to_string();

    info!(connection_id = %connection_id, "WebSocket connection established");

    // Create the outbound channel (app -> client)
    let (outbound_sender, outbound_receiver) = mpsc::unbounded_channel::<String>();

    app_state
        .connection_manager
        .add_connection(connection_id.clone(), outbound_sender)
        .await;

    let message_handler: Arc<dyn MessageHandler> = app_state.receive_handler.clone();

    let connection = Connection::new(
        connection_id.clone(),
        Box::new(socket),
        outbound_receiver,
        message_handler,
    );

    // Run the connection until disconnect
    match connection.run().await {
        Ok(()) => {
            info!(connection_id = %connection_id, "WebSocket connection closed cleanly");
        }
        Err(e) => {
            warn!(
                connection_id = %connection_id,
                error = ?e,
                "WebSocket connection error"
            );
        }
    }

    if let Err(e) = app_state
        .connection_events
        .handle_disconnect(&connection_id)
        .await
    {
        error!(connection_id = %connection_id, error = %e, "Failed to clean up connection");
    }
}

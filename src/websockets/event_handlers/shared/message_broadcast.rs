use crate::{
    lobby::LobbyError,
    websockets::{connection_manager::ConnectionManager, messages::WebSocketMessage},
};
use std::sync::Arc;

use super::super::HandlerError;

pub struct MessageBroadcaster;

impl MessageBroadcaster {
    /// Sends a message to every connection subscribed to a room
    pub async fn broadcast_to_room(
        connection_manager: &Arc<dyn ConnectionManager>,
        room_id: &str,
        message: &WebSocketMessage,
    ) -> Result<(), HandlerError> {
        let message_json = serde_json::to_string(message)?;
        connection_manager.send_to_group(room_id, &message_json).await;
        Ok(())
    }

    pub async fn send_to_connection(
        connection_manager: &Arc<dyn ConnectionManager>,
        connection_id: &str,
        message: &WebSocketMessage,
    ) -> Result<(), HandlerError> {
        let message_json = serde_json::to_string(message)?;
        connection_manager
            .send_to_connection(connection_id, &message_json)
            .await;
        Ok(())
    }

    /// Reports a rejected request back to the caller only
    pub async fn send_error(
        connection_manager: &Arc<dyn ConnectionManager>,
        connection_id: &str,
        error: &LobbyError,
    ) -> Result<(), HandlerError> {
        Self::send_to_connection(
            connection_manager,
            connection_id,
            &WebSocketMessage::error(error.to_string()),
        )
        .await
    }
}

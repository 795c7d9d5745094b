#![allow(dead_code)] // Not every test file uses every helper

use tokio::sync::mpsc;

use mafia_lobby::{ConnectionManager, MessageHandler, MessageType, WebSocketMessage};

use super::setup::TestSetup;

// ============================================================================
// Action Helpers
// ============================================================================

impl TestSetup {
    /// Feeds a frame through the receive handler as if `connection_id` sent it
    pub async fn send_message(&self, connection_id: &str, message: WebSocketMessage) {
        let message_json = serde_json::to_string(&message).unwrap();
        self.send_raw(connection_id, &message_json).await;
    }

    pub async fn send_raw(&self, connection_id: &str, frame: &str) {
        self.app_state
            .receive_handler
            .handle_message(connection_id, frame.to_string())
            .await;
    }

    /// Registers a connection that was not part of the initial setup
    pub async fn connect(&self, connection_id: &str) {
        let (sender, _receiver) = mpsc::unbounded_channel();
        self.mock_conn_manager
            .add_connection(connection_id.to_string(), sender)
            .await;
    }

    pub async fn disconnect(&self, connection_id: &str) {
        self.app_state
            .connection_events
            .handle_disconnect(connection_id)
            .await
            .unwrap();
    }

    pub async fn clear_messages(&self) {
        self.mock_conn_manager.clear_messages().await;
    }

    // ============================================================================
    // Convenience Action Methods
    // ============================================================================

    pub async fn create_lobby(&self, connection_id: &str, nickname: &str) {
        self.send_message(connection_id, WebSocketMessage::create_lobby(nickname.to_string()))
            .await;
    }

    pub async fn join_lobby(&self, connection_id: &str, room_code: &str, nickname: &str) {
        self.send_message(
            connection_id,
            WebSocketMessage::join_lobby(room_code.to_string(), nickname.to_string()),
        )
        .await;
    }

    /// Join frame with an arbitrary payload
    pub async fn join_with_payload(&self, connection_id: &str, payload: serde_json::Value) {
        self.send_message(
            connection_id,
            WebSocketMessage::new(MessageType::JoinLobby, payload),
        )
        .await;
    }

    pub async fn reset_lobby(&self, connection_id: &str) {
        self.send_message(connection_id, WebSocketMessage::reset_lobby())
            .await;
    }

    pub async fn send_chat(&self, connection_id: &str, text: &str) {
        self.send_message(connection_id, WebSocketMessage::text(text.to_string()))
            .await;
    }

    /// Host creates `code`, then each guest joins in order; inboxes are cleared
    pub async fn seat_lobby(&self, host: (&str, &str), guests: &[(&str, &str)], code: &str) {
        self.create_lobby(host.0, host.1).await;
        for (connection_id, nickname) in guests {
            self.join_lobby(connection_id, code, nickname).await;
        }
        self.clear_messages().await;
    }
}

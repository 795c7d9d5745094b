use std::sync::Arc;
use tracing::{error, info, warn};

use crate::{
    room::RoomService,
    websockets::{connection_manager::ConnectionManager, messages::WebSocketMessage},
};

use super::{shared::MessageBroadcaster, HandlerError};

pub struct ChatEventHandlers {
    room_service: Arc<RoomService>,
    connection_manager: Arc<dyn ConnectionManager>,
}

impl ChatEventHandlers {
    pub fn new(
        room_service: Arc<RoomService>,
        connection_manager: Arc<dyn ConnectionManager>,
    ) -> Self {
        Self {
            room_service,
            connection_manager,
        }
    }

    /// Relays a chat line to the sender's room as `<nickname>: <text>`
    pub async fn handle_chat_message(
        &self,
        connection_id: &str,
        text: &str,
    ) -> Result<(), HandlerError> {
        let player = match self.room_service.find_player(connection_id).await? {
            Some(player) => player,
            None => {
                error!(
                    connection_id = %connection_id,
                    "Player is not defined or not in a room"
                );
                return Ok(());
            }
        };

        info!(
            room_id = %player.room_id,
            nickname = %player.nickname,
            "Relaying chat message"
        );

        let chat_message = WebSocketMessage::text(format!("{}: {}", player.nickname, text));
        MessageBroadcaster::broadcast_to_room(
            &self.connection_manager,
            &player.room_id,
            &chat_message,
        )
        .await?;

        if let Err(e) = self.room_service.record_activity(&player.room_id).await {
            warn!(room_id = %player.room_id, error = %e, "Failed to record chat activity");
        }

        Ok(())
    }
}

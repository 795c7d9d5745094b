use std::sync::Arc;
use tracing::{debug, info};

use crate::{
    room::{repository::LeaveRoomResult, RoomService},
    websockets::{connection_manager::ConnectionManager, messages::WebSocketMessage},
};

use super::{shared::MessageBroadcaster, HandlerError};

pub struct ConnectionEventHandlers {
    room_service: Arc<RoomService>,
    connection_manager: Arc<dyn ConnectionManager>,
}

impl ConnectionEventHandlers {
    pub fn new(
        room_service: Arc<RoomService>,
        connection_manager: Arc<dyn ConnectionManager>,
    ) -> Self {
        Self {
            room_service,
            connection_manager,
        }
    }

    /// Releases everything a closed connection held
    pub async fn handle_disconnect(&self, connection_id: &str) -> Result<(), HandlerError> {
        info!(connection_id = %connection_id, "Processing disconnect");

        self.connection_manager
            .remove_connection(connection_id)
            .await;

        match self.room_service.leave(connection_id).await? {
            LeaveRoomResult::Success {
                room,
                player,
                host_changed,
            } => {
                info!(
                    room_id = %room.id,
                    nickname = %player.nickname,
                    remaining = room.get_player_count(),
                    "Player left lobby"
                );

                MessageBroadcaster::broadcast_to_room(
                    &self.connection_manager,
                    &room.id,
                    &WebSocketMessage::lobby_join(room.nicknames()),
                )
                .await?;

                if host_changed {
                    if let Some(new_host) = room.host() {
                        info!(
                            room_id = %room.id,
                            old_host = %player.nickname,
                            new_host = %new_host.nickname,
                            "Host left, assigned new host"
                        );

                        if room.is_ready() {
                            MessageBroadcaster::send_to_connection(
                                &self.connection_manager,
                                &new_host.connection_id,
                                &WebSocketMessage::lobby_ready(),
                            )
                            .await?;
                        }
                    }
                }
            }
            LeaveRoomResult::RoomEmptied { room_id, player } => {
                info!(
                    room_id = %room_id,
                    nickname = %player.nickname,
                    "Last player left, room awaits cleanup"
                );
            }
            LeaveRoomResult::NotSeated => {
                debug!(connection_id = %connection_id, "Disconnected without a seat");
            }
        }

        Ok(())
    }
}

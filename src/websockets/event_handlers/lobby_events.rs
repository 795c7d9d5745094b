use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    lobby::LobbyError,
    room::{
        repository::JoinRoomResult,
        types::{JoinLobbyPayload, JoinLobbyRequest},
        CreateRoomResult, RoomService,
    },
    websockets::{
        connection_manager::ConnectionManager,
        messages::{CreateLobbyPayload, WebSocketMessage},
    },
};

use super::{shared::MessageBroadcaster, HandlerError};

/// Handlers for `create-lobby`, `join-lobby` and `reset-lobby`
pub struct LobbyEventHandlers {
    room_service: Arc<RoomService>,
    connection_manager: Arc<dyn ConnectionManager>,
}

impl LobbyEventHandlers {
    pub fn new(
        room_service: Arc<RoomService>,
        connection_manager: Arc<dyn ConnectionManager>,
    ) -> Self {
        Self {
            room_service,
            connection_manager,
        }
    }

    /// Creates a room, seats the caller as host and announces the room code
    pub async fn handle_create_lobby(
        &self,
        connection_id: &str,
        payload: CreateLobbyPayload,
    ) -> Result<(), HandlerError> {
        info!(
            connection_id = %connection_id,
            nickname = %payload.nickname,
            "Handling create-lobby"
        );

        let room = match self
            .room_service
            .create_lobby(connection_id, &payload.nickname)
            .await
        {
            Ok(CreateRoomResult::Created(room)) => room,
            Ok(CreateRoomResult::AlreadySeated) => {
                return self.reject(connection_id, LobbyError::AlreadyInLobby).await;
            }
            Err(e) => {
                warn!(connection_id = %connection_id, error = %e, "Failed to create lobby");
                return self.reject(connection_id, LobbyError::Unavailable).await;
            }
        };

        if !self.subscribe_to_room(connection_id, &room.id).await? {
            return Ok(());
        }

        MessageBroadcaster::broadcast_to_room(
            &self.connection_manager,
            &room.id,
            &WebSocketMessage::lobby_code(room.id.clone()),
        )
        .await
    }

    /// Seats a guest, broadcasts the nickname list and tells the host once
    /// the room has enough players
    pub async fn handle_join_lobby(
        &self,
        connection_id: &str,
        payload: JoinLobbyPayload,
    ) -> Result<(), HandlerError> {
        let request = match JoinLobbyRequest::try_from(payload) {
            Ok(request) => request,
            Err(e) => return self.reject(connection_id, e).await,
        };

        info!(
            connection_id = %connection_id,
            room_id = %request.room_code,
            nickname = %request.nickname,
            "Handling join-lobby"
        );

        let room = match self.room_service.join_lobby(connection_id, request).await? {
            JoinRoomResult::Success(room) => room,
            JoinRoomResult::RoomNotFound => {
                return self.reject(connection_id, LobbyError::InvalidRoomId).await;
            }
            JoinRoomResult::RoomFull => {
                return self.reject(connection_id, LobbyError::LobbyFull).await;
            }
            JoinRoomResult::NicknameTaken => {
                return self.reject(connection_id, LobbyError::NicknameTaken).await;
            }
            JoinRoomResult::AlreadySeated => {
                return self.reject(connection_id, LobbyError::AlreadyInLobby).await;
            }
        };

        if !self.subscribe_to_room(connection_id, &room.id).await? {
            return Ok(());
        }

        MessageBroadcaster::broadcast_to_room(
            &self.connection_manager,
            &room.id,
            &WebSocketMessage::lobby_join(room.nicknames()),
        )
        .await?;

        // Sent on every join at or above the threshold, not only the first
        if room.is_ready() {
            if let Some(host_id) = room.host_connection_id.as_deref() {
                info!(room_id = %room.id, host = %host_id, "Lobby ready, notifying host");
                MessageBroadcaster::send_to_connection(
                    &self.connection_manager,
                    host_id,
                    &WebSocketMessage::lobby_ready(),
                )
                .await?;
            }
        }

        Ok(())
    }

    /// Empties the caller's room and tells every member
    pub async fn handle_reset_lobby(&self, connection_id: &str) -> Result<(), HandlerError> {
        let player = match self.room_service.find_player(connection_id).await? {
            Some(player) => player,
            None => {
                warn!(
                    connection_id = %connection_id,
                    "Reset requested by a connection without a room"
                );
                return Ok(());
            }
        };

        if self.room_service.settings().host_only_reset {
            let is_host = self
                .room_service
                .get_room(&player.room_id)
                .await?
                .is_some_and(|room| room.is_host(connection_id));

            if !is_host {
                return self.reject(connection_id, LobbyError::NotHost).await;
            }
        }

        info!(
            room_id = %player.room_id,
            requested_by = %player.nickname,
            "Resetting lobby"
        );

        if self.room_service.reset_lobby(&player.room_id).await?.is_none() {
            warn!(room_id = %player.room_id, "Room vanished before reset");
            return Ok(());
        }

        MessageBroadcaster::broadcast_to_room(
            &self.connection_manager,
            &player.room_id,
            &WebSocketMessage::reset_lobby_update(),
        )
        .await?;

        self.connection_manager.clear_group(&player.room_id).await;

        Ok(())
    }

    /// Adds a freshly seated connection to its room group. A reset may clear
    /// the seat before the subscription lands; the subscription is then
    /// undone and the caller alone is told the lobby was reset.
    async fn subscribe_to_room(
        &self,
        connection_id: &str,
        room_id: &str,
    ) -> Result<bool, HandlerError> {
        self.connection_manager.join_group(room_id, connection_id).await;

        let still_seated = self
            .room_service
            .find_player(connection_id)
            .await?
            .is_some_and(|player| player.room_id == room_id);

        if !still_seated {
            warn!(
                connection_id = %connection_id,
                room_id = %room_id,
                "Seat released before subscribing, dropping subscription"
            );
            self.connection_manager.leave_group(room_id, connection_id).await;
            MessageBroadcaster::send_to_connection(
                &self.connection_manager,
                connection_id,
                &WebSocketMessage::reset_lobby_update(),
            )
            .await?;
        }

        Ok(still_seated)
    }

    async fn reject(&self, connection_id: &str, error: LobbyError) -> Result<(), HandlerError> {
        info!(connection_id = %connection_id, reason = %error, "Rejecting lobby request");
        MessageBroadcaster::send_error(&self.connection_manager, connection_id, &error).await
    }
}

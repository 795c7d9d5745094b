use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::{
    generators::RoomCodeGenerator,
    models::{PlayerModel, RoomModel},
    repository::{JoinRoomResult, LeaveRoomResult, RoomRepository},
    types::{JoinLobbyRequest, RoomResponse},
};
use crate::{lobby::LobbySettings, shared::AppError};

/// Attempts at finding an unused room code before giving up
const MAX_CODE_ATTEMPTS: usize = 16;

/// Result of asking for a new lobby
#[derive(Debug, Clone)]
pub enum CreateRoomResult {
    Created(RoomModel),
    AlreadySeated,
}

/// Service for handling lobby business logic
pub struct RoomService {
    repository: Arc<dyn RoomRepository + Send + Sync>,
    code_generator: Arc<dyn RoomCodeGenerator>,
    settings: LobbySettings,
}

impl RoomService {
    pub fn new(
        repository: Arc<dyn RoomRepository + Send + Sync>,
        code_generator: Arc<dyn RoomCodeGenerator>,
        settings: LobbySettings,
    ) -> Self {
        Self {
            repository,
            code_generator,
            settings,
        }
    }

    pub fn settings(&self) -> &LobbySettings {
        &self.settings
    }

    /// Creates a room under a fresh code with the caller seated as host
    #[instrument(skip(self))]
    pub async fn create_lobby(
        &self,
        connection_id: &str,
        nickname: &str,
    ) -> Result<CreateRoomResult, AppError> {
        if self.repository.find_player(connection_id).await?.is_some() {
            debug!("Connection already seated, refusing to create a lobby");
            return Ok(CreateRoomResult::AlreadySeated);
        }

        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let room_id = self.code_generator.generate();
            let room = RoomModel::new(
                room_id.clone(),
                connection_id.to_string(),
                nickname.to_string(),
                &self.settings,
            );

            match self.repository.create_room(&room).await {
                Ok(()) => {
                    info!(room_id = %room_id, nickname = %nickname, "Lobby created");
                    return Ok(CreateRoomResult::Created(room));
                }
                Err(AppError::Conflict(_)) => {
                    debug!(room_id = %room_id, attempt, "Room code collision, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        warn!("Exhausted room code attempts");
        Err(AppError::Internal)
    }

    /// Seats a guest in an existing room
    #[instrument(
        skip(self, request),
        fields(room_id = %request.room_code, nickname = %request.nickname)
    )]
    pub async fn join_lobby(
        &self,
        connection_id: &str,
        request: JoinLobbyRequest,
    ) -> Result<JoinRoomResult, AppError> {
        let player = PlayerModel::new(
            connection_id.to_string(),
            request.room_code,
            request.nickname,
        );
        self.repository.try_join_room(player).await
    }

    /// Clears every seat of a room
    #[instrument(skip(self))]
    pub async fn reset_lobby(&self, room_id: &str) -> Result<Option<RoomModel>, AppError> {
        self.repository.reset_room(room_id).await
    }

    /// Gives up the seat held by a connection
    #[instrument(skip(self))]
    pub async fn leave(&self, connection_id: &str) -> Result<LeaveRoomResult, AppError> {
        self.repository.leave_room(connection_id).await
    }

    pub async fn find_player(&self, connection_id: &str) -> Result<Option<PlayerModel>, AppError> {
        self.repository.find_player(connection_id).await
    }

    pub async fn get_room(&self, room_id: &str) -> Result<Option<RoomModel>, AppError> {
        self.repository.get_room(room_id).await
    }

    pub async fn record_activity(&self, room_id: &str) -> Result<(), AppError> {
        self.repository.update_last_activity(room_id).await
    }

    /// Lists all rooms in the HTTP response shape
    #[instrument(skip(self))]
    pub async fn list_rooms(&self) -> Result<Vec<RoomResponse>, AppError> {
        let rooms = self.repository.list_rooms().await?;
        let mut responses: Vec<RoomResponse> = rooms.iter().map(RoomResponse::from).collect();
        responses.sort_by(|a, b| a.id.cmp(&b.id));

        debug!(room_count = responses.len(), "Rooms listed");
        Ok(responses)
    }
}

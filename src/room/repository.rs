use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use super::models::{PlayerModel, RoomModel};
use crate::shared::AppError;

/// Result of attempting to join a room
#[derive(Debug, Clone)]
pub enum JoinRoomResult {
    /// Successfully joined the room, returns updated room data
    Success(RoomModel),
    /// Room is at capacity
    RoomFull,
    /// Room does not exist
    RoomNotFound,
    /// Another player in the room already uses the nickname
    NicknameTaken,
    /// The connection already holds a seat somewhere
    AlreadySeated,
}

/// Result of a connection giving up its seat
#[derive(Debug, Clone)]
pub enum LeaveRoomResult {
    /// Player removed; `host_changed` is set when the host role moved
    Success {
        room: RoomModel,
        player: PlayerModel,
        host_changed: bool,
    },
    /// Player removed and nobody is left in the room
    RoomEmptied { room_id: String, player: PlayerModel },
    /// The connection holds no seat
    NotSeated,
}

/// Trait for room registry operations
#[async_trait]
pub trait RoomRepository {
    /// Inserts a room seated with its host; fails if the code is taken
    async fn create_room(&self, room: &RoomModel) -> Result<(), AppError>;
    async fn get_room(&self, room_id: &str) -> Result<Option<RoomModel>, AppError>;
    async fn list_rooms(&self) -> Result<Vec<RoomModel>, AppError>;

    /// Atomically checks capacity and nickname uniqueness, then seats the player
    async fn try_join_room(&self, player: PlayerModel) -> Result<JoinRoomResult, AppError>;

    /// Atomically removes the seat held by a connection
    async fn leave_room(&self, connection_id: &str) -> Result<LeaveRoomResult, AppError>;

    /// Clears every seat of a room, returning the room as it was before
    async fn reset_room(&self, room_id: &str) -> Result<Option<RoomModel>, AppError>;

    /// Deletes a room only if it is still inactive under the lock, returning
    /// the room as it was; `None` if it is gone or came back to life
    async fn delete_room_if_inactive(
        &self,
        room_id: &str,
        empty_ttl: Duration,
        idle_ttl: Duration,
    ) -> Result<Option<RoomModel>, AppError>;

    /// Player seated for a connection, if any
    async fn find_player(&self, connection_id: &str) -> Result<Option<PlayerModel>, AppError>;

    async fn update_last_activity(&self, room_id: &str) -> Result<(), AppError>;

    /// Rooms that are empty past `empty_ttl` or untouched past `idle_ttl`
    async fn get_inactive_rooms(
        &self,
        empty_ttl: Duration,
        idle_ttl: Duration,
    ) -> Result<Vec<String>, AppError>;
}

#[derive(Default)]
struct Registry {
    rooms: HashMap<String, RoomModel>,
    /// connection_id -> room_id
    seats: HashMap<String, String>,
}

/// In-memory implementation of RoomRepository. A single mutex guards both
/// the rooms and the seat index, so every mutation is atomic.
pub struct InMemoryRoomRepository {
    registry: Mutex<Registry>,
}

impl Default for InMemoryRoomRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRoomRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            registry: Mutex::new(Registry::default()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Registry>, AppError> {
        self.registry
            .lock()
            .map_err(|_| AppError::RegistryError("Room registry lock poisoned".to_string()))
    }
}

fn older_than(room: &RoomModel, ttl: Duration) -> bool {
    match chrono::Duration::from_std(ttl) {
        Ok(ttl) => Utc::now() - room.last_activity_at > ttl,
        Err(_) => false,
    }
}

fn is_inactive(room: &RoomModel, empty_ttl: Duration, idle_ttl: Duration) -> bool {
    (room.is_empty() && older_than(room, empty_ttl)) || older_than(room, idle_ttl)
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    #[instrument(skip(self, room))]
    async fn create_room(&self, room: &RoomModel) -> Result<(), AppError> {
        debug!(room_id = %room.id, "Creating room in memory");

        let mut registry = self.lock()?;
        if registry.rooms.contains_key(&room.id) {
            warn!(room_id = %room.id, "Room already exists in memory");
            return Err(AppError::Conflict("Room already exists".to_string()));
        }

        for player in &room.players {
            registry
                .seats
                .insert(player.connection_id.clone(), room.id.clone());
        }
        registry.rooms.insert(room.id.clone(), room.clone());

        debug!(room_id = %room.id, "Room created successfully in memory");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_room(&self, room_id: &str) -> Result<Option<RoomModel>, AppError> {
        let registry = self.lock()?;
        let room = registry.rooms.get(room_id).cloned();

        if room.is_none() {
            debug!(room_id = %room_id, "Room not found in memory");
        }

        Ok(room)
    }

    #[instrument(skip(self))]
    async fn list_rooms(&self) -> Result<Vec<RoomModel>, AppError> {
        let registry = self.lock()?;
        Ok(registry.rooms.values().cloned().collect())
    }

    #[instrument(
        skip(self, player),
        fields(room_id = %player.room_id, nickname = %player.nickname)
    )]
    async fn try_join_room(&self, player: PlayerModel) -> Result<JoinRoomResult, AppError> {
        debug!("Attempting to join room atomically");

        let mut registry = self.lock()?;

        if registry.seats.contains_key(&player.connection_id) {
            debug!(connection_id = %player.connection_id, "Connection already seated");
            return Ok(JoinRoomResult::AlreadySeated);
        }

        let room = match registry.rooms.get_mut(&player.room_id) {
            Some(room) => room,
            None => {
                debug!("Room not found");
                return Ok(JoinRoomResult::RoomNotFound);
            }
        };

        if room.is_full() {
            debug!(current_count = room.get_player_count(), "Room is full");
            return Ok(JoinRoomResult::RoomFull);
        }

        if room.has_nickname(&player.nickname) {
            debug!("Nickname already taken");
            return Ok(JoinRoomResult::NicknameTaken);
        }

        let connection_id = player.connection_id.clone();
        room.add_player(player);
        room.touch();
        let updated_room = room.clone();

        registry.seats.insert(connection_id, updated_room.id.clone());

        info!(
            new_player_count = updated_room.get_player_count(),
            "Player joined room successfully (atomic)"
        );

        Ok(JoinRoomResult::Success(updated_room))
    }

    #[instrument(skip(self))]
    async fn leave_room(&self, connection_id: &str) -> Result<LeaveRoomResult, AppError> {
        let mut registry = self.lock()?;

        let room_id = match registry.seats.remove(connection_id) {
            Some(room_id) => room_id,
            None => return Ok(LeaveRoomResult::NotSeated),
        };

        let room = match registry.rooms.get_mut(&room_id) {
            Some(room) => room,
            None => {
                warn!(room_id = %room_id, "Seat pointed at a missing room");
                return Ok(LeaveRoomResult::NotSeated);
            }
        };

        let was_host = room.is_host(connection_id);
        let player = match room.remove_player(connection_id) {
            Some(player) => player,
            None => {
                warn!(room_id = %room_id, "Seat pointed at a room without the player");
                return Ok(LeaveRoomResult::NotSeated);
            }
        };
        room.touch();

        if room.is_empty() {
            info!(room_id = %room_id, "Room is now empty");
            return Ok(LeaveRoomResult::RoomEmptied { room_id, player });
        }

        let updated_room = room.clone();

        info!(
            room_id = %room_id,
            nickname = %player.nickname,
            new_player_count = updated_room.get_player_count(),
            host_changed = was_host,
            "Player left room successfully (atomic)"
        );

        Ok(LeaveRoomResult::Success {
            room: updated_room,
            player,
            host_changed: was_host,
        })
    }

    #[instrument(skip(self))]
    async fn reset_room(&self, room_id: &str) -> Result<Option<RoomModel>, AppError> {
        let mut registry = self.lock()?;

        let previous = match registry.rooms.get_mut(room_id) {
            Some(room) => {
                let previous = room.clone();
                room.reset();
                room.touch();
                previous
            }
            None => return Ok(None),
        };

        for player in &previous.players {
            registry.seats.remove(&player.connection_id);
        }

        info!(
            room_id = %room_id,
            cleared_players = previous.get_player_count(),
            "Room reset"
        );

        Ok(Some(previous))
    }

    #[instrument(skip(self))]
    async fn delete_room_if_inactive(
        &self,
        room_id: &str,
        empty_ttl: Duration,
        idle_ttl: Duration,
    ) -> Result<Option<RoomModel>, AppError> {
        let mut registry = self.lock()?;

        let still_inactive = registry
            .rooms
            .get(room_id)
            .is_some_and(|room| is_inactive(room, empty_ttl, idle_ttl));
        if !still_inactive {
            debug!(room_id = %room_id, "Room no longer inactive, keeping it");
            return Ok(None);
        }

        let Some(room) = registry.rooms.remove(room_id) else {
            return Ok(None);
        };
        for player in &room.players {
            registry.seats.remove(&player.connection_id);
        }

        debug!(room_id = %room_id, "Room deleted from memory");
        Ok(Some(room))
    }

    async fn find_player(&self, connection_id: &str) -> Result<Option<PlayerModel>, AppError> {
        let registry = self.lock()?;

        let player = registry
            .seats
            .get(connection_id)
            .and_then(|room_id| registry.rooms.get(room_id))
            .and_then(|room| room.get_player(connection_id))
            .cloned();

        Ok(player)
    }

    async fn update_last_activity(&self, room_id: &str) -> Result<(), AppError> {
        let mut registry = self.lock()?;

        match registry.rooms.get_mut(room_id) {
            Some(room) => {
                room.touch();
                Ok(())
            }
            None => Err(AppError::NotFound(format!("Room {} not found", room_id))),
        }
    }

    #[instrument(skip(self))]
    async fn get_inactive_rooms(
        &self,
        empty_ttl: Duration,
        idle_ttl: Duration,
    ) -> Result<Vec<String>, AppError> {
        let registry = self.lock()?;

        let inactive = registry
            .rooms
            .values()
            .filter(|room| is_inactive(room, empty_ttl, idle_ttl))
            .map(|room| room.id.clone())
            .collect();

        Ok(inactive)
    }
}

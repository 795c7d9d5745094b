use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::lobby::LobbySettings;

/// A seat in a room, bound to one WebSocket connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerModel {
    pub connection_id: String,
    pub room_id: String,
    pub nickname: String,
    /// Assigned when the game starts, always unset in the lobby
    pub role: Option<String>,
}

impl PlayerModel {
    pub fn new(connection_id: String, room_id: String, nickname: String) -> Self {
        Self {
            connection_id,
            room_id,
            nickname,
            role: None,
        }
    }
}

/// In-memory model for a lobby room
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomModel {
    pub id: String, // Room code handed out to players
    /// Connection id of the host; always refers to an entry of `players`
    pub host_connection_id: Option<String>,
    pub players: Vec<PlayerModel>, // Join order
    pub min_player_count: usize,
    pub max_player_count: usize,
    pub created_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
}

impl RoomModel {
    /// Creates a room seated with its host
    pub fn new(
        id: String,
        host_connection_id: String,
        host_nickname: String,
        settings: &LobbySettings,
    ) -> Self {
        let now = Utc::now();
        let host = PlayerModel::new(host_connection_id.clone(), id.clone(), host_nickname);

        Self {
            id,
            host_connection_id: Some(host_connection_id),
            players: vec![host],
            min_player_count: settings.min_player_count,
            max_player_count: settings.max_player_count,
            created_at: now,
            last_activity_at: now,
        }
    }

    pub fn get_player_count(&self) -> usize {
        self.players.len()
    }

    pub fn is_full(&self) -> bool {
        self.players.len() >= self.max_player_count
    }

    /// Enough players to start a game
    pub fn is_ready(&self) -> bool {
        self.players.len() >= self.min_player_count
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn has_nickname(&self, nickname: &str) -> bool {
        self.players.iter().any(|p| p.nickname == nickname)
    }

    pub fn get_player(&self, connection_id: &str) -> Option<&PlayerModel> {
        self.players.iter().find(|p| p.connection_id == connection_id)
    }

    pub fn is_host(&self, connection_id: &str) -> bool {
        self.host_connection_id.as_deref() == Some(connection_id)
    }

    pub fn host(&self) -> Option<&PlayerModel> {
        self.host_connection_id
            .as_deref()
            .and_then(|id| self.get_player(id))
    }

    pub fn nicknames(&self) -> Vec<String> {
        self.players.iter().map(|p| p.nickname.clone()).collect()
    }

    /// Seats a player; a host-less room adopts the newcomer as host
    pub fn add_player(&mut self, player: PlayerModel) {
        if self.host_connection_id.is_none() {
            self.host_connection_id = Some(player.connection_id.clone());
        }
        self.players.push(player);
    }

    /// Removes a player, handing the host role to the earliest remaining
    /// player when the host leaves. Returns the removed player.
    pub fn remove_player(&mut self, connection_id: &str) -> Option<PlayerModel> {
        let index = self
            .players
            .iter()
            .position(|p| p.connection_id == connection_id)?;
        let removed = self.players.remove(index);

        if self.is_host(connection_id) {
            self.host_connection_id = self.players.first().map(|p| p.connection_id.clone());
        }

        Some(removed)
    }

    /// Back to an empty lobby under the same code
    pub fn reset(&mut self) {
        self.players.clear();
        self.host_connection_id = None;
    }

    pub fn touch(&mut self) {
        self.last_activity_at = Utc::now();
    }
}

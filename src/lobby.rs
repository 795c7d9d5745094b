use thiserror::Error;

/// Client-facing lobby failures. The display text is sent verbatim in the
/// `error` event payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LobbyError {
    #[error("Invalid join request.")]
    InvalidJoinRequest,
    #[error("Invalid room ID.")]
    InvalidRoomId,
    #[error("Lobby is full. Cannot join.")]
    LobbyFull,
    #[error("Nickname already taken. Please choose another.")]
    NicknameTaken,
    #[error("You are already in a lobby.")]
    AlreadyInLobby,
    #[error("Only the host can reset the lobby.")]
    NotHost,
    #[error("Unable to create a lobby right now. Please try again.")]
    Unavailable,
}

/// Rules every room is created with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LobbySettings {
    pub min_player_count: usize,
    pub max_player_count: usize,
    /// Restrict `reset-lobby` to the room host
    pub host_only_reset: bool,
}

impl Default for LobbySettings {
    fn default() -> Self {
        Self {
            min_player_count: 4,
            max_player_count: 12,
            host_only_reset: false,
        }
    }
}

impl LobbySettings {
    pub fn new(min_player_count: usize, max_player_count: usize) -> Self {
        Self {
            min_player_count,
            max_player_count,
            ..Self::default()
        }
    }

    pub fn with_host_only_reset(mut self, host_only_reset: bool) -> Self {
        self.host_only_reset = host_only_reset;
        self
    }
}

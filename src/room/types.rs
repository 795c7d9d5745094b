use serde::{Deserialize, Serialize};

use super::models::RoomModel;
use crate::lobby::LobbyError;

/// Raw `join-lobby` payload as sent by clients; both fields may be absent
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinLobbyPayload {
    pub room_code: Option<String>,
    pub nickname: Option<String>,
}

/// Validated `join-lobby` request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinLobbyRequest {
    pub room_code: String,
    pub nickname: String,
}

impl TryFrom<JoinLobbyPayload> for JoinLobbyRequest {
    type Error = LobbyError;

    fn try_from(payload: JoinLobbyPayload) -> Result<Self, Self::Error> {
        match (payload.room_code, payload.nickname) {
            (Some(room_code), Some(nickname)) if !room_code.is_empty() && !nickname.is_empty() => {
                Ok(Self {
                    room_code,
                    nickname,
                })
            }
            _ => Err(LobbyError::InvalidJoinRequest),
        }
    }
}

/// Response for room information
#[derive(Debug, Serialize, Deserialize)]
pub struct RoomResponse {
    pub id: String,
    pub host_nickname: Option<String>,
    pub players: Vec<String>,
    pub player_count: usize,
    pub min_player_count: usize,
    pub max_player_count: usize,
}

impl From<&RoomModel> for RoomResponse {
    fn from(room: &RoomModel) -> Self {
        Self {
            id: room.id.clone(),
            host_nickname: room.host().map(|host| host.nickname.clone()),
            players: room.nicknames(),
            player_count: room.get_player_count(),
            min_player_count: room.min_player_count,
            max_player_count: room.max_player_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, Some("Alice"))]
    #[case(Some("R1"), None)]
    #[case(Some(""), Some("Alice"))]
    #[case(Some("R1"), Some(""))]
    #[case(None, None)]
    fn test_incomplete_join_payload_is_invalid(
        #[case] room_code: Option<&str>,
        #[case] nickname: Option<&str>,
    ) {
        let payload = JoinLobbyPayload {
            room_code: room_code.map(String::from),
            nickname: nickname.map(String::from),
        };

        assert_eq!(
            JoinLobbyRequest::try_from(payload),
            Err(LobbyError::InvalidJoinRequest)
        );
    }

    #[test]
    fn test_join_payload_uses_camel_case() {
        let payload: JoinLobbyPayload =
            serde_json::from_str(r#"{"roomCode": "R1", "nickname": "Alice"}"#).unwrap();
        let request = JoinLobbyRequest::try_from(payload).unwrap();

        assert_eq!(request.room_code, "R1");
        assert_eq!(request.nickname, "Alice");
    }
}

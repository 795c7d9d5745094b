use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// Event names carried in the `type` field of every frame
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumIter)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum MessageType {
    // Client -> Server
    CreateLobby,
    JoinLobby,
    ResetLobby,

    // Both directions
    Message,

    // Server -> Client
    LobbyCode,
    LobbyJoin,
    LobbyReady,
    ResetLobbyUpdate,
    Error,
}

/// Metadata for WebSocket messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSocketMessageMeta {
    pub timestamp: DateTime<Utc>,
}

/// Base structure for WebSocket messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSocketMessage {
    #[serde(rename = "type")]
    pub message_type: MessageType,
    #[serde(default)]
    pub payload: serde_json::Value,
    pub meta: Option<WebSocketMessageMeta>,
}

/// Client-to-Server message payloads
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct CreateLobbyPayload {
    #[serde(default)]
    pub nickname: String,
}

/// Chat line; inbound it is the raw text, outbound it is prefixed with the
/// sender's nickname
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextPayload {
    pub text: String,
}

/// Server-to-Client message payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LobbyCodePayload {
    #[serde(rename = "roomID")]
    pub room_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LobbyJoinPayload {
    pub nicknames: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub message: String,
}

/// Helper functions for creating messages
impl WebSocketMessage {
    pub fn new(message_type: MessageType, payload: serde_json::Value) -> Self {
        Self {
            message_type,
            payload,
            meta: Some(WebSocketMessageMeta {
                timestamp: Utc::now(),
            }),
        }
    }

    fn empty(message_type: MessageType) -> Self {
        Self::new(message_type, serde_json::json!({}))
    }

    /// Create a `create-lobby` request
    pub fn create_lobby(nickname: String) -> Self {
        Self::new(
            MessageType::CreateLobby,
            serde_json::json!({ "nickname": nickname }),
        )
    }

    /// Create a `join-lobby` request
    pub fn join_lobby(room_code: String, nickname: String) -> Self {
        Self::new(
            MessageType::JoinLobby,
            serde_json::json!({ "roomCode": room_code, "nickname": nickname }),
        )
    }

    /// Create a `reset-lobby` request
    pub fn reset_lobby() -> Self {
        Self::empty(MessageType::ResetLobby)
    }

    /// Create a `message` frame
    pub fn text(text: String) -> Self {
        Self::new(MessageType::Message, serde_json::json!({ "text": text }))
    }

    /// Create a `lobby-code` message
    pub fn lobby_code(room_id: String) -> Self {
        Self::new(
            MessageType::LobbyCode,
            serde_json::json!({ "roomID": room_id }),
        )
    }

    /// Create a `lobby-join` message with nicknames in join order
    pub fn lobby_join(nicknames: Vec<String>) -> Self {
        Self::new(
            MessageType::LobbyJoin,
            serde_json::json!({ "nicknames": nicknames }),
        )
    }

    pub fn lobby_ready() -> Self {
        Self::empty(MessageType::LobbyReady)
    }

    pub fn reset_lobby_update() -> Self {
        Self::empty(MessageType::ResetLobbyUpdate)
    }

    /// Create an `error` message
    pub fn error(message: String) -> Self {
        Self::new(MessageType::Error, serde_json::json!({ "message": message }))
    }

    /// Decodes the payload into its typed form
    pub fn payload_as<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.payload.clone())
    }
}

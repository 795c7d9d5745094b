//! Terminal client helpers: turns typed lines into lobby frames and server
//! frames into something printable.

use thiserror::Error;

use crate::websockets::messages::{ErrorPayload, LobbyJoinPayload, MessageType, WebSocketMessage};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("Usage: {0}")]
    MissingArgument(&'static str),

    #[error("Unknown command: /{0}")]
    UnknownCommand(String),
}

/// A line typed by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    Create { nickname: String },
    Join { room_code: String, nickname: String },
    Reset,
    Chat { text: String },
    Quit,
}

impl ClientCommand {
    /// Parses `/create <nickname>`, `/join <code> <nickname>`, `/reset`,
    /// `/quit`; anything else is a chat line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let Some(command) = line.strip_prefix('/') else {
            return Ok(Some(Self::Chat {
                text: line.to_string(),
            }));
        };

        let (name, rest) = match command.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (command, ""),
        };

        let parsed = match name {
            "create" if !rest.is_empty() => Self::Create {
                nickname: rest.to_string(),
            },
            "create" => return Err(CommandError::MissingArgument("/create <nickname>")),
            "join" => match rest.split_once(char::is_whitespace) {
                Some((code, nickname)) if !nickname.trim().is_empty() => Self::Join {
                    room_code: code.to_string(),
                    nickname: nickname.trim().to_string(),
                },
                _ => return Err(CommandError::MissingArgument("/join <room code> <nickname>")),
            },
            "reset" => Self::Reset,
            "quit" | "exit" => Self::Quit,
            other => return Err(CommandError::UnknownCommand(other.to_string())),
        };

        Ok(Some(parsed))
    }

    /// Frame to send, `None` for local-only commands
    pub fn into_message(self) -> Option<WebSocketMessage> {
        match self {
            Self::Create { nickname } => Some(WebSocketMessage::create_lobby(nickname)),
            Self::Join {
                room_code,
                nickname,
            } => Some(WebSocketMessage::join_lobby(room_code, nickname)),
            Self::Reset => Some(WebSocketMessage::reset_lobby()),
            Self::Chat { text } => Some(WebSocketMessage::text(text)),
            Self::Quit => None,
        }
    }
}

/// What the client shows for a server frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientOutput {
    Notice(String),
    /// Server-reported failure; shown prominently
    Alert(String),
}

pub fn render(message: &WebSocketMessage) -> ClientOutput {
    match message.message_type {
        MessageType::Error => {
            let text = message
                .payload_as::<ErrorPayload>()
                .map(|payload| payload.message)
                .unwrap_or_else(|_| "Unknown error".to_string());
            ClientOutput::Alert(text)
        }
        MessageType::LobbyCode => {
            let code = message.payload["roomID"].as_str().unwrap_or_default();
            ClientOutput::Notice(format!("Lobby created. Room code: {}", code))
        }
        MessageType::LobbyJoin => {
            let nicknames = message
                .payload_as::<LobbyJoinPayload>()
                .map(|payload| payload.nicknames.join(", "))
                .unwrap_or_default();
            ClientOutput::Notice(format!("Players: {}", nicknames))
        }
        MessageType::LobbyReady => {
            ClientOutput::Notice("Enough players have joined. The game can start.".to_string())
        }
        MessageType::ResetLobbyUpdate => {
            ClientOutput::Notice("The lobby was reset.".to_string())
        }
        MessageType::Message => {
            let text = message
                .payload
                .as_str()
                .or_else(|| message.payload["text"].as_str())
                .unwrap_or_default();
            ClientOutput::Notice(text.to_string())
        }
        other => ClientOutput::Notice(format!("[{}]", other)),
    }
}

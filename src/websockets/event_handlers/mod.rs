use thiserror::Error;

use crate::shared::AppError;

pub mod chat_events;
pub mod connection_events;
pub mod lobby_events;
pub mod shared;

pub use chat_events::ChatEventHandlers;
pub use connection_events::ConnectionEventHandlers;
pub use lobby_events::LobbyEventHandlers;

/// Errors that can occur when handling socket events
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("Failed to serialize message: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Service error: {0}")]
    Service(#[from] AppError),
}

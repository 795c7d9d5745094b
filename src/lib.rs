// Library crate for the party-game lobby server
// This file exposes the public API for the binaries and integration tests

pub mod app;
pub mod client;
pub mod config;
pub mod lobby;
pub mod room;
pub mod shared;
pub mod websockets;

// Re-export commonly used types for easier access in tests
pub use app::build_router;
pub use config::ServerConfig;
pub use lobby::{LobbyError, LobbySettings};
pub use room::{models::RoomModel, repository::RoomRepository, RoomService};
pub use shared::{AppError, AppState};
pub use websockets::{
    ConnectionManager, InMemoryConnectionManager, MessageHandler, MessageType, WebSocketMessage,
    WebsocketReceiveHandler,
};

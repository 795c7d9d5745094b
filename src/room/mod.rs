// Public API - what other modules can use
pub use generators::{PetNameRoomCodeGenerator, RoomCodeGenerator};
pub use handlers::list_rooms;
pub use service::{CreateRoomResult, RoomService};

// Internal modules
pub mod cleanup_task;
pub mod generators;
mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod types;

use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{debug, error, info, instrument, warn};

use super::repository::RoomRepository;
use crate::shared::AppError;
use crate::websockets::{ConnectionManager, WebSocketMessage};

/// Configuration for the cleanup task
#[derive(Debug, Clone)]
pub struct CleanupConfig {
    /// How often to run the cleanup task
    pub cleanup_interval: Duration,
    /// How long a room may sit without players before deletion
    pub empty_room_ttl: Duration,
    /// How long any room may go untouched before deletion
    pub idle_room_ttl: Duration,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            cleanup_interval: Duration::from_secs(60),
            empty_room_ttl: Duration::from_secs(5 * 60), // 5 minutes
            idle_room_ttl: Duration::from_secs(24 * 60 * 60), // 24 hours
        }
    }
}

/// Starts the background cleanup task that periodically removes inactive rooms
#[instrument(skip(room_repository, connection_manager))]
pub async fn start_cleanup_task(
    room_repository: Arc<dyn RoomRepository + Send + Sync>,
    connection_manager: Arc<dyn ConnectionManager>,
    config: CleanupConfig,
) {
    info!(
        cleanup_interval_secs = config.cleanup_interval.as_secs(),
        empty_room_ttl_secs = config.empty_room_ttl.as_secs(),
        idle_room_ttl_secs = config.idle_room_ttl.as_secs(),
        "Starting room cleanup background task"
    );

    let mut cleanup_interval = interval(config.cleanup_interval);

    loop {
        cleanup_interval.tick().await;

        match cleanup_inactive_rooms(&room_repository, &connection_manager, &config).await {
            Ok(0) => {}
            Ok(deleted_count) => {
                info!(deleted_count = deleted_count, "Room cleanup completed");
            }
            Err(e) => {
                error!(error = %e, "Room cleanup task failed");
            }
        }
    }
}

/// Deletes rooms past their TTL and disbands their groups
pub async fn cleanup_inactive_rooms(
    room_repository: &Arc<dyn RoomRepository + Send + Sync>,
    connection_manager: &Arc<dyn ConnectionManager>,
    config: &CleanupConfig,
) -> Result<usize, AppError> {
    let inactive_room_ids = room_repository
        .get_inactive_rooms(config.empty_room_ttl, config.idle_room_ttl)
        .await?;

    if inactive_room_ids.is_empty() {
        return Ok(0);
    }

    info!(
        count = inactive_room_ids.len(),
        "Found inactive rooms to delete"
    );

    let mut deleted_count = 0;

    for room_id in inactive_room_ids {
        let deleted = room_repository
            .delete_room_if_inactive(&room_id, config.empty_room_ttl, config.idle_room_ttl)
            .await;

        match deleted {
            Ok(Some(room)) => {
                if !room.is_empty() {
                    notify_disbanded(connection_manager, &room_id).await;
                }
                connection_manager.clear_group(&room_id).await;
                deleted_count += 1;
                info!(
                    room_id = %room_id,
                    seated = room.get_player_count(),
                    "Deleted inactive room"
                );
            }
            Ok(None) => {
                debug!(room_id = %room_id, "Room became active again, skipped");
            }
            Err(e) => {
                warn!(
                    room_id = %room_id,
                    error = %e,
                    "Failed to delete inactive room"
                );
            }
        }
    }

    Ok(deleted_count)
}

/// Members of a reaped room are told their lobby is gone
async fn notify_disbanded(connection_manager: &Arc<dyn ConnectionManager>, room_id: &str) {
    match serde_json::to_string(&WebSocketMessage::reset_lobby_update()) {
        Ok(message) => connection_manager.send_to_group(room_id, &message).await,
        Err(e) => warn!(room_id = %room_id, error = %e, "Failed to encode disband notice"),
    }
}

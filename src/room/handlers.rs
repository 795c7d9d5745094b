use axum::{extract::State, Json};
use tracing::{info, instrument};

use super::types::RoomResponse;
use crate::shared::{AppError, AppState};

/// HTTP handler for listing all rooms
///
/// GET /rooms
/// Returns array of all rooms, sorted by code
#[instrument(name = "list_rooms", skip(state))]
pub async fn list_rooms(
    State(state): State<AppState>,
) -> Result<Json<Vec<RoomResponse>>, AppError> {
    let rooms = state.room_service.list_rooms().await?;

    info!(room_count = rooms.len(), "Rooms listed successfully");

    Ok(Json(rooms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_utils::AppStateBuilder;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        Router,
    };
    use tower::ServiceExt; // for `oneshot`

    #[tokio::test]
    async fn test_list_rooms_handler() {
        let app_state = AppStateBuilder::new().build();

        app_state
            .room_service
            .create_lobby("conn-1", "Host")
            .await
            .unwrap();

        let app = Router::new()
            .route("/rooms", axum::routing::get(list_rooms))
            .with_state(app_state);

        let request = Request::builder()
            .method("GET")
            .uri("/rooms")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let rooms: Vec<RoomResponse> = serde_json::from_slice(&body).unwrap();

        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].host_nickname.as_deref(), Some("Host"));
        assert_eq!(rooms[0].players, vec!["Host"]);
    }

    #[tokio::test]
    async fn test_list_rooms_handler_empty() {
        let app = Router::new()
            .route("/rooms", axum::routing::get(list_rooms))
            .with_state(AppStateBuilder::new().build());

        let request = Request::builder()
            .uri("/rooms")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        assert_eq!(&body[..], b"[]");
    }
}

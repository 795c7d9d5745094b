use mafia_lobby::{
    build_router,
    room::{cleanup_task, repository::InMemoryRoomRepository, PetNameRoomCodeGenerator},
    AppState, InMemoryConnectionManager, ServerConfig,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mafia_lobby=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    info!(
        bind_addr = %config.bind_addr,
        min_players = config.lobby.min_player_count,
        max_players = config.lobby.max_player_count,
        host_only_reset = config.lobby.host_only_reset,
        "Starting lobby server"
    );

    let app_state = AppState::new(
        Arc::new(InMemoryRoomRepository::new()),
        Arc::new(InMemoryConnectionManager::new()),
        Arc::new(PetNameRoomCodeGenerator::new()),
        config.lobby.clone(),
    );

    tokio::spawn(cleanup_task::start_cleanup_task(
        app_state.room_repository.clone(),
        app_state.connection_manager.clone(),
        config.cleanup.clone(),
    ));

    let app = build_router(app_state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Server running on http://{}", config.bind_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

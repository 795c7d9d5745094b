#![allow(dead_code)] // Not every test file uses every helper

use std::sync::Arc;
use tokio::sync::mpsc;

use mafia_lobby::{
    room::repository::InMemoryRoomRepository, AppState, ConnectionManager, LobbySettings,
};

use super::mocks::{FixedRoomCodes, MockConnectionManager};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub app_state: AppState,
    pub mock_conn_manager: Arc<MockConnectionManager>,
    pub connections: Vec<String>,
}

pub struct TestSetupBuilder {
    connections: Vec<String>,
    codes: Vec<String>,
    settings: LobbySettings,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            connections: vec![],
            codes: vec!["R1".to_string(), "R2".to_string()],
            settings: LobbySettings::default(),
        }
    }

    /// Connection ids registered before the test starts
    pub fn with_connections(mut self, connections: Vec<&str>) -> Self {
        self.connections = connections.into_iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_codes(mut self, codes: Vec<&str>) -> Self {
        self.codes = codes.into_iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_player_bounds(mut self, min: usize, max: usize) -> Self {
        let host_only_reset = self.settings.host_only_reset;
        self.settings = LobbySettings::new(min, max).with_host_only_reset(host_only_reset);
        self
    }

    pub fn with_host_only_reset(mut self) -> Self {
        self.settings = self.settings.with_host_only_reset(true);
        self
    }

    pub async fn build(self) -> TestSetup {
        let mock_conn_manager = Arc::new(MockConnectionManager::new());
        let codes: Vec<&str> = self.codes.iter().map(String::as_str).collect();

        let app_state = AppState::new(
            Arc::new(InMemoryRoomRepository::new()),
            mock_conn_manager.clone(),
            Arc::new(FixedRoomCodes::new(&codes)),
            self.settings,
        );

        for connection_id in &self.connections {
            let (sender, _receiver) = mpsc::unbounded_channel();
            mock_conn_manager
                .add_connection(connection_id.clone(), sender)
                .await;
        }

        TestSetup {
            app_state,
            mock_conn_manager,
            connections: self.connections,
        }
    }
}

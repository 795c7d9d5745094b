#![allow(dead_code)] // Not every test file uses every helper

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, RwLock};

use mafia_lobby::{room::RoomCodeGenerator, ConnectionManager};

// ============================================================================
// Mock Infrastructure
// ============================================================================

#[derive(Default)]
struct Recorded {
    connected: Vec<String>,
    groups: HashMap<String, Vec<String>>,
    // connection_id -> frames not yet consumed by an assertion
    inboxes: HashMap<String, VecDeque<String>>,
}

/// Records every frame per connection instead of writing to sockets
#[derive(Clone, Default)]
pub struct MockConnectionManager {
    recorded: Arc<RwLock<Recorded>>,
}

impl MockConnectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_messages_for(&self, connection_id: &str) -> Vec<String> {
        self.recorded
            .read()
            .await
            .inboxes
            .get(connection_id)
            .map(|inbox| inbox.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Pops the oldest unread frame for a connection
    pub async fn consume_message_for(&self, connection_id: &str) -> Option<String> {
        self.recorded
            .write()
            .await
            .inboxes
            .get_mut(connection_id)
            .and_then(VecDeque::pop_front)
    }

    pub async fn group_members(&self, group: &str) -> Vec<String> {
        self.recorded
            .read()
            .await
            .groups
            .get(group)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn clear_messages(&self) {
        self.recorded.write().await.inboxes.clear();
    }
}

#[async_trait]
impl ConnectionManager for MockConnectionManager {
    async fn add_connection(&self, connection_id: String, _sender: mpsc::UnboundedSender<String>) {
        self.recorded.write().await.connected.push(connection_id);
    }

    async fn remove_connection(&self, connection_id: &str) {
        let mut recorded = self.recorded.write().await;
        recorded.connected.retain(|c| c != connection_id);
        for members in recorded.groups.values_mut() {
            members.retain(|m| m != connection_id);
        }
    }

    async fn join_group(&self, group: &str, connection_id: &str) {
        let mut recorded = self.recorded.write().await;
        let members = recorded.groups.entry(group.to_string()).or_default();
        if !members.iter().any(|m| m == connection_id) {
            members.push(connection_id.to_string());
        }
    }

    async fn leave_group(&self, group: &str, connection_id: &str) {
        if let Some(members) = self.recorded.write().await.groups.get_mut(group) {
            members.retain(|m| m != connection_id);
        }
    }

    async fn clear_group(&self, group: &str) {
        self.recorded.write().await.groups.remove(group);
    }

    async fn send_to_connection(&self, connection_id: &str, message: &str) {
        let mut recorded = self.recorded.write().await;
        if recorded.connected.iter().any(|c| c == connection_id) {
            recorded
                .inboxes
                .entry(connection_id.to_string())
                .or_default()
                .push_back(message.to_string());
        }
    }

    async fn send_to_group(&self, group: &str, message: &str) {
        let members = self.group_members(group).await;
        for member in members {
            self.send_to_connection(&member, message).await;
        }
    }

    async fn count_connections(&self) -> usize {
        self.recorded.read().await.connected.len()
    }
}

/// Hands out room codes in order, repeating the last one
pub struct FixedRoomCodes(Mutex<VecDeque<String>>);

impl FixedRoomCodes {
    pub fn new(codes: &[&str]) -> Self {
        Self(Mutex::new(codes.iter().map(|c| c.to_string()).collect()))
    }
}

impl RoomCodeGenerator for FixedRoomCodes {
    fn generate(&self) -> String {
        let mut codes = self.0.lock().unwrap();
        if codes.len() > 1 {
            codes.pop_front().unwrap()
        } else {
            codes.front().cloned().unwrap()
        }
    }
}

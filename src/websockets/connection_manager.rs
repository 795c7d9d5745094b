use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::debug;

/// Outbound fan-out: one channel per connection plus named groups of
/// connections (one group per room)
#[async_trait]
pub trait ConnectionManager: Send + Sync {
    async fn add_connection(&self, connection_id: String, sender: mpsc::UnboundedSender<String>);

    /// Drops the connection and its group memberships
    async fn remove_connection(&self, connection_id: &str);

    async fn join_group(&self, group: &str, connection_id: &str);

    async fn leave_group(&self, group: &str, connection_id: &str);

    /// Unsubscribes every member of a group
    async fn clear_group(&self, group: &str);

    async fn send_to_connection(&self, connection_id: &str, message: &str);

    async fn send_to_group(&self, group: &str, message: &str);

    async fn count_connections(&self) -> usize;
}

#[derive(Default)]
struct Connections {
    // connection_id -> sender
    senders: HashMap<String, mpsc::UnboundedSender<String>>,
    // group -> members, in subscription order
    groups: HashMap<String, Vec<String>>,
}

pub struct InMemoryConnectionManager {
    connections: Arc<RwLock<Connections>>,
}

impl Default for InMemoryConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryConnectionManager {
    pub fn new() -> Self {
        Self {
            connections: Arc::new(RwLock::new(Connections::default())),
        }
    }
}

#[async_trait]
impl ConnectionManager for InMemoryConnectionManager {
    async fn add_connection(&self, connection_id: String, sender: mpsc::UnboundedSender<String>) {
        let mut connections = self.connections.write().await;
        connections.senders.insert(connection_id, sender);
    }

    async fn remove_connection(&self, connection_id: &str) {
        let mut connections = self.connections.write().await;
        connections.senders.remove(connection_id);
        for members in connections.groups.values_mut() {
            members.retain(|member| member != connection_id);
        }
        connections.groups.retain(|_, members| !members.is_empty());
    }

    async fn join_group(&self, group: &str, connection_id: &str) {
        let mut connections = self.connections.write().await;
        let members = connections.groups.entry(group.to_string()).or_default();
        if !members.iter().any(|member| member == connection_id) {
            members.push(connection_id.to_string());
        }
    }

    async fn leave_group(&self, group: &str, connection_id: &str) {
        let mut connections = self.connections.write().await;
        if let Some(members) = connections.groups.get_mut(group) {
            members.retain(|member| member != connection_id);
            if members.is_empty() {
                connections.groups.remove(group);
            }
        }
    }

    async fn clear_group(&self, group: &str) {
        let mut connections = self.connections.write().await;
        connections.groups.remove(group);
    }

    async fn send_to_connection(&self, connection_id: &str, message: &str) {
        let connections = self.connections.read().await;
        if let Some(sender) = connections.senders.get(connection_id) {
            let _ = sender.send(message.to_string());
        }
    }

    async fn send_to_group(&self, group: &str, message: &str) {
        let connections = self.connections.read().await;
        let Some(members) = connections.groups.get(group) else {
            debug!(group = %group, "Group has no members");
            return;
        };

        for member in members {
            if let Some(sender) = connections.senders.get(member) {
                let _ = sender.send(message.to_string());
            }
        }
    }

    async fn count_connections(&self) -> usize {
        self.connections.read().await.senders.len()
    }
}

//! Test assertion helpers - fluent API for verifying test expectations
#![allow(dead_code)] // Test utilities may not all be used in every test

use mafia_lobby::{MessageType, WebSocketMessage};

use super::setup::TestSetup;

// ============================================================================
// Assertion Helpers
// ============================================================================

pub struct MessageAssertion<'a> {
    setup: &'a TestSetup,
    connections: Vec<&'a str>,
}

impl<'a> MessageAssertion<'a> {
    pub fn for_connections(setup: &'a TestSetup, connections: Vec<&'a str>) -> Self {
        Self { setup, connections }
    }

    pub fn for_connection(setup: &'a TestSetup, connection_id: &'a str) -> Self {
        Self::for_connections(setup, vec![connection_id])
    }

    /// Asserts the next frame of every connection has the given type
    /// (consumes it) and that all of them carry the same payload
    pub async fn received_message_type(self, expected_type: MessageType) -> MessageContent {
        let mut messages = vec![];

        for connection_id in &self.connections {
            let raw = self
                .setup
                .mock_conn_manager
                .consume_message_for(connection_id)
                .await;
            assert!(
                raw.is_some(),
                "{} should have received a {} message",
                connection_id,
                expected_type
            );

            let msg: WebSocketMessage = serde_json::from_str(&raw.unwrap()).unwrap();
            assert_eq!(
                msg.message_type, expected_type,
                "{} received wrong message type",
                connection_id
            );
            messages.push(msg);
        }

        for (i, msg) in messages.iter().enumerate().skip(1) {
            assert_eq!(
                msg.payload, messages[0].payload,
                "{} payload differs from {}",
                self.connections[i], self.connections[0]
            );
        }

        MessageContent {
            payload: messages[0].payload.clone(),
        }
    }

    /// Asserts the next frame is an error carrying `expected` (consumes it)
    pub async fn received_error(self, expected: &str) {
        self.received_message_type(MessageType::Error)
            .await
            .verify_error_message(expected);
    }

    pub async fn received_no_messages(self) {
        for connection_id in &self.connections {
            let messages = self
                .setup
                .mock_conn_manager
                .get_messages_for(connection_id)
                .await;
            assert!(
                messages.is_empty(),
                "{} should not have received any messages, got {:?}",
                connection_id,
                messages
            );
        }
    }

    /// Non-consuming count of one message type
    pub async fn count_message_type(&self, connection_id: &str, msg_type: MessageType) -> usize {
        self.setup
            .mock_conn_manager
            .get_messages_for(connection_id)
            .await
            .iter()
            .filter_map(|raw| serde_json::from_str::<WebSocketMessage>(raw).ok())
            .filter(|msg| msg.message_type == msg_type)
            .count()
    }

    /// Asserts the full remaining inbox, in order, has exactly these types
    pub async fn received_message_sequence(self, expected_types: Vec<MessageType>) {
        for connection_id in &self.connections {
            let types: Vec<MessageType> = self
                .setup
                .mock_conn_manager
                .get_messages_for(connection_id)
                .await
                .iter()
                .map(|raw| {
                    serde_json::from_str::<WebSocketMessage>(raw)
                        .unwrap()
                        .message_type
                })
                .collect();
            assert_eq!(
                types, expected_types,
                "{} received an unexpected sequence",
                connection_id
            );
        }
    }
}

pub struct MessageContent {
    pub payload: serde_json::Value,
}

impl MessageContent {
    pub fn verify_room_code(self, expected: &str) -> Self {
        assert_eq!(self.payload["roomID"], expected);
        self
    }

    pub fn verify_nicknames(self, expected: &[&str]) -> Self {
        let nicknames: Vec<String> =
            serde_json::from_value(self.payload["nicknames"].clone()).unwrap();
        assert_eq!(nicknames, expected);
        self
    }

    pub fn verify_text(self, expected: &str) -> Self {
        assert_eq!(self.payload["text"], expected);
        self
    }

    pub fn verify_error_message(self, expected: &str) -> Self {
        assert_eq!(self.payload["message"], expected);
        self
    }
}

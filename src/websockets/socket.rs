use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use futures::stream::StreamExt;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Simple WebSocket abstraction - all we care about is send/receive
#[async_trait]
pub trait SocketWrapper: Send {
    /// Send a text message to the client
    async fn send_message(&mut self, message: String) -> Result<(), SocketError>;

    /// Receive the next text message from the client (None if connection closed)
    async fn receive_message(&mut self) -> Result<Option<String>, SocketError>;

    /// Close the connection
    async fn close(&mut self) -> Result<(), SocketError>;
}

/// Handler for incoming WebSocket messages
#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// Handle an incoming message from the client
    async fn handle_message(&self, connection_id: &str, message: String);
}

#[derive(Debug)]
pub enum SocketError {
    ConnectionClosed,
    SendFailed(String),
    ReceiveFailed(String),
}

/// Direct implementation on axum's WebSocket
#[async_trait]
impl SocketWrapper for WebSocket {
    async fn send_message(&mut self, message: String) -> Result<(), SocketError> {
        self.send(Message::Text(message))
            .await
            .map_err(|e| SocketError::SendFailed(e.to_string()))
    }

    async fn receive_message(&mut self) -> Result<Option<String>, SocketError> {
        loop {
            match self.next().await {
                Some(Ok(Message::Text(text))) => return Ok(Some(text)),
                Some(Ok(Message::Close(_))) => return Ok(None),
                Some(Ok(_)) => continue, // Ignore binary/ping/pong
                Some(Err(e)) => return Err(SocketError::ReceiveFailed(e.to_string())),
                None => return Ok(None), // Connection closed
            }
        }
    }

    async fn close(&mut self) -> Result<(), SocketError> {
        self.send(Message::Close(None))
            .await
            .map_err(|e| SocketError::SendFailed(e.to_string()))
    }
}

/// Connection represents a managed WebSocket connection
/// It is used to send and receive messages to and from the client
/// The outbound receiver is a channel that receives messages from the
/// ConnectionManager's outbound sender
pub struct Connection {
    pub connection_id: String,
    socket: Box<dyn SocketWrapper>,
    outbound_receiver: mpsc::UnboundedReceiver<String>,
    message_handler: Arc<dyn MessageHandler>,
}

impl Connection {
    pub fn new(
        connection_id: String,
        socket: Box<dyn SocketWrapper>,
        outbound_receiver: mpsc::UnboundedReceiver<String>,
        message_handler: Arc<dyn MessageHandler>,
    ) -> Self {
        Self {
            connection_id,
            socket,
            outbound_receiver,
            message_handler,
        }
    }

    /// Run the connection - handles both sending and receiving until disconnect.
    /// Inbound messages are handled one at a time, in arrival order.
    pub async fn run(mut self) -> Result<(), SocketError> {
        loop {
            tokio::select! {
                // Handle outbound messages (from our app to client)
                msg = self.outbound_receiver.recv() => {
                    match msg {
                        Some(message) => {
                            self.socket.send_message(message).await?
                        }
                        None => break, // Channel closed, disconnect
                    }
                }

                // Handle inbound messages (from client to our app)
                msg = self.socket.receive_message() => {
                    match msg {
                        Ok(Some(message)) => {
                            self.message_handler
                                .handle_message(&self.connection_id, message)
                                .await;
                        }
                        Ok(None) => break, // Client disconnected
                        Err(e) => return Err(e),
                    }
                }
            }
        }

        // Clean disconnect
        let _ = self.socket.close().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Scripted socket: yields queued inbound frames, then reports closure
    struct ScriptedSocket {
        inbound: VecDeque<String>,
        sent: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl SocketWrapper for ScriptedSocket {
        async fn send_message(&mut self, message: String) -> Result<(), SocketError> {
            self.sent.lock().unwrap().push(message);
            Ok(())
        }

        async fn receive_message(&mut self) -> Result<Option<String>, SocketError> {
            Ok(self.inbound.pop_front())
        }

        async fn close(&mut self) -> Result<(), SocketError> {
            Ok(())
        }
    }

    struct RecordingHandler(Mutex<Vec<(String, String)>>);

    #[async_trait]
    impl MessageHandler for RecordingHandler {
        async fn handle_message(&self, connection_id: &str, message: String) {
            self.0
                .lock()
                .unwrap()
                .push((connection_id.to_string(), message));
        }
    }

    #[tokio::test]
    async fn test_inbound_frames_reach_handler_in_order() {
        let handler = Arc::new(RecordingHandler(Mutex::new(vec![])));
        let (_sender, receiver) = mpsc::unbounded_channel();
        let socket = ScriptedSocket {
            inbound: VecDeque::from(vec!["first".to_string(), "second".to_string()]),
            sent: Arc::new(Mutex::new(vec![])),
        };

        let connection = Connection::new(
            "c1".to_string(),
            Box::new(socket),
            receiver,
            handler.clone(),
        );
        connection.run().await.unwrap();

        let received = handler.0.lock().unwrap().clone();
        assert_eq!(
            received,
            vec![
                ("c1".to_string(), "first".to_string()),
                ("c1".to_string(), "second".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_closed_outbound_channel_ends_connection() {
        let handler = Arc::new(RecordingHandler(Mutex::new(vec![])));
        let (sender, receiver) = mpsc::unbounded_channel();
        sender.send("queued".to_string()).unwrap();
        drop(sender);

        let sent = Arc::new(Mutex::new(vec![]));
        let socket = ScriptedSocket {
            inbound: VecDeque::new(),
            sent: sent.clone(),
        };

        let connection = Connection::new("c1".to_string(), Box::new(socket), receiver, handler);
        connection.run().await.unwrap();

        // Either branch may win the race to end the loop; nothing else is sent
        assert!(sent.lock().unwrap().len() <= 1);
    }
}

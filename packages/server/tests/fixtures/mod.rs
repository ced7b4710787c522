//! Test fixtures shared by the integration tests.
//!
//! The server runs in-process on an ephemeral port, so tests can run in
//! parallel without port juggling.

#![allow(dead_code)]

use std::{net::SocketAddr, time::Duration};

use chanoma_server::ui::{Server, ServerConfig, ServerError, ShutdownCoordinator};
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::{net::TcpStream, task::JoinHandle};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{Message, protocol::CloseFrame},
};

/// How long a test waits for an expected frame
pub const RECV_TIMEOUT: Duration = Duration::from_secs(3);

/// Server running on the test runtime
pub struct TestServer {
    addr: SocketAddr,
    shutdown: ShutdownCoordinator,
    handle: JoinHandle<Result<(), ServerError>>,
}

impl TestServer {
    /// Start a server with default settings on an ephemeral port
    pub async fn start() -> Self {
        Self::start_with(ServerConfig::default()).await
    }

    /// Start a server with the given settings on an ephemeral port
    pub async fn start_with(config: ServerConfig) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");
        let server = Server::new(config.port(addr.port()));
        let shutdown = server.shutdown_handle();
        let handle = tokio::spawn(server.serve(listener));
        Self {
            addr,
            shutdown,
            handle,
        }
    }

    /// Get the WebSocket URL for this server
    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    /// Get the HTTP base URL for this server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn shutdown(&self) -> &ShutdownCoordinator {
        &self.shutdown
    }

    /// Wait for `serve` to return
    pub async fn join(self) -> Result<(), ServerError> {
        tokio::time::timeout(Duration::from_secs(10), self.handle)
            .await
            .expect("Server did not stop in time")
            .expect("Server task panicked")
    }

    /// Poll the detail endpoint until the room is gone
    pub async fn wait_until_room_gone(&self, room_id: &str) {
        let client = reqwest::Client::new();
        let url = format!("{}/api/rooms/{}", self.base_url(), room_id);
        for _ in 0..100 {
            let response = client.get(&url).send().await.expect("Failed to send request");
            if response.status() == 404 {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("Room '{room_id}' was never removed");
    }
}

/// WebSocket client speaking the JSON protocol
pub struct TestClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl TestClient {
    pub async fn connect(server: &TestServer) -> Self {
        let (stream, _) = connect_async(server.ws_url())
            .await
            .expect("Failed to connect");
        Self { stream }
    }

    pub async fn send_json(&mut self, value: Value) {
        self.stream
            .send(Message::text(value.to_string()))
            .await
            .expect("Failed to send frame");
    }

    pub async fn send_raw(&mut self, text: &str) {
        self.stream
            .send(Message::text(text.to_string()))
            .await
            .expect("Failed to send frame");
    }

    /// Next JSON frame, skipping control frames
    pub async fn recv_json(&mut self) -> Value {
        loop {
            let msg = tokio::time::timeout(RECV_TIMEOUT, self.stream.next())
                .await
                .expect("Timed out waiting for a frame")
                .expect("Stream ended")
                .expect("WebSocket error");
            match msg {
                Message::Text(text) => {
                    return serde_json::from_str(text.as_str()).expect("Frame is not JSON");
                }
                Message::Close(frame) => panic!("Unexpected close: {frame:?}"),
                _ => continue,
            }
        }
    }

    /// Skip frames until one with the given `type` arrives
    pub async fn recv_type(&mut self, message_type: &str) -> Value {
        loop {
            let value = self.recv_json().await;
            if value["type"] == message_type {
                return value;
            }
        }
    }

    /// Assert that no text frame arrives within `wait`
    pub async fn expect_silence(&mut self, wait: Duration) {
        if let Ok(Some(Ok(Message::Text(text)))) =
            tokio::time::timeout(wait, self.stream.next()).await
        {
            panic!("Expected no frame, got {}", text.as_str());
        }
    }

    /// Read until the server closes the socket and return its close frame
    pub async fn recv_close(&mut self) -> Option<CloseFrame> {
        loop {
            let next = tokio::time::timeout(RECV_TIMEOUT, self.stream.next())
                .await
                .expect("Timed out waiting for close");
            match next {
                Some(Ok(Message::Close(frame))) => return frame,
                Some(Ok(_)) => continue,
                Some(Err(_)) | None => return None,
            }
        }
    }

    /// Create a room and return its ID
    pub async fn create_room(&mut self) -> String {
        self.send_json(serde_json::json!({"type": "create-room"}))
            .await;
        let created = self.recv_type("room-created").await;
        created["roomId"]
            .as_str()
            .expect("roomId should be a string")
            .to_string()
    }

    /// Join a room and return the `room-data` snapshot
    pub async fn join_room(&mut self, room_id: &str) -> Value {
        self.send_json(serde_json::json!({"type": "join-room", "roomId": room_id}))
            .await;
        self.recv_type("room-data").await
    }

    pub async fn close(mut self) {
        let _ = self.stream.close(None).await;
    }
}

//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの `UnboundedSender` を管理（接続レジストリ）
//! - ドメインイベントを JSON にエンコードしてクライアントへ送信（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、メッセージ送信に使用します。
//! 送信はチャンネルへの追加のみで、ソケットへの書き込みは接続ごとの writer タスクが行うため、
//! 遅いクライアントが他のクライアントへの配信を遅らせることはありません。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{ConnectionId, MessagePushError, MessagePusher, PusherChannel, ServerEvent},
    infrastructure::dto::websocket::{ServerMessage, encode_message},
};

/// WebSocket を使った MessagePusher 実装
#[derive(Default)]
pub struct WebSocketMessagePusher {
    /// 接続中のクライアントの WebSocket sender
    clients: Mutex<HashMap<ConnectionId, PusherChannel>>,
}

impl WebSocketMessagePusher {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登録中のクライアント数
    pub async fn client_count(&self) -> usize {
        self.clients.lock().await.len()
    }

    fn encode(event: &ServerEvent) -> Option<String> {
        match encode_message(&ServerMessage::from(event)) {
            Ok(json) => Some(json),
            Err(e) => {
                tracing::error!("Failed to encode event {:?}: {}", event, e);
                None
            }
        }
    }

    /// 1 件送信する。切断済み・未登録の宛先は黙ってスキップし false を返す。
    fn deliver(
        clients: &HashMap<ConnectionId, PusherChannel>,
        target: &ConnectionId,
        json: &str,
    ) -> bool {
        let Some(sender) = clients.get(target) else {
            tracing::debug!("Client '{}' not registered, skipping", target);
            return false;
        };
        if sender.is_closed() {
            tracing::debug!("Client '{}' already closed, skipping", target);
            return false;
        }
        match sender.send(json.to_string()) {
            Ok(()) => true,
            Err(_) => {
                tracing::debug!("Client '{}' closed during delivery, skipping", target);
                false
            }
        }
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        clients.insert(connection_id, sender);
        tracing::debug!("Client '{}' registered to MessagePusher", connection_id);
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) {
        let mut clients = self.clients.lock().await;
        clients.remove(connection_id);
        tracing::debug!("Client '{}' unregistered from MessagePusher", connection_id);
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError> {
        let json = Self::encode(event)
            .ok_or_else(|| MessagePushError::PushFailed("encoding failed".to_string()))?;
        let clients = self.clients.lock().await;

        let sender = clients
            .get(connection_id)
            .ok_or_else(|| MessagePushError::ClientNotFound(connection_id.to_string()))?;
        sender
            .send(json)
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!("Pushed message to client '{}'", connection_id);
        Ok(())
    }

    async fn broadcast(&self, targets: Vec<ConnectionId>, event: &ServerEvent) -> usize {
        if targets.is_empty() {
            return 0;
        }
        let Some(json) = Self::encode(event) else {
            return 0;
        };
        let clients = self.clients.lock().await;

        let delivered = targets
            .iter()
            .filter(|target| Self::deliver(&clients, target, &json))
            .count();
        tracing::debug!(
            "Broadcasted message to {}/{} clients",
            delivered,
            targets.len()
        );
        delivered
    }

    async fn broadcast_all(&self, event: &ServerEvent) -> usize {
        let Some(json) = Self::encode(event) else {
            return 0;
        };
        let clients = self.clients.lock().await;

        clients
            .keys()
            .filter(|target| Self::deliver(&clients, target, &json))
            .count()
    }
}

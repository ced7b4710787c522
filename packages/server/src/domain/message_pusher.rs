//! MessagePusher trait 定義
//!
//! クライアントへのイベント送信（push / broadcast）の抽象化。
//! WebSocket などの具体的な送信手段は Infrastructure 層が実装します。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError, ServerEvent};

/// クライアントごとの送信チャンネル
///
/// 送信はキューへの追加のみでブロックしない。実際のソケット書き込みは
/// 接続ごとの writer タスクが行う。
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// MessagePusher trait
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// クライアントの送信チャンネルを登録
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// クライアントの送信チャンネルを登録解除
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// 特定のクライアントにイベントを送信
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError>;

    /// 複数のクライアントにイベントを送信
    ///
    /// 切断済み・未登録のクライアントはスキップされ、他の宛先への配信は継続する。
    /// 戻り値は実際に配信できた件数。
    async fn broadcast(&self, targets: Vec<ConnectionId>, event: &ServerEvent) -> usize;

    /// 登録中の全クライアントにイベントを送信
    async fn broadcast_all(&self, event: &ServerEvent) -> usize;
}

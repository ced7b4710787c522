//! UseCase: 接続の開始処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectParticipantUseCase::execute() メソッド
//! - 接続レジストリへの登録（重複チェック、送信チャンネルの登録）
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規接続の登録
//! - 異常系：同じ ConnectionId での二重登録

use std::sync::Arc;

use chanoma_shared::time::Clock;

use crate::domain::{
    Connection, ConnectionId, ConnectionRepository, MessagePusher, PusherChannel, Timestamp,
};

use super::error::ConnectError;

/// 接続開始のユースケース
pub struct ConnectParticipantUseCase {
    /// 接続レジストリ（所属 Room の管理）
    connections: Arc<dyn ConnectionRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl ConnectParticipantUseCase {
    /// 新しい ConnectParticipantUseCase を作成
    pub fn new(
        connections: Arc<dyn ConnectionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            connections,
            message_pusher,
            clock,
        }
    }

    /// 接続を登録する
    ///
    /// 接続直後はどの Room にも所属しない。
    ///
    /// # Arguments
    ///
    /// * `connection_id` - WebSocket の upgrade 時に採番された ID
    /// * `sender` - クライアントへのメッセージ送信用チャンネル
    ///
    /// # Returns
    ///
    /// * `Ok(Timestamp)` - 接続時刻
    /// * `Err(ConnectError)` - 同じ ID がすでに登録されている
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        sender: PusherChannel,
    ) -> Result<Timestamp, ConnectError> {
        let connected_at = Timestamp::new(self.clock.now_jst_millis());

        // 1. 接続レジストリに登録（重複チェック込み）
        self.connections
            .register(Connection::new(connection_id, connected_at))
            .await
            .map_err(|_| ConnectError::DuplicateConnection(connection_id.to_string()))?;

        // 2. MessagePusher に送信チャンネルを登録
        self.message_pusher
            .register_client(connection_id, sender)
            .await;

        Ok(connected_at)
    }

    /// 接続中のクライアント数
    pub async fn count_connections(&self) -> usize {
        self.connections.count().await
    }
}

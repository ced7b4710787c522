//! UseCase: 接続の終了処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectParticipantUseCase::execute() メソッド
//! - 接続レジストリからの削除と、所属していた Room からの退出
//! - 作成したまま誰も参加していない Room の削除
//!
//! ### どのような状況を想定しているか
//! - 正常系：Room に所属している接続の切断（残りのメンバーへの通知）
//! - 正常系：最後のメンバーの切断（Room の削除）
//! - 正常系：作成しただけの Room の削除（他の接続が参加した Room は残す）
//! - エッジケース：Room に所属していない接続、未登録の接続

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionRepository, MessagePusher, RoomId};

use super::room_command::RoomCommandRunner;

/// 接続終了のユースケース
pub struct DisconnectParticipantUseCase {
    /// 接続レジストリ（所属 Room の管理）
    connections: Arc<dyn ConnectionRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    runner: RoomCommandRunner,
}

impl DisconnectParticipantUseCase {
    /// 新しい DisconnectParticipantUseCase を作成
    pub fn new(
        connections: Arc<dyn ConnectionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        runner: RoomCommandRunner,
    ) -> Self {
        Self {
            connections,
            message_pusher,
            runner,
        }
    }

    /// 切断を実行
    ///
    /// 何度呼ばれても安全（2 回目以降は何もしない）。
    /// この接続が作成し、まだ誰も参加していない Room も削除する。
    ///
    /// # Returns
    ///
    /// 退出した Room の ID（どこにも所属していなかった場合は None）
    pub async fn execute(&self, connection_id: &ConnectionId) -> Option<RoomId> {
        // 1. 送信チャンネルを外す（以降のブロードキャストはスキップされる）
        self.message_pusher.unregister_client(connection_id).await;

        // 2. 接続レジストリから削除
        let connection = self.connections.unregister(connection_id).await?;

        // 3. 所属していた Room から退出
        let left = match connection.room_id {
            Some(room_id) => match self.runner.leave(&room_id, connection_id).await {
                Ok(_) => Some(room_id),
                Err(e) => {
                    tracing::debug!(
                        "Connection '{}' could not leave room '{}': {}",
                        connection_id,
                        room_id,
                        e
                    );
                    None
                }
            },
            None => None,
        };

        // 4. 作成したまま誰も参加していない Room を片付ける
        for room_id in &connection.created_rooms {
            self.runner.discard_if_unjoined(room_id).await;
        }

        left
    }
}

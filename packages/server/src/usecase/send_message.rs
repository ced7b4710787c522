//! UseCase: チャットメッセージ送信
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - メッセージ履歴への追加と new-message のブロードキャスト（送信者を含む）
//!
//! ### どのような状況を想定しているか
//! - 正常系：複数メッセージの送信（順序と ID の一意性）
//! - 異常系：存在しない Room への送信

use std::sync::Arc;

use chanoma_shared::time::Clock;

use crate::domain::{MessageContent, RoomId, Timestamp, UserName};

use super::{error::RoomCommandError, room_command::RoomCommandRunner};

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    runner: RoomCommandRunner,
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(runner: RoomCommandRunner, clock: Arc<dyn Clock>) -> Self {
        Self { runner, clock }
    }

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `room_id` - 送信先の Room
    /// * `user` - 表示名（クライアントが申告したもの）
    /// * `content` - メッセージ本文
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - new-message を届けたメンバー数
    /// * `Err(RoomCommandError)` - Room が存在しない
    pub async fn execute(
        &self,
        room_id: &RoomId,
        user: UserName,
        content: MessageContent,
    ) -> Result<usize, RoomCommandError> {
        let timestamp = Timestamp::new(self.clock.now_jst_millis());
        self.runner
            .run(room_id, move |room| room.post_message(user, content, timestamp))
            .await
    }
}

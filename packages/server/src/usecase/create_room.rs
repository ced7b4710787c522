//! UseCase: Room 作成

use std::sync::Arc;

use chanoma_shared::time::Clock;

use crate::domain::{
    ConnectionId, ConnectionRepository, RoomId, RoomRepository, ServerEvent, Timestamp,
};

use super::room_command::RoomCommandRunner;

/// Room 作成のユースケース
pub struct CreateRoomUseCase {
    /// 接続レジストリ（作成した Room の記録）
    connections: Arc<dyn ConnectionRepository>,
    runner: RoomCommandRunner,
    clock: Arc<dyn Clock>,
}

impl CreateRoomUseCase {
    pub fn new(
        connections: Arc<dyn ConnectionRepository>,
        runner: RoomCommandRunner,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            connections,
            runner,
            clock,
        }
    }

    /// 空の Room を作成し、作成者に room-created を返す
    ///
    /// 作成者は自動では参加しない（続けて join-room を送る）。
    /// 誰も参加しないまま作成者が切断すると、その Room は削除される。
    pub async fn execute(&self, requested_by: &ConnectionId) -> RoomId {
        let created_at = Timestamp::new(self.clock.now_jst_millis());
        let room_id = self.runner.rooms().create_room(created_at).await;
        tracing::info!("Room '{}' created by '{}'", room_id, requested_by);

        // 作成者がすでに切断している場合は、片付ける接続がないのでここで削除する
        if let Err(e) = self
            .connections
            .record_created_room(requested_by, room_id.clone())
            .await
        {
            tracing::debug!("Creator of room '{}' is gone: {}", room_id, e);
            self.runner.discard_if_unjoined(&room_id).await;
        }

        self.runner
            .dispatcher()
            .reply(
                requested_by,
                &ServerEvent::RoomCreated {
                    room_id: room_id.clone(),
                },
            )
            .await;
        room_id
    }
}

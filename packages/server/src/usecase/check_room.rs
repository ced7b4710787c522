//! UseCase: Room の存在確認

use crate::domain::{ConnectionId, RoomId, ServerEvent};

use super::room_command::RoomCommandRunner;

/// Room の存在確認のユースケース
///
/// Web クライアントが画面を描画する前に Room の有無を問い合わせるために使う。
pub struct CheckRoomUseCase {
    runner: RoomCommandRunner,
}

impl CheckRoomUseCase {
    pub fn new(runner: RoomCommandRunner) -> Self {
        Self { runner }
    }

    /// 問い合わせた接続にだけ room-check-result を返す
    pub async fn execute(&self, requested_by: &ConnectionId, room_id: RoomId) -> bool {
        let exists = self.runner.exists(&room_id).await;
        self.runner
            .dispatcher()
            .reply(requested_by, &ServerEvent::RoomCheckResult { room_id, exists })
            .await;
        exists
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        domain::{RoomRepository, Timestamp, message_pusher::MockMessagePusher},
        infrastructure::repository::InMemoryRoomRepository,
    };

    #[tokio::test]
    async fn test_check_existing_and_missing_room() {
        // テスト項目: 存在する Room は true、存在しない Room は false で返信される
        // given (前提条件):
        let rooms = Arc::new(InMemoryRoomRepository::new());
        let existing = rooms.create_room(Timestamp::new(0)).await;
        let missing = RoomId::new("missing1".to_string()).unwrap();
        let asker = ConnectionId::generate();
        let mut pusher = MockMessagePusher::new();
        let expected_existing = existing.clone();
        pusher
            .expect_push_to()
            .withf(move |id, event| {
                *id == asker
                    && *event
                        == ServerEvent::RoomCheckResult {
                            room_id: expected_existing.clone(),
                            exists: true,
                        }
            })
            .times(1)
            .returning(|_, _| Ok(()));
        let expected_missing = missing.clone();
        pusher
            .expect_push_to()
            .withf(move |_, event| {
                *event
                    == ServerEvent::RoomCheckResult {
                        room_id: expected_missing.clone(),
                        exists: false,
                    }
            })
            .times(1)
            .returning(|_, _| Ok(()));
        let usecase = CheckRoomUseCase::new(RoomCommandRunner::new(rooms, Arc::new(pusher)));

        // when (操作):
        let found = usecase.execute(&asker, existing).await;
        let not_found = usecase.execute(&asker, missing).await;

        // then (期待する結果):
        assert!(found);
        assert!(!not_found);
    }
}

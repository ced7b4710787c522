//! UseCase: Room への参加
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - 参加者へのスナップショット送信と参加者数のブロードキャスト
//! - 1 接続 1 Room（別の Room に参加すると前の Room から退出する）
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加、再参加（冪等）
//! - 正常系：別の Room への移動
//! - 正常系：Room を変更する前に所属が記録される（中断されても切断時に退出できる）
//! - 異常系：存在しない Room への参加（前の Room には残る）

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionRepository, RoomId};

use super::{error::RoomCommandError, room_command::RoomCommandRunner};

/// Room 参加のユースケース
pub struct JoinRoomUseCase {
    /// 接続レジストリ（所属 Room の管理）
    connections: Arc<dyn ConnectionRepository>,
    runner: RoomCommandRunner,
}

impl JoinRoomUseCase {
    pub fn new(connections: Arc<dyn ConnectionRepository>, runner: RoomCommandRunner) -> Self {
        Self {
            connections,
            runner,
        }
    }

    /// Room に参加する
    ///
    /// 参加者には room-data、全メンバーには participant-count が送られる。
    ///
    /// # Returns
    ///
    /// * `Ok(())` - 参加した（すでにメンバーだった場合も含む）
    /// * `Err(RoomCommandError::RoomNotFound)` - Room が存在しない
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        room_id: &RoomId,
    ) -> Result<(), RoomCommandError> {
        if self.connections.get(&connection_id).await.is_none() {
            return Err(RoomCommandError::ConnectionNotFound(
                connection_id.to_string(),
            ));
        }

        // 1. 参加先が存在しない場合は、今の Room に残したままエラーを返す
        if !self.runner.exists(room_id).await {
            return Err(RoomCommandError::RoomNotFound(room_id.clone()));
        }

        // 2. Room を変更する前に所属を記録する
        //    途中で処理が中断されても、切断時にこの Room から退出できる
        let previous = self
            .connections
            .set_room(&connection_id, Some(room_id.clone()))
            .await?;

        // 3. 別の Room に所属していれば先に退出
        if let Some(previous) = previous.filter(|previous| previous != room_id) {
            if let Err(e) = self.runner.leave(&previous, &connection_id).await {
                tracing::debug!("Previous room '{}' already gone: {}", previous, e);
            }
            tracing::info!(
                "Connection '{}' moved from room '{}' to '{}'",
                connection_id,
                previous,
                room_id
            );
        }

        // 4. 参加（存在確認の後に閉じられた場合は RoomNotFound）
        if let Err(e) = self
            .runner
            .run(room_id, |room| room.join(connection_id))
            .await
        {
            self.connections.set_room(&connection_id, None).await?;
            return Err(e);
        }

        tracing::info!("Connection '{}' joined room '{}'", connection_id, room_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            Connection, MessagePusher, RoomRepository, ServerEvent, Timestamp,
            message_pusher::MockMessagePusher, repository::MockConnectionRepository,
        },
        infrastructure::{
            message_pusher::WebSocketMessagePusher,
            repository::{InMemoryConnectionRepository, InMemoryRoomRepository},
        },
    };
    use serde_json::{Value, json};
    use tokio::sync::mpsc;

    struct Fixture {
        rooms: Arc<InMemoryRoomRepository>,
        connections: Arc<InMemoryConnectionRepository>,
        pusher: Arc<WebSocketMessagePusher>,
        usecase: JoinRoomUseCase,
    }

    fn fixture() -> Fixture {
        let rooms = Arc::new(InMemoryRoomRepository::new());
        let connections = Arc::new(InMemoryConnectionRepository::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = JoinRoomUseCase::new(
            connections.clone(),
            RoomCommandRunner::new(rooms.clone(), pusher.clone()),
        );
        Fixture {
            rooms,
            connections,
            pusher,
            usecase,
        }
    }

    async fn connect(f: &Fixture) -> (ConnectionId, mpsc::UnboundedReceiver<String>) {
        let id = ConnectionId::generate();
        let (tx, rx) = mpsc::unbounded_channel();
        f.connections
            .register(Connection::new(id, Timestamp::new(0)))
            .await
            .unwrap();
        f.pusher.register_client(id, tx).await;
        (id, rx)
    }

    fn next(rx: &mut mpsc::UnboundedReceiver<String>) -> Value {
        serde_json::from_str(&rx.try_recv().unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_join_sends_snapshot_and_count() {
        // テスト項目: 参加者には room-data が、全員には participant-count が届く
        // given (前提条件):
        let f = fixture();
        let room_id = f.rooms.create_room(Timestamp::new(0)).await;
        let (alice, mut alice_rx) = connect(&f).await;
        let (bob, mut bob_rx) = connect(&f).await;
        f.usecase.execute(alice, &room_id).await.unwrap();
        next(&mut alice_rx); // room-data
        next(&mut alice_rx); // participant-count 1

        // when (操作):
        f.usecase.execute(bob, &room_id).await.unwrap();

        // then (期待する結果):
        let room_data = next(&mut bob_rx);
        assert_eq!(room_data["type"], "room-data");
        assert_eq!(room_data["roomId"], room_id.as_str());
        assert_eq!(room_data["videoUrl"], Value::Null);
        assert_eq!(room_data["currentVideoIndex"], -1);
        assert_eq!(next(&mut bob_rx), json!({"type": "participant-count", "count": 2}));
        assert_eq!(next(&mut alice_rx), json!({"type": "participant-count", "count": 2}));
        assert_eq!(
            f.connections.get(&bob).await.unwrap().room_id,
            Some(room_id)
        );
    }

    #[tokio::test]
    async fn test_rejoin_is_idempotent() {
        // テスト項目: 同じ Room への再参加はメンバー数を増やさず、スナップショットを再送する
        // given (前提条件):
        let f = fixture();
        let room_id = f.rooms.create_room(Timestamp::new(0)).await;
        let (alice, mut alice_rx) = connect(&f).await;
        f.usecase.execute(alice, &room_id).await.unwrap();
        next(&mut alice_rx);
        next(&mut alice_rx);

        // when (操作):
        f.usecase.execute(alice, &room_id).await.unwrap();

        // then (期待する結果):
        assert_eq!(next(&mut alice_rx)["type"], "room-data");
        assert_eq!(next(&mut alice_rx), json!({"type": "participant-count", "count": 1}));
    }

    #[tokio::test]
    async fn test_join_other_room_leaves_previous() {
        // テスト項目: 別の Room に参加すると前の Room から退出し、残りのメンバーに通知される
        // given (前提条件):
        let f = fixture();
        let first = f.rooms.create_room(Timestamp::new(0)).await;
        let second = f.rooms.create_room(Timestamp::new(1)).await;
        let (alice, _alice_rx) = connect(&f).await;
        let (bob, mut bob_rx) = connect(&f).await;
        f.usecase.execute(alice, &first).await.unwrap();
        f.usecase.execute(bob, &first).await.unwrap();
        while bob_rx.try_recv().is_ok() {}

        // when (操作):
        f.usecase.execute(alice, &second).await.unwrap();

        // then (期待する結果):
        assert_eq!(next(&mut bob_rx), json!({"type": "participant-count", "count": 1}));
        let first_room = f.rooms.find_room(&first).await.unwrap();
        assert!(!first_room.lock().await.is_member(&alice));
        let second_room = f.rooms.find_room(&second).await.unwrap();
        assert!(second_room.lock().await.is_member(&alice));
    }

    #[tokio::test]
    async fn test_join_missing_room_keeps_current_room() {
        // テスト項目: 存在しない Room への参加は失敗し、今の Room には残る
        // given (前提条件):
        let f = fixture();
        let room_id = f.rooms.create_room(Timestamp::new(0)).await;
        let (alice, _alice_rx) = connect(&f).await;
        f.usecase.execute(alice, &room_id).await.unwrap();
        let missing = RoomId::new("missing1".to_string()).unwrap();

        // when (操作):
        let result = f.usecase.execute(alice, &missing).await;

        // then (期待する結果):
        assert_eq!(result, Err(RoomCommandError::RoomNotFound(missing)));
        assert_eq!(
            f.connections.get(&alice).await.unwrap().room_id,
            Some(room_id)
        );
    }

    #[tokio::test]
    async fn test_join_room_emptied_by_last_leave() {
        // テスト項目: 最後のメンバーが移動して空になった Room にはもう参加できない
        // given (前提条件):
        let f = fixture();
        let first = f.rooms.create_room(Timestamp::new(0)).await;
        let second = f.rooms.create_room(Timestamp::new(1)).await;
        let (alice, _alice_rx) = connect(&f).await;
        f.usecase.execute(alice, &first).await.unwrap();
        f.usecase.execute(alice, &second).await.unwrap();

        // when (操作):
        let result = f.usecase.execute(alice, &first).await;

        // then (期待する結果):
        assert_eq!(result, Err(RoomCommandError::RoomNotFound(first)));
    }

    #[tokio::test]
    async fn test_membership_is_recorded_before_room_changes() {
        // テスト項目: Room に参加者を追加する前に、接続レジストリへ所属が記録される
        // given (前提条件):
        let rooms = Arc::new(InMemoryRoomRepository::new());
        let room_id = rooms.create_room(Timestamp::new(0)).await;
        let alice = ConnectionId::generate();
        let mut seq = mockall::Sequence::new();

        let mut connections = MockConnectionRepository::new();
        connections
            .expect_get()
            .returning(move |_| Some(Connection::new(alice, Timestamp::new(0))));
        let recorded = room_id.clone();
        connections
            .expect_set_room()
            .withf(move |id, room| *id == alice && room.as_ref() == Some(&recorded))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(None));

        let mut pusher = MockMessagePusher::new();
        pusher
            .expect_push_to()
            .withf(|_, event| matches!(event, ServerEvent::RoomData(_)))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        pusher
            .expect_broadcast()
            .returning(|targets, _| targets.len());

        let usecase = JoinRoomUseCase::new(
            Arc::new(connections),
            RoomCommandRunner::new(rooms.clone(), Arc::new(pusher)),
        );

        // when (操作):
        usecase.execute(alice, &room_id).await.unwrap();

        // then (期待する結果): 呼び出し順は Sequence で検証される
        let handle = rooms.find_room(&room_id).await.unwrap();
        assert!(handle.lock().await.is_member(&alice));
    }
}

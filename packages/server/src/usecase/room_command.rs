//! Room に対するコマンド実行の共通処理
//!
//! 1. Store から Room を探す
//! 2. Room のロックを取り、操作を適用してメンバーのスナップショットを取る
//! 3. ロックを解放してからイベントを配信する

use std::sync::Arc;

use crate::domain::{
    ConnectionId, MessagePusher, Outbound, Room, RoomError, RoomId, RoomRepository,
};

use super::{dispatcher::EventDispatcher, error::RoomCommandError};

/// Room コマンドの実行役
#[derive(Clone)]
pub struct RoomCommandRunner {
    /// Repository（データアクセス層の抽象化）
    rooms: Arc<dyn RoomRepository>,
    dispatcher: EventDispatcher,
}

impl RoomCommandRunner {
    pub fn new(rooms: Arc<dyn RoomRepository>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            rooms,
            dispatcher: EventDispatcher::new(message_pusher),
        }
    }

    pub fn rooms(&self) -> &Arc<dyn RoomRepository> {
        &self.rooms
    }

    pub fn dispatcher(&self) -> &EventDispatcher {
        &self.dispatcher
    }

    /// Room に操作を適用し、生成されたイベントを配信する
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - 配信できた件数
    /// * `Err(RoomCommandError::RoomNotFound)` - Room が存在しない、または閉じられている
    pub async fn run<F>(&self, room_id: &RoomId, operation: F) -> Result<usize, RoomCommandError>
    where
        F: FnOnce(&mut Room) -> Result<Vec<Outbound>, RoomError> + Send,
    {
        let handle = self.rooms.find_room(room_id).await?;
        let (members, outbound) = {
            let mut room = handle.lock().await;
            let outbound = operation(&mut *room)?;
            (room.members_snapshot(), outbound)
        };
        Ok(self.dispatcher.dispatch(&members, outbound).await)
    }

    /// Room が存在し、まだ閉じられていないか
    pub async fn exists(&self, room_id: &RoomId) -> bool {
        match self.rooms.find_room(room_id).await {
            Ok(handle) => !handle.lock().await.is_closed(),
            Err(_) => false,
        }
    }

    /// 接続を Room から外す
    ///
    /// 最後のメンバーが抜けた Room は閉じられ、Store から削除される。
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - メンバーだった接続を外した
    /// * `Ok(false)` - もともとメンバーではなかった
    pub async fn leave(
        &self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
    ) -> Result<bool, RoomCommandError> {
        let handle = self.rooms.find_room(room_id).await?;
        let (members, departure) = {
            let mut room = handle.lock().await;
            let departure = room.leave(connection_id)?;
            (room.members_snapshot(), departure)
        };

        if departure.emptied {
            self.rooms.delete_room(room_id).await;
            tracing::info!("Room '{}' is empty and has been closed", room_id);
        }
        self.dispatcher.dispatch(&members, departure.events).await;
        Ok(departure.removed)
    }

    /// 誰も参加していない Room を閉じて Store から削除する
    ///
    /// # Returns
    ///
    /// Room を削除した場合は `true`（メンバーがいる、またはすでにない場合は `false`）
    pub async fn discard_if_unjoined(&self, room_id: &RoomId) -> bool {
        let Ok(handle) = self.rooms.find_room(room_id).await else {
            return false;
        };
        if !handle.lock().await.close_if_empty() {
            return false;
        }
        self.rooms.delete_room(room_id).await;
        tracing::info!("Room '{}' was never joined and has been closed", room_id);
        true
    }
}

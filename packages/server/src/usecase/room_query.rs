//! UseCase: HTTP API 向けの参照系
//!
//! いずれも状態を変更しない。

use std::sync::Arc;

use crate::domain::{ConnectionRepository, Room, RoomId, RoomRepository};

use super::error::RoomCommandError;

/// Room 一覧取得のユースケース
pub struct GetRoomsUseCase {
    rooms: Arc<dyn RoomRepository>,
}

impl GetRoomsUseCase {
    pub fn new(rooms: Arc<dyn RoomRepository>) -> Self {
        Self { rooms }
    }

    /// 開いている Room の一覧（作成時刻順）
    pub async fn execute(&self) -> Vec<Room> {
        self.rooms.list_rooms().await
    }
}

/// Room 詳細取得のユースケース
pub struct GetRoomDetailUseCase {
    rooms: Arc<dyn RoomRepository>,
}

impl GetRoomDetailUseCase {
    pub fn new(rooms: Arc<dyn RoomRepository>) -> Self {
        Self { rooms }
    }

    pub async fn execute(&self, room_id: &RoomId) -> Result<Room, RoomCommandError> {
        let handle = self.rooms.find_room(room_id).await?;
        let room = handle.lock().await;
        if room.is_closed() {
            return Err(RoomCommandError::RoomNotFound(room_id.clone()));
        }
        Ok(room.clone())
    }
}

/// サーバーの稼働状況
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerStatus {
    pub rooms: usize,
    pub connections: usize,
}

/// 稼働状況取得のユースケース（ヘルスチェック用）
pub struct GetServerStatusUseCase {
    rooms: Arc<dyn RoomRepository>,
    connections: Arc<dyn ConnectionRepository>,
}

impl GetServerStatusUseCase {
    pub fn new(
        rooms: Arc<dyn RoomRepository>,
        connections: Arc<dyn ConnectionRepository>,
    ) -> Self {
        Self { rooms, connections }
    }

    pub async fn execute(&self) -> ServerStatus {
        ServerStatus {
            rooms: self.rooms.count_rooms().await,
            connections: self.connections.count().await,
        }
    }
}

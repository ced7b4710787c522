//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。
//!
//! ## ロックの粒度
//!
//! - 外側の `RwLock` は Room の登録・検索・削除のみに使う
//! - Room の状態変更は Room ごとの `Mutex`（`SharedRoom`）で直列化する
//!
//! 外側のロックを保持したまま Room の Mutex を待つことはない。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use crate::domain::{
    RepositoryError, Room, RoomId, RoomIdFactory, RoomRepository, SharedRoom, Timestamp,
};

/// インメモリ Room Repository 実装
pub struct InMemoryRoomRepository {
    rooms: RwLock<HashMap<RoomId, SharedRoom>>,
    generate_id: fn() -> RoomId,
}

impl InMemoryRoomRepository {
    /// 新しい InMemoryRoomRepository を作成
    pub fn new() -> Self {
        Self::with_id_generator(RoomIdFactory::generate)
    }

    /// ID 生成関数を差し替えて作成（衝突時の再生成のテスト用）
    pub fn with_id_generator(generate_id: fn() -> RoomId) -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            generate_id,
        }
    }
}

impl Default for InMemoryRoomRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn create_room(&self, created_at: Timestamp) -> RoomId {
        let mut rooms = self.rooms.write().await;
        let room_id = loop {
            let candidate = (self.generate_id)();
            if !rooms.contains_key(&candidate) {
                break candidate;
            }
            tracing::debug!("RoomId '{}' collided, regenerating", candidate);
        };
        let room = Room::new(room_id.clone(), created_at);
        rooms.insert(room_id.clone(), Arc::new(Mutex::new(room)));
        room_id
    }

    async fn find_room(&self, room_id: &RoomId) -> Result<SharedRoom, RepositoryError> {
        let rooms = self.rooms.read().await;
        rooms
            .get(room_id)
            .cloned()
            .ok_or_else(|| RepositoryError::RoomNotFound(room_id.clone()))
    }

    async fn delete_room(&self, room_id: &RoomId) {
        let mut rooms = self.rooms.write().await;
        if rooms.remove(room_id).is_some() {
            tracing::debug!("Room '{}' removed from store", room_id);
        }
    }

    async fn list_rooms(&self) -> Vec<Room> {
        let handles: Vec<SharedRoom> = {
            let rooms = self.rooms.read().await;
            rooms.values().cloned().collect()
        };

        let mut snapshots = Vec::with_capacity(handles.len());
        for handle in handles {
            let room = handle.lock().await;
            if !room.is_closed() {
                snapshots.push(room.clone());
            }
        }
        snapshots.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.as_str().cmp(b.id.as_str()))
        });
        snapshots
    }

    async fn count_rooms(&self) -> usize {
        self.rooms.read().await.len()
    }
}

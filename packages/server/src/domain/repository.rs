//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{Connection, ConnectionId, RepositoryError, Room, RoomId, Timestamp};

/// Room ごとの排他制御付きハンドル
///
/// 同じ Room への操作はこの Mutex で直列化され、異なる Room は並行に処理される。
pub type SharedRoom = Arc<Mutex<Room>>;

/// Room Repository trait
///
/// UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない。
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// 新しい Room を作成し、稼働中の Room と重複しない ID を返す
    ///
    /// ID の重複チェックと登録はアトミックに行われる。
    async fn create_room(&self, created_at: Timestamp) -> RoomId;

    /// Room を取得
    async fn find_room(&self, room_id: &RoomId) -> Result<SharedRoom, RepositoryError>;

    /// Room を削除（冪等）
    async fn delete_room(&self, room_id: &RoomId);

    /// 全 Room のスナップショットを取得（作成時刻順）
    async fn list_rooms(&self) -> Vec<Room>;

    /// Room 数を取得
    async fn count_rooms(&self) -> usize;
}

/// Connection Repository trait
///
/// 接続ごとの所属 Room を管理する。接続は同時に一つの Room にのみ所属する。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConnectionRepository: Send + Sync {
    /// 接続を登録
    async fn register(&self, connection: Connection) -> Result<(), RepositoryError>;

    /// 接続を削除し、削除された接続を返す
    async fn unregister(&self, connection_id: &ConnectionId) -> Option<Connection>;

    /// 接続を取得
    async fn get(&self, connection_id: &ConnectionId) -> Option<Connection>;

    /// 所属 Room を更新し、以前の所属 Room を返す
    async fn set_room(
        &self,
        connection_id: &ConnectionId,
        room_id: Option<RoomId>,
    ) -> Result<Option<RoomId>, RepositoryError>;

    /// 接続が作成した Room を記録する
    async fn record_created_room(
        &self,
        connection_id: &ConnectionId,
        room_id: RoomId,
    ) -> Result<(), RepositoryError>;

    /// 接続数を取得
    async fn count(&self) -> usize;
}

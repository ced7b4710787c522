//! UseCase: プレイリスト操作
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - AddToPlaylistUseCase, NextVideoUseCase, VideoEndedUseCase
//! - 配信されるイベントの内容と順序（WebSocket に流れる JSON で確認）
//!
//! ### どのような状況を想定しているか
//! - 正常系：再生中の動画がない状態での追加、キューへの追加
//! - 正常系：動画終了でキューの先頭が再生される（video-update → playlist-update）
//! - エッジケース：次の動画がない状態での next-video（何も配信されない）

use crate::domain::{RoomId, VideoUrl};

use super::{error::RoomCommandError, room_command::RoomCommandRunner};

/// プレイリストへの追加
pub struct AddToPlaylistUseCase {
    runner: RoomCommandRunner,
}

impl AddToPlaylistUseCase {
    pub fn new(runner: RoomCommandRunner) -> Self {
        Self { runner }
    }

    /// 再生中の動画がなければそのまま再生し、あればキューの末尾に追加する
    pub async fn execute(
        &self,
        room_id: &RoomId,
        video_url: VideoUrl,
    ) -> Result<usize, RoomCommandError> {
        self.runner
            .run(room_id, move |room| room.add_to_playlist(video_url))
            .await
    }
}

/// 次の動画へ進める
pub struct NextVideoUseCase {
    runner: RoomCommandRunner,
}

impl NextVideoUseCase {
    pub fn new(runner: RoomCommandRunner) -> Self {
        Self { runner }
    }

    pub async fn execute(&self, room_id: &RoomId) -> Result<usize, RoomCommandError> {
        self.runner
            .run(room_id, |room| room.advance_to_next())
            .await
    }
}

/// 動画の再生終了
pub struct VideoEndedUseCase {
    runner: RoomCommandRunner,
}

impl VideoEndedUseCase {
    pub fn new(runner: RoomCommandRunner) -> Self {
        Self { runner }
    }

    pub async fn execute(&self, room_id: &RoomId) -> Result<usize, RoomCommandError> {
        self.runner.run(room_id, |room| room.on_video_ended()).await
    }
}

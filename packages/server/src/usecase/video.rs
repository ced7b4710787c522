//! UseCase: 動画の切り替えと再生状態の同期

use crate::domain::{ConnectionId, RoomId, VideoEvent, VideoUrl};

use super::{error::RoomCommandError, room_command::RoomCommandRunner};

/// 現在の動画を直接差し替えるユースケース
pub struct SetVideoUseCase {
    runner: RoomCommandRunner,
}

impl SetVideoUseCase {
    pub fn new(runner: RoomCommandRunner) -> Self {
        Self { runner }
    }

    /// 現在の動画を差し替え、video-update（index -1）を全員に送る
    pub async fn execute(
        &self,
        room_id: &RoomId,
        video_url: VideoUrl,
    ) -> Result<usize, RoomCommandError> {
        self.runner
            .run(room_id, move |room| room.set_video(video_url))
            .await
    }
}

/// 再生・一時停止・シークを中継するユースケース
///
/// 状態は保存せず、送信者以外のメンバーにそのまま転送する。
pub struct SyncPlaybackUseCase {
    runner: RoomCommandRunner,
}

impl SyncPlaybackUseCase {
    pub fn new(runner: RoomCommandRunner) -> Self {
        Self { runner }
    }

    pub async fn execute(
        &self,
        sender: ConnectionId,
        room_id: &RoomId,
        event: VideoEvent,
    ) -> Result<usize, RoomCommandError> {
        self.runner
            .run(room_id, move |room| room.sync_playback(sender, event))
            .await
    }
}

//! WebSocket コマンドのルーティング
//!
//! 受信したテキストフレームを decode → 検証 → UseCase の呼び出し の順に処理する。
//! 検証に失敗したコマンドは状態を一切変更せず、送信元にだけ error を返す。

use std::sync::Arc;

use chanoma_shared::time::Clock;
use thiserror::Error;

use crate::{
    domain::{
        ConnectionId, ConnectionRepository, MessageContent, RoomId, ServerEvent, UserName,
        ValueObjectError, VideoEvent, VideoUrl,
    },
    infrastructure::dto::websocket::{ClientCommand, CommandDecodeError, decode_command},
    usecase::{
        AddToPlaylistUseCase, CheckRoomUseCase, CreateRoomUseCase, EventDispatcher,
        JoinRoomUseCase, NextVideoUseCase, RoomCommandError, RoomCommandRunner,
        SendMessageUseCase, SetVideoUseCase, SyncPlaybackUseCase, VideoEndedUseCase,
    },
};

/// コマンド処理の失敗（送信元への error 返信になる）
#[derive(Debug, Error)]
pub enum CommandFailure {
    #[error("Invalid command: {0}")]
    Invalid(String),

    #[error(transparent)]
    Room(#[from] RoomCommandError),
}

impl From<CommandDecodeError> for CommandFailure {
    fn from(err: CommandDecodeError) -> Self {
        Self::Invalid(err.to_string())
    }
}

impl From<ValueObjectError> for CommandFailure {
    fn from(err: ValueObjectError) -> Self {
        Self::Invalid(err.to_string())
    }
}

/// コマンドのルーター
pub struct CommandRouter {
    create_room: CreateRoomUseCase,
    join_room: JoinRoomUseCase,
    send_message: SendMessageUseCase,
    set_video: SetVideoUseCase,
    sync_playback: SyncPlaybackUseCase,
    add_to_playlist: AddToPlaylistUseCase,
    next_video: NextVideoUseCase,
    video_ended: VideoEndedUseCase,
    check_room: CheckRoomUseCase,
    dispatcher: EventDispatcher,
}

impl CommandRouter {
    pub fn new(
        runner: RoomCommandRunner,
        connections: Arc<dyn ConnectionRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            create_room: CreateRoomUseCase::new(
                connections.clone(),
                runner.clone(),
                clock.clone(),
            ),
            join_room: JoinRoomUseCase::new(connections, runner.clone()),
            send_message: SendMessageUseCase::new(runner.clone(), clock),
            set_video: SetVideoUseCase::new(runner.clone()),
            sync_playback: SyncPlaybackUseCase::new(runner.clone()),
            add_to_playlist: AddToPlaylistUseCase::new(runner.clone()),
            next_video: NextVideoUseCase::new(runner.clone()),
            video_ended: VideoEndedUseCase::new(runner.clone()),
            check_room: CheckRoomUseCase::new(runner.clone()),
            dispatcher: runner.dispatcher().clone(),
        }
    }

    /// 1 フレーム分のテキストを処理する
    pub async fn handle(&self, connection_id: ConnectionId, text: &str) {
        if let Err(failure) = self.try_handle(connection_id, text).await {
            tracing::warn!("Command from '{}' failed: {}", connection_id, failure);
            self.dispatcher
                .reply(&connection_id, &ServerEvent::error(failure.to_string()))
                .await;
        }
    }

    async fn try_handle(
        &self,
        connection_id: ConnectionId,
        text: &str,
    ) -> Result<(), CommandFailure> {
        match decode_command(text)? {
            ClientCommand::CreateRoom(_) => {
                self.create_room.execute(&connection_id).await;
            }
            ClientCommand::JoinRoom { room_id } => {
                let room_id = RoomId::try_from(room_id)?;
                self.join_room.execute(connection_id, &room_id).await?;
            }
            ClientCommand::SendMessage {
                room_id,
                user,
                content,
            } => {
                let room_id = RoomId::try_from(room_id)?;
                let user = UserName::try_from(user)?;
                let content = MessageContent::try_from(content)?;
                self.send_message.execute(&room_id, user, content).await?;
            }
            ClientCommand::SetVideo { room_id, video_url } => {
                let room_id = RoomId::try_from(room_id)?;
                let video_url = VideoUrl::try_from(video_url)?;
                self.set_video.execute(&room_id, video_url).await?;
            }
            ClientCommand::VideoSync { room_id, event } => {
                let room_id = RoomId::try_from(room_id)?;
                let event = VideoEvent::try_from(event)?;
                self.sync_playback
                    .execute(connection_id, &room_id, event)
                    .await?;
            }
            ClientCommand::AddToPlaylist { room_id, video_url } => {
                let room_id = RoomId::try_from(room_id)?;
                let video_url = VideoUrl::try_from(video_url)?;
                self.add_to_playlist.execute(&room_id, video_url).await?;
            }
            ClientCommand::NextVideo { room_id } => {
                let room_id = RoomId::try_from(room_id)?;
                self.next_video.execute(&room_id).await?;
            }
            ClientCommand::VideoEnded { room_id } => {
                let room_id = RoomId::try_from(room_id)?;
                self.video_ended.execute(&room_id).await?;
            }
            ClientCommand::CheckRoom { room_id } => {
                let room_id = RoomId::try_from(room_id)?;
                self.check_room.execute(&connection_id, room_id).await;
            }
            ClientCommand::Unknown => {
                tracing::warn!("Ignoring unknown command from '{}': {}", connection_id, text);
            }
        }
        Ok(())
    }
}

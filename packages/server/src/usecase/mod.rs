//! UseCase layer.
//!
//! Each use case wires domain operations to the repository and
//! message pusher ports. Room commands share [`RoomCommandRunner`], which
//! applies an operation under the room lock and dispatches the resulting
//! events after the lock is released.

mod check_room;
mod connect_participant;
mod create_room;
mod disconnect_participant;
mod dispatcher;
mod error;
mod join_room;
mod playlist;
mod room_command;
mod room_query;
mod send_message;
mod video;

pub use check_room::CheckRoomUseCase;
pub use connect_participant::ConnectParticipantUseCase;
pub use create_room::CreateRoomUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use dispatcher::EventDispatcher;
pub use error::{ConnectError, RoomCommandError};
pub use join_room::JoinRoomUseCase;
pub use playlist::{AddToPlaylistUseCase, NextVideoUseCase, VideoEndedUseCase};
pub use room_command::RoomCommandRunner;
pub use room_query::{GetRoomDetailUseCase, GetRoomsUseCase, GetServerStatusUseCase, ServerStatus};
pub use send_message::SendMessageUseCase;
pub use video::{SetVideoUseCase, SyncPlaybackUseCase};

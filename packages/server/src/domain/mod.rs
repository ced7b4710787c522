//! Domain layer for the room coordination engine.
//!
//! This module contains business logic that is independent of
//! data transfer objects (DTOs) and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod event;
pub mod factory;
pub mod message_pusher;
pub mod repository;
pub mod value_object;

pub use entity::{ChatMessage, Connection, Departure, NO_PLAYLIST_INDEX, Room, RoomSnapshot};
pub use error::{MessagePushError, RepositoryError, RoomError, ValueObjectError};
pub use event::{Audience, Outbound, ServerEvent, VideoEvent};
pub use factory::RoomIdFactory;
pub use message_pusher::{MessagePusher, PusherChannel};
pub use repository::{ConnectionRepository, RoomRepository, SharedRoom};
pub use value_object::{
    ConnectionId, MessageContent, MessageId, PlaybackPosition, RoomId, Timestamp, UserName,
    VideoUrl,
};

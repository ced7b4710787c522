//! Events produced by the domain and pushed to clients.
//!
//! Room operations never talk to the transport. They return [`Outbound`]
//! values (an event plus who should receive it) and the use case layer
//! hands them to the broadcast dispatcher once the room lock is released.

use super::{
    entity::{ChatMessage, RoomSnapshot},
    value_object::{ConnectionId, PlaybackPosition, RoomId, VideoUrl},
};

/// Playback transport signal relayed between members.
///
/// Carries only the position; the video identity lives in the room.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VideoEvent {
    Play(PlaybackPosition),
    Pause(PlaybackPosition),
    Seek(PlaybackPosition),
}

impl VideoEvent {
    pub fn position(&self) -> PlaybackPosition {
        match self {
            Self::Play(p) | Self::Pause(p) | Self::Seek(p) => *p,
        }
    }
}

/// Every event the server can push to a client.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    RoomCreated {
        room_id: RoomId,
    },
    RoomData(RoomSnapshot),
    ParticipantCount {
        count: usize,
    },
    NewMessage(ChatMessage),
    VideoUpdate {
        video_url: Option<VideoUrl>,
        current_video_index: i64,
    },
    PlaylistUpdate {
        playlist: Vec<VideoUrl>,
        current_video_index: i64,
    },
    VideoSync(VideoEvent),
    RoomCheckResult {
        room_id: RoomId,
        exists: bool,
    },
    Error {
        message: String,
    },
    ServerShutdown {
        message: String,
    },
}

impl ServerEvent {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}

/// Recipients of an event, resolved against a member snapshot at dispatch time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    /// Every member of the room
    Members,
    /// Every member except the given connection (usually the sender)
    MembersExcept(ConnectionId),
    /// A single connection, whether or not it is a member
    Only(ConnectionId),
}

/// An event paired with its audience
#[derive(Debug, Clone, PartialEq)]
pub struct Outbound {
    pub audience: Audience,
    pub event: ServerEvent,
}

impl Outbound {
    pub fn to_members(event: ServerEvent) -> Self {
        Self {
            audience: Audience::Members,
            event,
        }
    }

    pub fn to_members_except(excluded: ConnectionId, event: ServerEvent) -> Self {
        Self {
            audience: Audience::MembersExcept(excluded),
            event,
        }
    }

    pub fn to_connection(connection_id: ConnectionId, event: ServerEvent) -> Self {
        Self {
            audience: Audience::Only(connection_id),
            event,
        }
    }
}

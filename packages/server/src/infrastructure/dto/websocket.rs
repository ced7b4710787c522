//! WebSocket message DTOs.
//!
//! Every frame is a JSON object with a `type` discriminator. Inbound frames
//! decode into [`ClientCommand`], outbound frames are built from
//! [`ServerMessage`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Commands sent by clients
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ClientCommand {
    CreateRoom(CreateRoomRequest),
    JoinRoom {
        room_id: String,
    },
    SendMessage {
        room_id: String,
        user: String,
        content: String,
    },
    SetVideo {
        room_id: String,
        video_url: String,
    },
    VideoSync {
        room_id: String,
        event: VideoEventDto,
    },
    AddToPlaylist {
        room_id: String,
        video_url: String,
    },
    NextVideo {
        room_id: String,
    },
    VideoEnded {
        room_id: String,
    },
    CheckRoom {
        room_id: String,
    },
    /// Any `type` this server does not know about
    #[serde(other)]
    Unknown,
}

/// Optional details sent along with `create-room`.
///
/// Accepted for compatibility with the web client; they do not affect the room.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateRoomRequest {
    pub room_name: Option<String>,
    pub host_name: Option<String>,
    pub video_url: Option<String>,
}

/// Playback signal as it appears on the wire
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum VideoEventDto {
    Play { timestamp: f64 },
    Pause { timestamp: f64 },
    Seek { timestamp: f64 },
}

/// Chat message as it appears on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageDto {
    pub id: String,
    pub user: String,
    pub content: String,
    /// RFC 3339 (JST)
    pub time: String,
}

/// Events sent to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    RoomCreated {
        room_id: String,
    },
    RoomData {
        room_id: String,
        messages: Vec<MessageDto>,
        video_url: Option<String>,
        /// RFC 3339 (JST)
        created_at: String,
        playlist: Vec<String>,
        current_video_index: i64,
    },
    ParticipantCount {
        count: usize,
    },
    NewMessage {
        message: MessageDto,
    },
    VideoUpdate {
        video_url: Option<String>,
        current_video_index: i64,
    },
    PlaylistUpdate {
        playlist: Vec<String>,
        current_video_index: i64,
    },
    VideoSync {
        event: VideoEventDto,
    },
    RoomCheckResult {
        room_id: String,
        exists: bool,
    },
    Error {
        message: String,
    },
    ServerShutdown {
        message: String,
    },
}

/// Frame could not be decoded into a command
#[derive(Debug, Error)]
#[error("{0}")]
pub struct CommandDecodeError(#[from] serde_json::Error);

/// Decode one inbound text frame.
pub fn decode_command(text: &str) -> Result<ClientCommand, CommandDecodeError> {
    Ok(serde_json::from_str(text)?)
}

/// Encode one outbound frame.
pub fn encode_message(message: &ServerMessage) -> Result<String, serde_json::Error> {
    serde_json::to_string(message)
}

//! Conversion logic between DTOs and domain entities.

use chanoma_shared::time::timestamp_to_jst_rfc3339;

use crate::domain::{
    ChatMessage, PlaybackPosition, Room, RoomSnapshot, ServerEvent, ValueObjectError, VideoEvent,
    VideoUrl,
};
use crate::infrastructure::dto::{
    http::{RoomDetailDto, RoomSummaryDto},
    websocket::{MessageDto, ServerMessage, VideoEventDto},
};

// ========================================
// DTO → Domain
// ========================================

impl TryFrom<VideoEventDto> for VideoEvent {
    type Error = ValueObjectError;

    fn try_from(dto: VideoEventDto) -> Result<Self, Self::Error> {
        Ok(match dto {
            VideoEventDto::Play { timestamp } => Self::Play(PlaybackPosition::new(timestamp)?),
            VideoEventDto::Pause { timestamp } => Self::Pause(PlaybackPosition::new(timestamp)?),
            VideoEventDto::Seek { timestamp } => Self::Seek(PlaybackPosition::new(timestamp)?),
        })
    }
}

// ========================================
// Domain → DTO
// ========================================

impl From<VideoEvent> for VideoEventDto {
    fn from(event: VideoEvent) -> Self {
        let timestamp = event.position().seconds();
        match event {
            VideoEvent::Play(_) => Self::Play { timestamp },
            VideoEvent::Pause(_) => Self::Pause { timestamp },
            VideoEvent::Seek(_) => Self::Seek { timestamp },
        }
    }
}

impl From<&ChatMessage> for MessageDto {
    fn from(message: &ChatMessage) -> Self {
        Self {
            id: message.id.to_string(),
            user: message.user.as_str().to_string(),
            content: message.content.as_str().to_string(),
            time: timestamp_to_jst_rfc3339(message.timestamp.value()),
        }
    }
}

fn urls(videos: &[VideoUrl]) -> Vec<String> {
    videos.iter().map(|v| v.as_str().to_string()).collect()
}

fn room_data(snapshot: &RoomSnapshot) -> ServerMessage {
    ServerMessage::RoomData {
        room_id: snapshot.room_id.as_str().to_string(),
        messages: snapshot.messages.iter().map(MessageDto::from).collect(),
        video_url: snapshot.current_video.as_ref().map(|v| v.as_str().to_string()),
        created_at: timestamp_to_jst_rfc3339(snapshot.created_at.value()),
        playlist: urls(&snapshot.playlist),
        current_video_index: snapshot.current_video_index,
    }
}

impl From<&ServerEvent> for ServerMessage {
    fn from(event: &ServerEvent) -> Self {
        match event {
            ServerEvent::RoomCreated { room_id } => Self::RoomCreated {
                room_id: room_id.as_str().to_string(),
            },
            ServerEvent::RoomData(snapshot) => room_data(snapshot),
            ServerEvent::ParticipantCount { count } => Self::ParticipantCount { count: *count },
            ServerEvent::NewMessage(message) => Self::NewMessage {
                message: message.into(),
            },
            ServerEvent::VideoUpdate {
                video_url,
                current_video_index,
            } => Self::VideoUpdate {
                video_url: video_url.as_ref().map(|v| v.as_str().to_string()),
                current_video_index: *current_video_index,
            },
            ServerEvent::PlaylistUpdate {
                playlist,
                current_video_index,
            } => Self::PlaylistUpdate {
                playlist: urls(playlist),
                current_video_index: *current_video_index,
            },
            ServerEvent::VideoSync(video_event) => Self::VideoSync {
                event: (*video_event).into(),
            },
            ServerEvent::RoomCheckResult { room_id, exists } => Self::RoomCheckResult {
                room_id: room_id.as_str().to_string(),
                exists: *exists,
            },
            ServerEvent::Error { message } => Self::Error {
                message: message.clone(),
            },
            ServerEvent::ServerShutdown { message } => Self::ServerShutdown {
                message: message.clone(),
            },
        }
    }
}

impl From<&Room> for RoomSummaryDto {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.as_str().to_string(),
            participant_count: room.member_count(),
            created_at: timestamp_to_jst_rfc3339(room.created_at.value()),
        }
    }
}

impl From<&Room> for RoomDetailDto {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.as_str().to_string(),
            participant_count: room.member_count(),
            message_count: room.messages().len(),
            video_url: room.current_video().map(|v| v.as_str().to_string()),
            playlist: urls(room.playlist()),
            current_video_index: room.current_video_index(),
            created_at: timestamp_to_jst_rfc3339(room.created_at.value()),
        }
    }
}

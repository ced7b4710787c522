//! Core domain models: rooms, their chat log and shared playback state.

use std::collections::HashSet;

use super::{
    error::RoomError,
    event::{Outbound, ServerEvent, VideoEvent},
    value_object::{ConnectionId, MessageContent, MessageId, RoomId, Timestamp, UserName, VideoUrl},
};

/// Cursor value meaning "no playlist-indexed video is active"
pub const NO_PLAYLIST_INDEX: i64 = -1;

/// A watch-together room.
///
/// All mutations go through the methods below, which keep the membership,
/// chat log and playlist invariants and report the events to deliver.
/// Callers hold the room's mutex for the duration of a call.
#[derive(Debug, Clone)]
pub struct Room {
    pub id: RoomId,
    members: HashSet<ConnectionId>,
    messages: Vec<ChatMessage>,
    current_video: Option<VideoUrl>,
    playlist: Vec<VideoUrl>,
    current_video_index: i64,
    pub created_at: Timestamp,
    closed: bool,
}

/// Result of removing a member
#[derive(Debug, Clone, PartialEq)]
pub struct Departure {
    /// Whether the connection was actually a member
    pub removed: bool,
    /// Whether the room became empty and is now closed
    pub emptied: bool,
    pub events: Vec<Outbound>,
}

impl Room {
    /// Create a new empty room with the given ID and creation timestamp
    pub fn new(id: RoomId, created_at: Timestamp) -> Self {
        Self {
            id,
            members: HashSet::new(),
            messages: Vec::new(),
            current_video: None,
            playlist: Vec::new(),
            current_video_index: NO_PLAYLIST_INDEX,
            created_at,
            closed: false,
        }
    }

    /// Member ids copied out so delivery can happen without the room lock
    pub fn members_snapshot(&self) -> Vec<ConnectionId> {
        self.members.iter().copied().collect()
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn is_member(&self, connection_id: &ConnectionId) -> bool {
        self.members.contains(connection_id)
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn current_video(&self) -> Option<&VideoUrl> {
        self.current_video.as_ref()
    }

    pub fn playlist(&self) -> &[VideoUrl] {
        &self.playlist
    }

    pub fn current_video_index(&self) -> i64 {
        self.current_video_index
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            room_id: self.id.clone(),
            messages: self.messages.clone(),
            current_video: self.current_video.clone(),
            playlist: self.playlist.clone(),
            current_video_index: self.current_video_index,
            created_at: self.created_at,
        }
    }

    fn ensure_open(&self) -> Result<(), RoomError> {
        if self.closed {
            return Err(RoomError::Closed(self.id.clone()));
        }
        Ok(())
    }

    fn participant_count(&self) -> ServerEvent {
        ServerEvent::ParticipantCount {
            count: self.members.len(),
        }
    }

    fn video_update(&self) -> ServerEvent {
        ServerEvent::VideoUpdate {
            video_url: self.current_video.clone(),
            current_video_index: self.current_video_index,
        }
    }

    fn playlist_update(&self) -> ServerEvent {
        ServerEvent::PlaylistUpdate {
            playlist: self.playlist.clone(),
            current_video_index: self.current_video_index,
        }
    }

    /// Add a member. The joiner gets the full snapshot, everyone gets the new count.
    ///
    /// Joining twice is harmless: the set keeps one entry and the events are re-sent.
    pub fn join(&mut self, connection_id: ConnectionId) -> Result<Vec<Outbound>, RoomError> {
        self.ensure_open()?;
        self.members.insert(connection_id);
        Ok(vec![
            Outbound::to_connection(connection_id, ServerEvent::RoomData(self.snapshot())),
            Outbound::to_members(self.participant_count()),
        ])
    }

    /// Remove a member. Removing the last member closes the room.
    pub fn leave(&mut self, connection_id: &ConnectionId) -> Result<Departure, RoomError> {
        self.ensure_open()?;
        if !self.members.remove(connection_id) {
            return Ok(Departure {
                removed: false,
                emptied: false,
                events: Vec::new(),
            });
        }
        if self.members.is_empty() {
            self.closed = true;
            return Ok(Departure {
                removed: true,
                emptied: true,
                events: Vec::new(),
            });
        }
        Ok(Departure {
            removed: true,
            emptied: false,
            events: vec![Outbound::to_members(self.participant_count())],
        })
    }

    /// Close a room that nobody has joined.
    ///
    /// Returns `false` (and changes nothing) when the room has members or is
    /// already closed.
    pub fn close_if_empty(&mut self) -> bool {
        if self.closed || !self.members.is_empty() {
            return false;
        }
        self.closed = true;
        true
    }

    /// Append a chat message and announce it to every member, sender included.
    pub fn post_message(
        &mut self,
        user: UserName,
        content: MessageContent,
        timestamp: Timestamp,
    ) -> Result<Vec<Outbound>, RoomError> {
        self.ensure_open()?;
        let message = ChatMessage::new(MessageId::generate(), user, content, timestamp);
        self.messages.push(message.clone());
        Ok(vec![Outbound::to_members(ServerEvent::NewMessage(message))])
    }

    /// Replace the current video directly; the playlist cursor is reset.
    pub fn set_video(&mut self, video_url: VideoUrl) -> Result<Vec<Outbound>, RoomError> {
        self.ensure_open()?;
        self.current_video = Some(video_url);
        self.current_video_index = NO_PLAYLIST_INDEX;
        Ok(vec![Outbound::to_members(self.video_update())])
    }

    /// Relay a playback signal to everyone but the sender. Nothing is stored.
    pub fn sync_playback(
        &self,
        sender: ConnectionId,
        event: VideoEvent,
    ) -> Result<Vec<Outbound>, RoomError> {
        self.ensure_open()?;
        Ok(vec![Outbound::to_members_except(
            sender,
            ServerEvent::VideoSync(event),
        )])
    }

    /// Queue a video, or start it right away when nothing is playing.
    pub fn add_to_playlist(&mut self, video_url: VideoUrl) -> Result<Vec<Outbound>, RoomError> {
        self.ensure_open()?;
        if self.current_video.is_none() {
            self.current_video = Some(video_url);
            self.current_video_index = NO_PLAYLIST_INDEX;
            return Ok(vec![Outbound::to_members(self.video_update())]);
        }
        self.playlist.push(video_url);
        Ok(vec![Outbound::to_members(self.playlist_update())])
    }

    /// Move the cursor to the next playlist entry, if there is one.
    ///
    /// Without a next entry nothing changes and nothing is emitted.
    pub fn advance_to_next(&mut self) -> Result<Vec<Outbound>, RoomError> {
        self.ensure_open()?;
        let next_index = self.current_video_index + 1;
        let Some(next_video) = usize::try_from(next_index)
            .ok()
            .and_then(|i| self.playlist.get(i))
            .cloned()
        else {
            return Ok(Vec::new());
        };
        self.current_video_index = next_index;
        self.current_video = Some(next_video);
        Ok(vec![Outbound::to_members(self.video_update())])
    }

    /// Handle the end of the current video.
    ///
    /// Entries already reached through [`Room::advance_to_next`] (everything
    /// up to and including the cursor) are dropped first, then the head of
    /// the remaining queue becomes the current video. The cursor always ends
    /// at [`NO_PLAYLIST_INDEX`].
    pub fn on_video_ended(&mut self) -> Result<Vec<Outbound>, RoomError> {
        self.ensure_open()?;
        let had_playlist = !self.playlist.is_empty();

        let played = usize::try_from(self.current_video_index + 1)
            .unwrap_or(0)
            .min(self.playlist.len());
        self.playlist.drain(..played);
        self.current_video_index = NO_PLAYLIST_INDEX;

        if self.playlist.is_empty() {
            self.current_video = None;
            let mut events = vec![Outbound::to_members(self.video_update())];
            if had_playlist {
                events.push(Outbound::to_members(self.playlist_update()));
            }
            return Ok(events);
        }

        self.current_video = Some(self.playlist.remove(0));
        Ok(vec![
            Outbound::to_members(self.video_update()),
            Outbound::to_members(self.playlist_update()),
        ])
    }
}

/// Point-in-time copy of a room, sent to a joining member
#[derive(Debug, Clone, PartialEq)]
pub struct RoomSnapshot {
    pub room_id: RoomId,
    pub messages: Vec<ChatMessage>,
    pub current_video: Option<VideoUrl>,
    pub playlist: Vec<VideoUrl>,
    pub current_video_index: i64,
    pub created_at: Timestamp,
}

/// Represents a chat message in the domain model
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub user: UserName,
    pub content: MessageContent,
    pub timestamp: Timestamp,
}

impl ChatMessage {
    pub fn new(
        id: MessageId,
        user: UserName,
        content: MessageContent,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            id,
            user,
            content,
            timestamp,
        }
    }
}

/// A live client connection and the room it currently belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub id: ConnectionId,
    pub connected_at: Timestamp,
    pub room_id: Option<RoomId>,
    /// Rooms created by this connection, cleaned up on disconnect if still unjoined
    pub created_rooms: Vec<RoomId>,
}

impl Connection {
    pub fn new(id: ConnectionId, connected_at: Timestamp) -> Self {
        Self {
            id,
            connected_at,
            room_id: None,
            created_rooms: Vec::new(),
        }
    }
}

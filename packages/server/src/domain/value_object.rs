//! Value Objects for domain models.
//!
//! Value Objects are immutable objects that represent values in the domain.
//! They are compared by their value, not by identity.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ValueObjectError;

/// Maximum length of a room identifier accepted from clients
pub const ROOM_ID_MAX_LENGTH: usize = 64;

/// Maximum length of a display name
pub const USER_NAME_MAX_LENGTH: usize = 100;

/// Maximum length of a chat message
pub const MESSAGE_CONTENT_MAX_LENGTH: usize = 10000;

/// Maximum length of a video reference
pub const VIDEO_URL_MAX_LENGTH: usize = 2048;

/// Connection identifier value object.
///
/// Assigned by the server when a WebSocket is accepted; never supplied by clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Room identifier value object.
///
/// Generated ids are 8 alphanumeric characters (see `RoomIdFactory`); ids
/// coming from clients are only checked for shape, not existence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomId(String);

impl RoomId {
    /// Create a new RoomId.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is empty, longer than
    /// [`ROOM_ID_MAX_LENGTH`], or contains non-alphanumeric characters.
    pub fn new(id: String) -> Result<Self, ValueObjectError> {
        if id.is_empty() {
            return Err(ValueObjectError::RoomIdEmpty);
        }
        let len = id.chars().count();
        if len > ROOM_ID_MAX_LENGTH {
            return Err(ValueObjectError::RoomIdTooLong {
                max: ROOM_ID_MAX_LENGTH,
                actual: len,
            });
        }
        if !id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ValueObjectError::RoomIdInvalidFormat(id));
        }
        Ok(Self(id))
    }

    /// Wrap an id produced by `RoomIdFactory`, which only emits valid ids.
    pub(crate) fn from_generated(id: String) -> Self {
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for RoomId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Chat message identifier, unique within a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(Uuid);

impl MessageId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display name attached to a chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserName(String);

impl UserName {
    pub fn new(name: String) -> Result<Self, ValueObjectError> {
        if name.trim().is_empty() {
            return Err(ValueObjectError::UserNameEmpty);
        }
        let len = name.chars().count();
        if len > USER_NAME_MAX_LENGTH {
            return Err(ValueObjectError::UserNameTooLong {
                max: USER_NAME_MAX_LENGTH,
                actual: len,
            });
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for UserName {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Message content value object.
///
/// Represents the content of a chat message with validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageContent(String);

impl MessageContent {
    pub fn new(content: String) -> Result<Self, ValueObjectError> {
        if content.trim().is_empty() {
            return Err(ValueObjectError::MessageContentEmpty);
        }
        let len = content.chars().count();
        if len > MESSAGE_CONTENT_MAX_LENGTH {
            return Err(ValueObjectError::MessageContentTooLong {
                max: MESSAGE_CONTENT_MAX_LENGTH,
                actual: len,
            });
        }
        Ok(Self(content))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for MessageContent {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for MessageContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference to a video as understood by the external player.
///
/// The engine never resolves or fetches it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VideoUrl(String);

impl VideoUrl {
    pub fn new(url: String) -> Result<Self, ValueObjectError> {
        if url.trim().is_empty() {
            return Err(ValueObjectError::VideoUrlEmpty);
        }
        let len = url.chars().count();
        if len > VIDEO_URL_MAX_LENGTH {
            return Err(ValueObjectError::VideoUrlTooLong {
                max: VIDEO_URL_MAX_LENGTH,
                actual: len,
            });
        }
        Ok(Self(url))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for VideoUrl {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for VideoUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Playback position in seconds.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct PlaybackPosition(f64);

impl PlaybackPosition {
    pub fn new(seconds: f64) -> Result<Self, ValueObjectError> {
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(ValueObjectError::PlaybackPositionInvalid(seconds));
        }
        Ok(Self(seconds))
    }

    pub fn seconds(&self) -> f64 {
        self.0
    }
}

/// Timestamp value object.
///
/// Represents a Unix timestamp in milliseconds (JST).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

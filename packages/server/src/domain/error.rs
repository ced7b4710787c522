//! Domain layer error definitions.

use thiserror::Error;

use super::value_object::RoomId;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValueObjectError {
    #[error("roomId cannot be empty")]
    RoomIdEmpty,

    #[error("roomId cannot exceed {max} characters (got {actual})")]
    RoomIdTooLong { max: usize, actual: usize },

    #[error("roomId must be alphanumeric (got: {0})")]
    RoomIdInvalidFormat(String),

    #[error("user cannot be empty")]
    UserNameEmpty,

    #[error("user cannot exceed {max} characters (got {actual})")]
    UserNameTooLong { max: usize, actual: usize },

    #[error("content cannot be empty")]
    MessageContentEmpty,

    #[error("content cannot exceed {max} characters (got {actual})")]
    MessageContentTooLong { max: usize, actual: usize },

    #[error("videoUrl cannot be empty")]
    VideoUrlEmpty,

    #[error("videoUrl cannot exceed {max} characters (got {actual})")]
    VideoUrlTooLong { max: usize, actual: usize },

    #[error("timestamp must be a finite, non-negative number of seconds (got {0})")]
    PlaybackPositionInvalid(f64),
}

/// Errors related to Room domain logic
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoomError {
    /// The last member left and the room no longer accepts operations
    #[error("Room '{0}' is closed")]
    Closed(RoomId),
}

/// Errors returned by repositories
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Room not found: {0}")]
    RoomNotFound(RoomId),

    #[error("Connection not found: {0}")]
    ConnectionNotFound(String),

    #[error("Connection already registered: {0}")]
    ConnectionAlreadyRegistered(String),
}

/// Errors returned by message pushers.
///
/// Both variants mean the transport is gone; broadcasts swallow them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MessagePushError {
    #[error("Client not found: {0}")]
    ClientNotFound(String),

    #[error("Push failed: {0}")]
    PushFailed(String),
}

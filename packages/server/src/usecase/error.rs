//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::{RepositoryError, RoomError, RoomId};

/// 接続処理のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectError {
    #[error("Connection '{0}' is already registered")]
    DuplicateConnection(String),
}

/// Room に対するコマンドのエラー
///
/// Display はそのままクライアントへの error 返信に使われる。
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoomCommandError {
    #[error("Room not found")]
    RoomNotFound(RoomId),

    #[error("Connection not found")]
    ConnectionNotFound(String),
}

impl From<RoomError> for RoomCommandError {
    fn from(err: RoomError) -> Self {
        match err {
            // 閉じられた Room はすでに存在しないものとして扱う
            RoomError::Closed(room_id) => Self::RoomNotFound(room_id),
        }
    }
}

impl From<RepositoryError> for RoomCommandError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::RoomNotFound(room_id) => Self::RoomNotFound(room_id),
            RepositoryError::ConnectionNotFound(id)
            | RepositoryError::ConnectionAlreadyRegistered(id) => Self::ConnectionNotFound(id),
        }
    }
}

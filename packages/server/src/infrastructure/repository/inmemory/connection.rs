//! InMemory Connection Repository 実装
//!
//! 接続中のクライアントと所属 Room の対応表。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Connection, ConnectionId, ConnectionRepository, RepositoryError, RoomId};

/// インメモリ Connection Repository 実装
#[derive(Default)]
pub struct InMemoryConnectionRepository {
    connections: Mutex<HashMap<ConnectionId, Connection>>,
}

impl InMemoryConnectionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConnectionRepository for InMemoryConnectionRepository {
    async fn register(&self, connection: Connection) -> Result<(), RepositoryError> {
        let mut connections = self.connections.lock().await;
        if connections.contains_key(&connection.id) {
            return Err(RepositoryError::ConnectionAlreadyRegistered(
                connection.id.to_string(),
            ));
        }
        connections.insert(connection.id, connection);
        Ok(())
    }

    async fn unregister(&self, connection_id: &ConnectionId) -> Option<Connection> {
        self.connections.lock().await.remove(connection_id)
    }

    async fn get(&self, connection_id: &ConnectionId) -> Option<Connection> {
        self.connections.lock().await.get(connection_id).cloned()
    }

    async fn set_room(
        &self,
        connection_id: &ConnectionId,
        room_id: Option<RoomId>,
    ) -> Result<Option<RoomId>, RepositoryError> {
        let mut connections = self.connections.lock().await;
        let connection = connections
            .get_mut(connection_id)
            .ok_or_else(|| RepositoryError::ConnectionNotFound(connection_id.to_string()))?;
        Ok(std::mem::replace(&mut connection.room_id, room_id))
    }

    async fn record_created_room(
        &self,
        connection_id: &ConnectionId,
        room_id: RoomId,
    ) -> Result<(), RepositoryError> {
        let mut connections = self.connections.lock().await;
        let connection = connections
            .get_mut(connection_id)
            .ok_or_else(|| RepositoryError::ConnectionNotFound(connection_id.to_string()))?;
        connection.created_rooms.push(room_id);
        Ok(())
    }

    async fn count(&self) -> usize {
        self.connections.lock().await.len()
    }
}

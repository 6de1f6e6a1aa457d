//! Redis-backed room cache for production deployments.
//!
//! Entries are JSON-serialized aggregates under namespaced keys with a
//! configurable TTL. The cache is advisory: every error is reported to the
//! caller as a `CacheError`, and the engine treats those as non-fatal.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

use crate::domain::foundation::{DomainError, ErrorCode, RoomId, UserId};
use crate::domain::room::{Participant, Room};
use crate::ports::RoomCache;

/// Redis implementation of RoomCache.
#[derive(Clone)]
pub struct RedisRoomCache {
    conn: MultiplexedConnection,
    ttl_secs: u64,
}

impl RedisRoomCache {
    /// Creates a new Redis cache with the given entry TTL.
    pub fn new(conn: MultiplexedConnection, ttl_secs: u64) -> Self {
        Self { conn, ttl_secs }
    }

    fn room_key(room_id: &RoomId) -> String {
        format!("rooms:{}", room_id)
    }

    fn participant_key(room_id: &RoomId, user_id: &UserId) -> String {
        format!("participants:{}:{}", room_id, user_id)
    }

    fn cache_err(context: &str, err: impl std::fmt::Display) -> DomainError {
        DomainError::new(ErrorCode::CacheError, format!("{}: {}", context, err))
    }
}

#[async_trait]
impl RoomCache for RedisRoomCache {
    async fn get_room(&self, room_id: &RoomId) -> Result<Option<Room>, DomainError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn
            .get(Self::room_key(room_id))
            .await
            .map_err(|e| Self::cache_err("Failed to read room entry", e))?;

        match raw {
            Some(json) => {
                let room = serde_json::from_str(&json)
                    .map_err(|e| Self::cache_err("Failed to decode room entry", e))?;
                Ok(Some(room))
            }
            None => Ok(None),
        }
    }

    async fn put_room(&self, room: &Room) -> Result<(), DomainError> {
        let json = serde_json::to_string(room)
            .map_err(|e| Self::cache_err("Failed to encode room entry", e))?;
        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(Self::room_key(room.room_id()), json, self.ttl_secs)
            .await
            .map_err(|e| Self::cache_err("Failed to write room entry", e))?;
        Ok(())
    }

    async fn evict_room(&self, room_id: &RoomId) -> Result<(), DomainError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(Self::room_key(room_id))
            .await
            .map_err(|e| Self::cache_err("Failed to evict room entry", e))?;
        Ok(())
    }

    async fn get_participant(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
    ) -> Result<Option<Participant>, DomainError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn
            .get(Self::participant_key(room_id, user_id))
            .await
            .map_err(|e| Self::cache_err("Failed to read participant entry", e))?;

        match raw {
            Some(json) => {
                let participant = serde_json::from_str(&json)
                    .map_err(|e| Self::cache_err("Failed to decode participant entry", e))?;
                Ok(Some(participant))
            }
            None => Ok(None),
        }
    }

    async fn put_participant(&self, participant: &Participant) -> Result<(), DomainError> {
        let json = serde_json::to_string(participant)
            .map_err(|e| Self::cache_err("Failed to encode participant entry", e))?;
        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(
            Self::participant_key(participant.room_id(), participant.user_id()),
            json,
            self.ttl_secs,
        )
        .await
        .map_err(|e| Self::cache_err("Failed to write participant entry", e))?;
        Ok(())
    }

    async fn evict_participant(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
    ) -> Result<(), DomainError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(Self::participant_key(room_id, user_id))
            .await
            .map_err(|e| Self::cache_err("Failed to evict participant entry", e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_namespaced() {
        let room_id = RoomId::new();
        let user_id = UserId::new("bob".to_string()).unwrap();
        assert_eq!(
            RedisRoomCache::room_key(&room_id),
            format!("rooms:{}", room_id)
        );
        assert_eq!(
            RedisRoomCache::participant_key(&room_id, &user_id),
            format!("participants:{}:bob", room_id)
        );
    }
}

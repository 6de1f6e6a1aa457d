//! Room read queries, with and without the participant set.

use std::sync::Arc;

use tracing::warn;

use crate::domain::foundation::RoomId;
use crate::domain::room::{Room, RoomError};
use crate::ports::{RoomCache, RoomRepository};

/// Query for a single room.
#[derive(Debug, Clone)]
pub struct GetRoomQuery {
    pub room_id: RoomId,
}

/// Cache-first lookup of a room row, participants not materialized.
///
/// The cache may be stale or empty; a miss falls through to the store and the
/// hit is written back on a best-effort basis. Mutating flows never read
/// through this handler.
pub struct GetRoomHandler {
    repository: Arc<dyn RoomRepository>,
    cache: Arc<dyn RoomCache>,
}

impl GetRoomHandler {
    pub fn new(repository: Arc<dyn RoomRepository>, cache: Arc<dyn RoomCache>) -> Self {
        Self { repository, cache }
    }

    pub async fn handle(&self, query: GetRoomQuery) -> Result<Room, RoomError> {
        match self.cache.get_room(&query.room_id).await {
            Ok(Some(room)) => return Ok(room),
            Ok(None) => {}
            Err(e) => {
                warn!(room_id = %query.room_id, error = %e, "Cache read failed, falling back to store");
            }
        }

        let room = self
            .repository
            .find_by_id(&query.room_id)
            .await?
            .ok_or(RoomError::NotFound(query.room_id))?;

        if let Err(e) = self.cache.put_room(&room).await {
            warn!(room_id = %query.room_id, error = %e, "Cache backfill failed");
        }

        Ok(room)
    }
}

/// Store-only lookup of a room with its full participant set. Used by flows
/// that must see an authoritative membership view.
pub struct GetRoomWithParticipantsHandler {
    repository: Arc<dyn RoomRepository>,
}

impl GetRoomWithParticipantsHandler {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: GetRoomQuery) -> Result<Room, RoomError> {
        self.repository
            .find_with_participants(&query.room_id)
            .await?
            .ok_or(RoomError::NotFound(query.room_id))
    }
}

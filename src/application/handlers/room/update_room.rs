//! UpdateRoomHandler - touches a room record.

use std::sync::Arc;

use tracing::warn;

use crate::domain::foundation::RoomId;
use crate::domain::room::{Room, RoomError};
use crate::ports::{RoomCache, RoomRepository};

/// Command to update a room.
#[derive(Debug, Clone)]
pub struct UpdateRoomCommand {
    pub room_id: RoomId,
}

/// Handler for updating rooms.
///
/// Reloads the stored record and applies a field-level merge rather than
/// overwriting with a caller-supplied snapshot; today the only mergeable
/// field is the update timestamp.
pub struct UpdateRoomHandler {
    repository: Arc<dyn RoomRepository>,
    cache: Arc<dyn RoomCache>,
}

impl UpdateRoomHandler {
    pub fn new(repository: Arc<dyn RoomRepository>, cache: Arc<dyn RoomCache>) -> Self {
        Self { repository, cache }
    }

    pub async fn handle(&self, cmd: UpdateRoomCommand) -> Result<Room, RoomError> {
        let mut room = self
            .repository
            .find_by_id(&cmd.room_id)
            .await?
            .ok_or(RoomError::NotFound(cmd.room_id))?;

        room.touch();
        self.repository.update(&room).await?;

        if let Err(e) = self.cache.put_room(&room).await {
            warn!(room_id = %cmd.room_id, error = %e, "Cache refresh after update failed");
        }

        Ok(room)
    }
}

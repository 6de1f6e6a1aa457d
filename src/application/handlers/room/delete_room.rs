//! DeleteRoomHandler - removes a room record outright.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::foundation::RoomId;
use crate::domain::room::RoomError;
use crate::ports::{RoomCache, RoomRepository};

/// Command to delete a room.
#[derive(Debug, Clone)]
pub struct DeleteRoomCommand {
    pub room_id: RoomId,
}

/// Handler for deleting rooms. Idempotent: deleting an absent room succeeds.
pub struct DeleteRoomHandler {
    repository: Arc<dyn RoomRepository>,
    cache: Arc<dyn RoomCache>,
}

impl DeleteRoomHandler {
    pub fn new(repository: Arc<dyn RoomRepository>, cache: Arc<dyn RoomCache>) -> Self {
        Self { repository, cache }
    }

    pub async fn handle(&self, cmd: DeleteRoomCommand) -> Result<(), RoomError> {
        self.repository.delete(&cmd.room_id).await?;

        if let Err(e) = self.cache.evict_room(&cmd.room_id).await {
            warn!(room_id = %cmd.room_id, error = %e, "Cache eviction after delete failed");
        }

        info!(room_id = %cmd.room_id, "Room deleted");
        Ok(())
    }
}

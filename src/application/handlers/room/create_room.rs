//! CreateRoomHandler - command handler for creating rooms.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::foundation::{RoomId, UserId};
use crate::domain::room::{JoinSecret, Room, RoomError};
use crate::ports::{RoomCache, RoomRepository};

/// Command to create a new room.
#[derive(Debug, Clone)]
pub struct CreateRoomCommand {
    pub hoster_user_id: UserId,
}

/// Result of successful room creation.
#[derive(Debug, Clone)]
pub struct CreateRoomResult {
    pub room: Room,
}

/// Handler for creating rooms.
///
/// The room and its host participant are persisted as one atomic unit; no
/// notification is emitted (creation has no event type).
pub struct CreateRoomHandler {
    repository: Arc<dyn RoomRepository>,
    cache: Arc<dyn RoomCache>,
}

impl CreateRoomHandler {
    pub fn new(repository: Arc<dyn RoomRepository>, cache: Arc<dyn RoomCache>) -> Self {
        Self { repository, cache }
    }

    pub async fn handle(&self, cmd: CreateRoomCommand) -> Result<CreateRoomResult, RoomError> {
        let room = Room::new(RoomId::new(), cmd.hoster_user_id, JoinSecret::generate());

        self.repository.create(&room).await?;

        if let Err(e) = self.cache.put_room(&room).await {
            warn!(room_id = %room.room_id(), error = %e, "Cache write after create failed");
        }

        info!(room_id = %room.room_id(), hoster = %room.hoster_user_id(), "Room created");

        Ok(CreateRoomResult { room })
    }
}

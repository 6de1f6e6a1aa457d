//! ListRoomsHandler - enumerates all rooms.

use std::sync::Arc;

use crate::domain::room::{Room, RoomError};
use crate::ports::RoomRepository;

/// Handler for listing rooms. Store read, participants not loaded.
pub struct ListRoomsHandler {
    repository: Arc<dyn RoomRepository>,
}

impl ListRoomsHandler {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self) -> Result<Vec<Room>, RoomError> {
        Ok(self.repository.find_all().await?)
    }
}

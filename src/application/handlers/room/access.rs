//! RoomAccessPolicy - host check used by privileged transport endpoints.

use std::sync::Arc;

use crate::domain::foundation::{RoomId, UserId};
use crate::ports::{RoomCache, RoomRepository};

use super::{GetRoomHandler, GetRoomQuery};

/// Answers "is this user the current host of that room".
///
/// An absent room answers `false` rather than erroring, so the policy can sit
/// directly in front of transport guards. Reads go through the cache-first
/// room lookup.
pub struct RoomAccessPolicy {
    get_room: GetRoomHandler,
}

impl RoomAccessPolicy {
    pub fn new(repository: Arc<dyn RoomRepository>, cache: Arc<dyn RoomCache>) -> Self {
        Self {
            get_room: GetRoomHandler::new(repository, cache),
        }
    }

    pub async fn is_host(&self, room_id: &RoomId, user_id: &UserId) -> bool {
        match self.get_room.handle(GetRoomQuery { room_id: *room_id }).await {
            Ok(room) => room.is_host(user_id),
            Err(_) => false,
        }
    }
}

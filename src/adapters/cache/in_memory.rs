//! In-memory cache for tests.
//!
//! Deterministic, no TTL. Room entries are stored without participants to
//! mirror the Redis adapter's cache-the-row-only policy.
//!
//! # Panics
//!
//! Methods panic if the internal locks are poisoned; test-only code.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::foundation::{DomainError, RoomId, UserId};
use crate::domain::room::{Participant, Room};
use crate::ports::RoomCache;

/// In-memory implementation of RoomCache.
#[derive(Default)]
pub struct InMemoryRoomCache {
    rooms: Mutex<HashMap<RoomId, Room>>,
    participants: Mutex<HashMap<(RoomId, UserId), Participant>>,
}

impl InMemoryRoomCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a room entry is currently cached (for test assertions).
    pub fn has_room(&self, room_id: &RoomId) -> bool {
        self.rooms.lock().expect("rooms lock poisoned").contains_key(room_id)
    }

    /// Whether a participant entry is currently cached (for test assertions).
    pub fn has_participant(&self, room_id: &RoomId, user_id: &UserId) -> bool {
        self.participants
            .lock()
            .expect("participants lock poisoned")
            .contains_key(&(*room_id, user_id.clone()))
    }
}

#[async_trait]
impl RoomCache for InMemoryRoomCache {
    async fn get_room(&self, room_id: &RoomId) -> Result<Option<Room>, DomainError> {
        Ok(self
            .rooms
            .lock()
            .expect("rooms lock poisoned")
            .get(room_id)
            .cloned())
    }

    async fn put_room(&self, room: &Room) -> Result<(), DomainError> {
        let entry = Room::reconstitute(
            *room.room_id(),
            room.hoster_user_id().clone(),
            room.join_secret().clone(),
            room.status(),
            *room.created_at(),
            *room.updated_at(),
            Vec::new(),
        );
        self.rooms
            .lock()
            .expect("rooms lock poisoned")
            .insert(*room.room_id(), entry);
        Ok(())
    }

    async fn evict_room(&self, room_id: &RoomId) -> Result<(), DomainError> {
        self.rooms
            .lock()
            .expect("rooms lock poisoned")
            .remove(room_id);
        Ok(())
    }

    async fn get_participant(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
    ) -> Result<Option<Participant>, DomainError> {
        Ok(self
            .participants
            .lock()
            .expect("participants lock poisoned")
            .get(&(*room_id, user_id.clone()))
            .cloned())
    }

    async fn put_participant(&self, participant: &Participant) -> Result<(), DomainError> {
        self.participants
            .lock()
            .expect("participants lock poisoned")
            .insert(
                (*participant.room_id(), participant.user_id().clone()),
                participant.clone(),
            );
        Ok(())
    }

    async fn evict_participant(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
    ) -> Result<(), DomainError> {
        self.participants
            .lock()
            .expect("participants lock poisoned")
            .remove(&(*room_id, user_id.clone()));
        Ok(())
    }
}

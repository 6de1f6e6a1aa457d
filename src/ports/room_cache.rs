//! Room cache port - best-effort lookup accelerator.
//!
//! The cache is advisory only. The engine reads through it on lookups,
//! writes through after successful store writes, and evicts on delete; a
//! miss or stale entry must never change an authorization or membership
//! decision, which is why join/leave/close read the store directly.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, RoomId, UserId};
use crate::domain::room::{Participant, Room};

/// Cache port for Room and Participant entries.
///
/// Room entries are cached without participants; the participant set is
/// only ever authoritative in the store.
#[async_trait]
pub trait RoomCache: Send + Sync {
    /// Fetch a cached room entry.
    async fn get_room(&self, room_id: &RoomId) -> Result<Option<Room>, DomainError>;

    /// Write a room entry through to the cache.
    async fn put_room(&self, room: &Room) -> Result<(), DomainError>;

    /// Evict a room entry. Idempotent.
    async fn evict_room(&self, room_id: &RoomId) -> Result<(), DomainError>;

    /// Fetch a cached participant entry.
    async fn get_participant(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
    ) -> Result<Option<Participant>, DomainError>;

    /// Write a participant entry through to the cache.
    async fn put_participant(&self, participant: &Participant) -> Result<(), DomainError>;

    /// Evict a participant entry. Idempotent.
    async fn evict_participant(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
    ) -> Result<(), DomainError>;
}

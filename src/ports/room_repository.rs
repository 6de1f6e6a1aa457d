//! Room repository port - the authoritative store.
//!
//! The store is the system of record: every privileged or racy decision is
//! made against it, never against the cache. Implementations must reject a
//! second participant insert for the same (user, room) pair so that a
//! concurrent duplicate join surfaces as [`ParticipantInsert::Duplicate`]
//! instead of corrupting the membership set.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, RoomId, UserId};
use crate::domain::room::{Participant, Room};

/// Outcome of a participant insert.
///
/// `Duplicate` means the store's uniqueness constraint rejected the write;
/// the engine translates this into the same conflict as its pre-check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticipantInsert {
    Inserted,
    Duplicate,
}

/// Repository port for Room and Participant persistence.
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Persist a new room together with its current participants in one
    /// atomic unit: a reader must never observe the room without its host.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn create(&self, room: &Room) -> Result<(), DomainError>;

    /// Find a room by id without materializing participants.
    ///
    /// The returned room's participant set is empty regardless of store
    /// contents.
    async fn find_by_id(&self, room_id: &RoomId) -> Result<Option<Room>, DomainError>;

    /// Find a room with its full participant set, ordered by join time
    /// (user id as tie-break). Join/leave/close depend on this ordering.
    async fn find_with_participants(&self, room_id: &RoomId)
        -> Result<Option<Room>, DomainError>;

    /// List all rooms without participants.
    async fn find_all(&self) -> Result<Vec<Room>, DomainError>;

    /// Update the room row (host, status, update timestamp). Does not touch
    /// participant records.
    ///
    /// # Errors
    ///
    /// - `RoomNotFound` if the room doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update(&self, room: &Room) -> Result<(), DomainError>;

    /// Delete a room and, by cascade, its participants. Idempotent:
    /// deleting an absent room is not an error.
    async fn delete(&self, room_id: &RoomId) -> Result<(), DomainError>;

    /// Insert a participant record, reporting a uniqueness rejection as
    /// [`ParticipantInsert::Duplicate`] rather than an error.
    async fn insert_participant(
        &self,
        participant: &Participant,
    ) -> Result<ParticipantInsert, DomainError>;

    /// Persist a host handoff in one atomic unit: promote `successor`,
    /// delete `departed`'s record, and write the room row (which carries
    /// the new host). A reader must never observe two HOSTER records or a
    /// host field pointing at a deleted participant.
    ///
    /// # Errors
    ///
    /// - `ParticipantNotFound` if the successor's record is missing
    /// - `DatabaseError` on persistence failure; the store is unchanged
    async fn transfer_host(
        &self,
        room: &Room,
        successor: &Participant,
        departed: &UserId,
    ) -> Result<(), DomainError>;

    /// Delete a single participant record. Idempotent.
    async fn delete_participant(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
    ) -> Result<(), DomainError>;

    /// Delete every participant record of a room (close cascade).
    async fn delete_participants(&self, room_id: &RoomId) -> Result<(), DomainError>;

    /// Find a single participant record.
    async fn find_participant(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
    ) -> Result<Option<Participant>, DomainError>;
}

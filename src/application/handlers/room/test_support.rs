//! Shared test doubles for handler tests.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, RoomId, UserId};
use crate::domain::room::{Participant, Room, RoomEvent};
use crate::ports::{ParticipantInsert, RoomCache, RoomNotifier, RoomRepository};

/// Cache whose every operation fails, for degraded-cache paths.
pub struct FailingCache;

#[async_trait]
impl RoomCache for FailingCache {
    async fn get_room(&self, _id: &RoomId) -> Result<Option<Room>, DomainError> {
        Err(DomainError::new(ErrorCode::CacheError, "cache down"))
    }
    async fn put_room(&self, _room: &Room) -> Result<(), DomainError> {
        Err(DomainError::new(ErrorCode::CacheError, "cache down"))
    }
    async fn evict_room(&self, _id: &RoomId) -> Result<(), DomainError> {
        Err(DomainError::new(ErrorCode::CacheError, "cache down"))
    }
    async fn get_participant(
        &self,
        _room_id: &RoomId,
        _user_id: &UserId,
    ) -> Result<Option<Participant>, DomainError> {
        Err(DomainError::new(ErrorCode::CacheError, "cache down"))
    }
    async fn put_participant(&self, _participant: &Participant) -> Result<(), DomainError> {
        Err(DomainError::new(ErrorCode::CacheError, "cache down"))
    }
    async fn evict_participant(
        &self,
        _room_id: &RoomId,
        _user_id: &UserId,
    ) -> Result<(), DomainError> {
        Err(DomainError::new(ErrorCode::CacheError, "cache down"))
    }
}

/// Notifier whose publish always fails, for fire-and-forget coverage.
pub struct FailingNotifier;

#[async_trait]
impl RoomNotifier for FailingNotifier {
    async fn publish(&self, _event: &RoomEvent) -> Result<(), DomainError> {
        Err(DomainError::new(ErrorCode::PublishError, "broker down"))
    }
}

/// Repository wrapper with per-method failure injection.
///
/// Delegates to an inner repository, failing the selected methods, so a
/// test can break exactly one write in a multi-write sequence.
pub struct FaultyRepository {
    pub inner: Arc<dyn RoomRepository>,
    pub fail_create: bool,
    pub fail_update: bool,
    pub fail_delete: bool,
    pub fail_transfer_host: bool,
    pub fail_delete_participants: bool,
    /// Report `Duplicate` from `insert_participant` regardless of state,
    /// simulating the store constraint firing in a join race.
    pub duplicate_inserts: bool,
}

impl FaultyRepository {
    pub fn wrapping(inner: Arc<dyn RoomRepository>) -> Self {
        Self {
            inner,
            fail_create: false,
            fail_update: false,
            fail_delete: false,
            fail_transfer_host: false,
            fail_delete_participants: false,
            duplicate_inserts: false,
        }
    }

    fn db_err(what: &str) -> DomainError {
        DomainError::new(ErrorCode::DatabaseError, format!("injected: {}", what))
    }
}

#[async_trait]
impl RoomRepository for FaultyRepository {
    async fn create(&self, room: &Room) -> Result<(), DomainError> {
        if self.fail_create {
            return Err(Self::db_err("create"));
        }
        self.inner.create(room).await
    }

    async fn find_by_id(&self, room_id: &RoomId) -> Result<Option<Room>, DomainError> {
        self.inner.find_by_id(room_id).await
    }

    async fn find_with_participants(
        &self,
        room_id: &RoomId,
    ) -> Result<Option<Room>, DomainError> {
        self.inner.find_with_participants(room_id).await
    }

    async fn find_all(&self) -> Result<Vec<Room>, DomainError> {
        self.inner.find_all().await
    }

    async fn update(&self, room: &Room) -> Result<(), DomainError> {
        if self.fail_update {
            return Err(Self::db_err("update"));
        }
        self.inner.update(room).await
    }

    async fn delete(&self, room_id: &RoomId) -> Result<(), DomainError> {
        if self.fail_delete {
            return Err(Self::db_err("delete"));
        }
        self.inner.delete(room_id).await
    }

    async fn insert_participant(
        &self,
        participant: &Participant,
    ) -> Result<ParticipantInsert, DomainError> {
        if self.duplicate_inserts {
            return Ok(ParticipantInsert::Duplicate);
        }
        self.inner.insert_participant(participant).await
    }

    async fn delete_participant(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
    ) -> Result<(), DomainError> {
        self.inner.delete_participant(room_id, user_id).await
    }

    async fn transfer_host(
        &self,
        room: &Room,
        successor: &Participant,
        departed: &UserId,
    ) -> Result<(), DomainError> {
        if self.fail_transfer_host {
            return Err(Self::db_err("transfer_host"));
        }
        self.inner.transfer_host(room, successor, departed).await
    }

    async fn delete_participants(&self, room_id: &RoomId) -> Result<(), DomainError> {
        if self.fail_delete_participants {
            return Err(Self::db_err("delete_participants"));
        }
        self.inner.delete_participants(room_id).await
    }

    async fn find_participant(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
    ) -> Result<Option<Participant>, DomainError> {
        self.inner.find_participant(room_id, user_id).await
    }
}

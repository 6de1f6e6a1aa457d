//! In-memory implementation of RoomRepository.
//!
//! Backs unit and integration tests with deterministic, synchronous
//! storage. Mirrors the PostgreSQL adapter's contract, including the
//! uniqueness rejection on duplicate participant inserts.
//!
//! # Panics
//!
//! Methods panic if the internal lock is poisoned. Acceptable for test
//! infrastructure; production wiring uses the PostgreSQL adapter.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::foundation::{DomainError, ErrorCode, RoomId, UserId};
use crate::domain::room::{Participant, Room};
use crate::ports::{ParticipantInsert, RoomRepository};

/// In-memory room store keyed by room id.
#[derive(Default)]
pub struct InMemoryRoomRepository {
    rooms: Mutex<HashMap<RoomId, Room>>,
}

impl InMemoryRoomRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored rooms (for test assertions).
    pub fn room_count(&self) -> usize {
        self.lock().len()
    }

    /// Returns the number of stored participants of a room (for test
    /// assertions); `None` if the room is absent.
    pub fn participant_count(&self, room_id: &RoomId) -> Option<usize> {
        self.lock().get(room_id).map(|r| r.participants().len())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<RoomId, Room>> {
        self.rooms
            .lock()
            .expect("InMemoryRoomRepository: lock poisoned")
    }

    fn room_only(room: &Room) -> Room {
        Room::reconstitute(
            *room.room_id(),
            room.hoster_user_id().clone(),
            room.join_secret().clone(),
            room.status(),
            *room.created_at(),
            *room.updated_at(),
            Vec::new(),
        )
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn create(&self, room: &Room) -> Result<(), DomainError> {
        let mut rooms = self.lock();
        if rooms.contains_key(room.room_id()) {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                format!("Room already exists: {}", room.room_id()),
            ));
        }
        rooms.insert(*room.room_id(), room.clone());
        Ok(())
    }

    async fn find_by_id(&self, room_id: &RoomId) -> Result<Option<Room>, DomainError> {
        Ok(self.lock().get(room_id).map(Self::room_only))
    }

    async fn find_with_participants(
        &self,
        room_id: &RoomId,
    ) -> Result<Option<Room>, DomainError> {
        Ok(self.lock().get(room_id).map(|stored| {
            let mut participants = stored.participants().to_vec();
            participants.sort_by(|a, b| {
                (a.joined_at(), a.user_id()).cmp(&(b.joined_at(), b.user_id()))
            });
            Room::reconstitute(
                *stored.room_id(),
                stored.hoster_user_id().clone(),
                stored.join_secret().clone(),
                stored.status(),
                *stored.created_at(),
                *stored.updated_at(),
                participants,
            )
        }))
    }

    async fn find_all(&self) -> Result<Vec<Room>, DomainError> {
        Ok(self.lock().values().map(Self::room_only).collect())
    }

    async fn update(&self, room: &Room) -> Result<(), DomainError> {
        let mut rooms = self.lock();
        let stored = rooms.get_mut(room.room_id()).ok_or_else(|| {
            DomainError::new(
                ErrorCode::RoomNotFound,
                format!("Room not found: {}", room.room_id()),
            )
        })?;

        // Row-level update: participant records are managed separately.
        *stored = Room::reconstitute(
            *room.room_id(),
            room.hoster_user_id().clone(),
            room.join_secret().clone(),
            room.status(),
            *room.created_at(),
            *room.updated_at(),
            stored.participants().to_vec(),
        );
        Ok(())
    }

    async fn delete(&self, room_id: &RoomId) -> Result<(), DomainError> {
        self.lock().remove(room_id);
        Ok(())
    }

    async fn insert_participant(
        &self,
        participant: &Participant,
    ) -> Result<ParticipantInsert, DomainError> {
        let mut rooms = self.lock();
        let stored = rooms.get_mut(participant.room_id()).ok_or_else(|| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("No room for participant insert: {}", participant.room_id()),
            )
        })?;

        if stored.contains(participant.user_id()) {
            return Ok(ParticipantInsert::Duplicate);
        }

        let mut participants = stored.participants().to_vec();
        participants.push(participant.clone());
        *stored = Room::reconstitute(
            *stored.room_id(),
            stored.hoster_user_id().clone(),
            stored.join_secret().clone(),
            stored.status(),
            *stored.created_at(),
            *stored.updated_at(),
            participants,
        );
        Ok(ParticipantInsert::Inserted)
    }

    async fn transfer_host(
        &self,
        room: &Room,
        successor: &Participant,
        departed: &UserId,
    ) -> Result<(), DomainError> {
        // One lock scope makes the handoff atomic, matching the
        // PostgreSQL adapter's transaction.
        let mut rooms = self.lock();
        let stored = rooms.get_mut(room.room_id()).ok_or_else(|| {
            DomainError::new(
                ErrorCode::RoomNotFound,
                format!("Room not found: {}", room.room_id()),
            )
        })?;

        if !stored.contains(successor.user_id()) {
            return Err(DomainError::new(
                ErrorCode::ParticipantNotFound,
                format!("Participant not found: {}", successor.user_id()),
            ));
        }

        let participants: Vec<Participant> = stored
            .participants()
            .iter()
            .filter(|p| p.user_id() != departed)
            .map(|p| {
                if p.user_id() == successor.user_id() {
                    successor.clone()
                } else {
                    p.clone()
                }
            })
            .collect();
        *stored = Room::reconstitute(
            *room.room_id(),
            room.hoster_user_id().clone(),
            room.join_secret().clone(),
            room.status(),
            *room.created_at(),
            *room.updated_at(),
            participants,
        );
        Ok(())
    }

    async fn delete_participant(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
    ) -> Result<(), DomainError> {
        let mut rooms = self.lock();
        if let Some(stored) = rooms.get_mut(room_id) {
            let participants: Vec<Participant> = stored
                .participants()
                .iter()
                .filter(|p| p.user_id() != user_id)
                .cloned()
                .collect();
            *stored = Room::reconstitute(
                *stored.room_id(),
                stored.hoster_user_id().clone(),
                stored.join_secret().clone(),
                stored.status(),
                *stored.created_at(),
                *stored.updated_at(),
                participants,
            );
        }
        Ok(())
    }

    async fn delete_participants(&self, room_id: &RoomId) -> Result<(), DomainError> {
        let mut rooms = self.lock();
        if let Some(stored) = rooms.get_mut(room_id) {
            *stored = Self::room_only(stored);
        }
        Ok(())
    }

    async fn find_participant(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
    ) -> Result<Option<Participant>, DomainError> {
        Ok(self
            .lock()
            .get(room_id)
            .and_then(|r| r.participant(user_id).cloned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::room::JoinSecret;

    fn user(id: &str) -> UserId {
        UserId::new(id.to_string()).unwrap()
    }

    fn seeded_room() -> Room {
        Room::new(
            RoomId::new(),
            user("alice"),
            JoinSecret::from_string("123456".to_string()),
        )
    }

    #[tokio::test]
    async fn create_then_find_returns_room_without_participants() {
        let repo = InMemoryRoomRepository::new();
        let room = seeded_room();
        repo.create(&room).await.unwrap();

        let found = repo.find_by_id(room.room_id()).await.unwrap().unwrap();
        assert_eq!(found.room_id(), room.room_id());
        assert!(found.participants().is_empty());

        let full = repo
            .find_with_participants(room.room_id())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(full.participants().len(), 1);
    }

    #[tokio::test]
    async fn insert_participant_rejects_duplicate() {
        let repo = InMemoryRoomRepository::new();
        let mut room = seeded_room();
        repo.create(&room).await.unwrap();

        let bob = room.admit(user("bob")).unwrap();
        assert_eq!(
            repo.insert_participant(&bob).await.unwrap(),
            ParticipantInsert::Inserted
        );
        assert_eq!(
            repo.insert_participant(&bob).await.unwrap(),
            ParticipantInsert::Duplicate
        );
    }

    #[tokio::test]
    async fn update_missing_room_reports_not_found() {
        let repo = InMemoryRoomRepository::new();
        let room = seeded_room();
        let err = repo.update(&room).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::RoomNotFound);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let repo = InMemoryRoomRepository::new();
        let room = seeded_room();
        repo.create(&room).await.unwrap();
        repo.delete(room.room_id()).await.unwrap();
        repo.delete(room.room_id()).await.unwrap();
        assert_eq!(repo.room_count(), 0);
    }

    #[tokio::test]
    async fn find_with_participants_orders_by_join_time() {
        let repo = InMemoryRoomRepository::new();
        let mut room = seeded_room();
        repo.create(&room).await.unwrap();

        let carol = room.admit(user("carol")).unwrap();
        let bob = room.admit(user("bob")).unwrap();
        repo.insert_participant(&carol).await.unwrap();
        repo.insert_participant(&bob).await.unwrap();

        let full = repo
            .find_with_participants(room.room_id())
            .await
            .unwrap()
            .unwrap();
        let order: Vec<&str> = full
            .participants()
            .iter()
            .map(|p| p.user_id().as_str())
            .collect();
        // alice joined first, then carol, then bob
        assert_eq!(order, vec!["alice", "carol", "bob"]);
    }

    #[tokio::test]
    async fn transfer_host_moves_all_three_writes_together() {
        let repo = InMemoryRoomRepository::new();
        let mut room = seeded_room();
        repo.create(&room).await.unwrap();
        let bob = room.admit(user("bob")).unwrap();
        repo.insert_participant(&bob).await.unwrap();

        room.remove(&user("alice")).unwrap();
        let successor = room.promote_next_host().unwrap();
        repo.transfer_host(&room, &successor, &user("alice"))
            .await
            .unwrap();

        let stored = repo
            .find_with_participants(room.room_id())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.hoster_user_id(), &user("bob"));
        assert_eq!(stored.participants().len(), 1);
        assert!(stored.participants()[0].is_hoster());
    }

    #[tokio::test]
    async fn transfer_host_to_unknown_participant_fails() {
        let repo = InMemoryRoomRepository::new();
        let mut room = seeded_room();
        repo.create(&room).await.unwrap();

        room.remove(&user("alice")).unwrap();
        let ghost = Participant::new(
            user("ghost"),
            *room.room_id(),
            crate::domain::room::Role::Hoster,
            crate::domain::foundation::Timestamp::now(),
        );
        let result = repo.transfer_host(&room, &ghost, &user("alice")).await;
        assert!(result.is_err());
        // Nothing moved: alice is still the stored host.
        let stored = repo.find_by_id(room.room_id()).await.unwrap().unwrap();
        assert_eq!(stored.hoster_user_id(), &user("alice"));
    }
}

//! GetParticipantHandler - single-membership lookup.

use std::sync::Arc;

use tracing::warn;

use crate::domain::foundation::{RoomId, UserId};
use crate::domain::room::{Participant, RoomError};
use crate::ports::{RoomCache, RoomRepository};

/// Query for one participant record.
#[derive(Debug, Clone)]
pub struct GetParticipantQuery {
    pub room_id: RoomId,
    pub user_id: UserId,
}

/// Cache-first participant lookup with store fallback and backfill.
pub struct GetParticipantHandler {
    repository: Arc<dyn RoomRepository>,
    cache: Arc<dyn RoomCache>,
}

impl GetParticipantHandler {
    pub fn new(repository: Arc<dyn RoomRepository>, cache: Arc<dyn RoomCache>) -> Self {
        Self { repository, cache }
    }

    pub async fn handle(&self, query: GetParticipantQuery) -> Result<Participant, RoomError> {
        match self.cache.get_participant(&query.room_id, &query.user_id).await {
            Ok(Some(participant)) => return Ok(participant),
            Ok(None) => {}
            Err(e) => {
                warn!(
                    room_id = %query.room_id,
                    user_id = %query.user_id,
                    error = %e,
                    "Cache read failed, falling back to store"
                );
            }
        }

        let participant = self
            .repository
            .find_participant(&query.room_id, &query.user_id)
            .await?
            .ok_or(RoomError::ParticipantNotFound {
                room_id: query.room_id,
                user_id: query.user_id.clone(),
            })?;

        if let Err(e) = self.cache.put_participant(&participant).await {
            warn!(room_id = %query.room_id, error = %e, "Participant cache backfill failed");
        }

        Ok(participant)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::FailingCache;
    use super::super::{CreateRoomCommand, CreateRoomHandler};
    use super::*;
    use crate::adapters::{InMemoryRoomCache, InMemoryRoomRepository};
    use crate::domain::room::{Role, Room};

    fn user(id: &str) -> UserId {
        UserId::new(id.to_string()).unwrap()
    }

    async fn seeded_room(repository: &Arc<InMemoryRoomRepository>) -> Room {
        let create = CreateRoomHandler::new(
            repository.clone() as Arc<dyn RoomRepository>,
            Arc::new(InMemoryRoomCache::new()),
        );
        create
            .handle(CreateRoomCommand { hoster_user_id: user("alice") })
            .await
            .unwrap()
            .room
    }

    #[tokio::test]
    async fn miss_falls_back_to_store_and_backfills_cache() {
        let repository = Arc::new(InMemoryRoomRepository::new());
        let cache = Arc::new(InMemoryRoomCache::new());
        let room = seeded_room(&repository).await;

        let handler = GetParticipantHandler::new(repository, cache.clone());
        let participant = handler
            .handle(GetParticipantQuery {
                room_id: *room.room_id(),
                user_id: user("alice"),
            })
            .await
            .unwrap();

        assert_eq!(participant.role(), Role::Hoster);
        assert!(cache.has_participant(room.room_id(), &user("alice")));
    }

    #[tokio::test]
    async fn cache_failure_degrades_to_store_read() {
        let repository = Arc::new(InMemoryRoomRepository::new());
        let room = seeded_room(&repository).await;

        let handler = GetParticipantHandler::new(repository, Arc::new(FailingCache));
        let participant = handler
            .handle(GetParticipantQuery {
                room_id: *room.room_id(),
                user_id: user("alice"),
            })
            .await
            .unwrap();
        assert_eq!(participant.user_id(), &user("alice"));
    }

    #[tokio::test]
    async fn unknown_membership_is_participant_not_found() {
        let repository = Arc::new(InMemoryRoomRepository::new());
        let room = seeded_room(&repository).await;

        let handler = GetParticipantHandler::new(repository, Arc::new(InMemoryRoomCache::new()));
        let result = handler
            .handle(GetParticipantQuery {
                room_id: *room.room_id(),
                user_id: user("mallory"),
            })
            .await;
        assert!(matches!(result, Err(RoomError::ParticipantNotFound { .. })));
    }
}

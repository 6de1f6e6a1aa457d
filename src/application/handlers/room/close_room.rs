//! CloseRoomHandler - host-initiated shutdown of a room.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::foundation::{RoomId, UserId};
use crate::domain::room::{Room, RoomError, RoomEvent, RoomEventType};
use crate::ports::{RoomCache, RoomNotifier, RoomRepository};

/// Command to close a room.
#[derive(Debug, Clone)]
pub struct CloseRoomCommand {
    pub room_id: RoomId,
    pub user_id: UserId,
}

/// Result of closing a room, carrying the tombstoned aggregate.
#[derive(Debug, Clone)]
pub struct CloseRoomResult {
    pub room: Room,
}

impl CloseRoomResult {
    /// Transport-facing success message.
    pub fn message(&self) -> &'static str {
        "Room closed successfully"
    }
}

/// Handler for closing rooms.
///
/// Only the current host may close a room. Closing marks the room CLOSED and
/// drops its whole participant set; the row stays behind as a tombstone so
/// later joins fail closed rather than recreating state.
pub struct CloseRoomHandler {
    repository: Arc<dyn RoomRepository>,
    cache: Arc<dyn RoomCache>,
    notifier: Arc<dyn RoomNotifier>,
}

impl CloseRoomHandler {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        cache: Arc<dyn RoomCache>,
        notifier: Arc<dyn RoomNotifier>,
    ) -> Self {
        Self {
            repository,
            cache,
            notifier,
        }
    }

    pub async fn handle(&self, cmd: CloseRoomCommand) -> Result<CloseRoomResult, RoomError> {
        let mut room = self
            .repository
            .find_with_participants(&cmd.room_id)
            .await?
            .ok_or(RoomError::NotFound(cmd.room_id))?;

        if !room.is_host(&cmd.user_id) {
            return Err(RoomError::Forbidden);
        }

        let members: Vec<UserId> = room
            .participants()
            .iter()
            .map(|p| p.user_id().clone())
            .collect();

        room.close();
        // Tombstone first: if the participant sweep fails, the store holds
        // a CLOSED room with stale member rows, never an ACTIVE room with
        // none.
        self.repository.update(&room).await?;
        self.repository.delete_participants(&cmd.room_id).await?;

        for member in &members {
            if let Err(e) = self.cache.evict_participant(&cmd.room_id, member).await {
                warn!(room_id = %cmd.room_id, user_id = %member, error = %e, "Participant cache eviction failed");
            }
        }
        if let Err(e) = self.cache.evict_room(&cmd.room_id).await {
            warn!(room_id = %cmd.room_id, error = %e, "Room cache eviction failed");
        }

        let event = RoomEvent::new(RoomEventType::RoomClosed, cmd.room_id, cmd.user_id.clone());
        if let Err(e) = self.notifier.publish(&event).await {
            warn!(room_id = %cmd.room_id, error = %e, "Failed to publish ROOM_CLOSED event");
        }

        info!(room_id = %cmd.room_id, user_id = %cmd.user_id, "Room closed");

        Ok(CloseRoomResult { room })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{FailingCache, FailingNotifier, FaultyRepository};
    use super::super::{
        CreateRoomCommand, CreateRoomHandler, JoinRoomCommand, JoinRoomHandler,
    };
    use super::*;
    use crate::adapters::{InMemoryRoomCache, InMemoryRoomNotifier, InMemoryRoomRepository};
    use crate::domain::room::{Room, RoomStatus};

    fn user(id: &str) -> UserId {
        UserId::new(id.to_string()).unwrap()
    }

    async fn seeded_room(
        repository: &Arc<InMemoryRoomRepository>,
        members: &[&str],
    ) -> Room {
        let create = CreateRoomHandler::new(
            repository.clone() as Arc<dyn RoomRepository>,
            Arc::new(InMemoryRoomCache::new()),
        );
        let room = create
            .handle(CreateRoomCommand { hoster_user_id: user("alice") })
            .await
            .unwrap()
            .room;

        let join = JoinRoomHandler::new(
            repository.clone() as Arc<dyn RoomRepository>,
            Arc::new(InMemoryRoomCache::new()),
            Arc::new(InMemoryRoomNotifier::new()),
        );
        for member in members {
            join.handle(JoinRoomCommand {
                room_id: *room.room_id(),
                password: room.join_secret().as_str().to_string(),
                user_id: user(member),
            })
            .await
            .unwrap();
        }
        room
    }

    #[tokio::test]
    async fn host_close_tombstones_room_and_clears_members() {
        let repository = Arc::new(InMemoryRoomRepository::new());
        let cache = Arc::new(InMemoryRoomCache::new());
        let notifier = Arc::new(InMemoryRoomNotifier::new());
        let room = seeded_room(&repository, &["bob", "carol"]).await;

        let handler = CloseRoomHandler::new(repository.clone(), cache.clone(), notifier.clone());
        let result = handler
            .handle(CloseRoomCommand {
                room_id: *room.room_id(),
                user_id: user("alice"),
            })
            .await
            .unwrap();
        assert_eq!(result.message(), "Room closed successfully");
        assert_eq!(result.room.status(), RoomStatus::Closed);
        assert!(result.room.participants().is_empty());

        let stored = repository
            .find_with_participants(room.room_id())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status(), RoomStatus::Closed);
        assert!(stored.participants().is_empty());

        let events = notifier.published_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, RoomEventType::RoomClosed);
    }

    #[tokio::test]
    async fn non_host_close_is_forbidden() {
        let repository = Arc::new(InMemoryRoomRepository::new());
        let notifier = Arc::new(InMemoryRoomNotifier::new());
        let room = seeded_room(&repository, &["bob"]).await;

        let handler = CloseRoomHandler::new(
            repository.clone(),
            Arc::new(InMemoryRoomCache::new()),
            notifier.clone(),
        );
        let result = handler
            .handle(CloseRoomCommand {
                room_id: *room.room_id(),
                user_id: user("bob"),
            })
            .await;

        assert_eq!(result.unwrap_err(), RoomError::Forbidden);
        assert_eq!(repository.participant_count(room.room_id()), Some(2));
        assert_eq!(notifier.event_count(), 0);
    }

    #[tokio::test]
    async fn closing_unknown_room_is_not_found() {
        let handler = CloseRoomHandler::new(
            Arc::new(InMemoryRoomRepository::new()),
            Arc::new(InMemoryRoomCache::new()),
            Arc::new(InMemoryRoomNotifier::new()),
        );
        let result = handler
            .handle(CloseRoomCommand {
                room_id: RoomId::new(),
                user_id: user("alice"),
            })
            .await;
        assert!(matches!(result, Err(RoomError::NotFound(_))));
    }

    #[tokio::test]
    async fn closed_room_rejects_joins() {
        let repository = Arc::new(InMemoryRoomRepository::new());
        let room = seeded_room(&repository, &[]).await;

        let close = CloseRoomHandler::new(
            repository.clone(),
            Arc::new(InMemoryRoomCache::new()),
            Arc::new(InMemoryRoomNotifier::new()),
        );
        close
            .handle(CloseRoomCommand {
                room_id: *room.room_id(),
                user_id: user("alice"),
            })
            .await
            .unwrap();

        let join = JoinRoomHandler::new(
            repository.clone() as Arc<dyn RoomRepository>,
            Arc::new(InMemoryRoomCache::new()),
            Arc::new(InMemoryRoomNotifier::new()),
        );
        let result = join
            .handle(JoinRoomCommand {
                room_id: *room.room_id(),
                password: room.join_secret().as_str().to_string(),
                user_id: user("bob"),
            })
            .await;
        assert_eq!(result.unwrap_err(), RoomError::Forbidden);
    }

    #[tokio::test]
    async fn failed_participant_sweep_still_leaves_room_closed() {
        let repository = Arc::new(InMemoryRoomRepository::new());
        let room = seeded_room(&repository, &["bob"]).await;

        let mut faulty = FaultyRepository::wrapping(repository.clone());
        faulty.fail_delete_participants = true;
        let handler = CloseRoomHandler::new(
            Arc::new(faulty),
            Arc::new(InMemoryRoomCache::new()),
            Arc::new(InMemoryRoomNotifier::new()),
        );
        let result = handler
            .handle(CloseRoomCommand {
                room_id: *room.room_id(),
                user_id: user("alice"),
            })
            .await;

        assert!(matches!(result, Err(RoomError::Storage(_))));
        // The tombstone lands before the sweep: a partial failure must
        // never leave an ACTIVE room with no members.
        let stored = repository.find_by_id(room.room_id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), RoomStatus::Closed);
    }

    #[tokio::test]
    async fn cache_and_notifier_failures_do_not_fail_close() {
        let repository = Arc::new(InMemoryRoomRepository::new());
        let room = seeded_room(&repository, &["bob"]).await;

        let handler = CloseRoomHandler::new(
            repository.clone(),
            Arc::new(FailingCache),
            Arc::new(FailingNotifier),
        );
        let result = handler
            .handle(CloseRoomCommand {
                room_id: *room.room_id(),
                user_id: user("alice"),
            })
            .await;

        assert!(result.is_ok());
        let stored = repository.find_by_id(room.room_id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), RoomStatus::Closed);
    }
}

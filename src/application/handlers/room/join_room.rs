//! JoinRoomHandler - command handler for password-gated joins.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::foundation::{RoomId, UserId};
use crate::domain::room::{Room, RoomError, RoomEvent, RoomEventType};
use crate::ports::{ParticipantInsert, RoomCache, RoomNotifier, RoomRepository};

/// Command to join a room.
#[derive(Debug, Clone)]
pub struct JoinRoomCommand {
    pub room_id: RoomId,
    pub password: String,
    pub user_id: UserId,
}

/// Result of a successful join.
#[derive(Debug, Clone)]
pub struct JoinRoomResult {
    pub room: Room,
}

impl JoinRoomResult {
    /// Transport-facing success message.
    pub fn message(&self) -> &'static str {
        "User joined room successfully"
    }
}

/// Handler for joining rooms.
///
/// This is a read-modify-write over two records (Room, Participant). The
/// participant insert relies on the store's (user, room) uniqueness to stay
/// correct under concurrent joins; if the subsequent room update fails, the
/// handler compensates by removing the participant it just inserted so no
/// orphan record survives.
pub struct JoinRoomHandler {
    repository: Arc<dyn RoomRepository>,
    cache: Arc<dyn RoomCache>,
    notifier: Arc<dyn RoomNotifier>,
}

impl JoinRoomHandler {
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

    pub async fn handle(&self, cmd: JoinRoomCommand) -> Result<JoinRoomResult, RoomError> {
        // Authoritative read with the participant set materialized; the
        // duplicate pre-check below depends on a complete set.
        let mut room = self
            .repository
            .find_with_participants(&cmd.room_id)
            .await?
            .ok_or(RoomError::NotFound(cmd.room_id))?;

        // Secret and status checks are merged into one outcome so callers
        // cannot probe which failed.
        if !room.verify_join(&cmd.password) {
            return Err(RoomError::Forbidden);
        }

        let participant = room.admit(cmd.user_id.clone())?;

        // The store constraint is the real duplicate guard; a concurrent
        // join that won the race surfaces here as the same conflict.
        match self.repository.insert_participant(&participant).await? {
            ParticipantInsert::Inserted => {}
            ParticipantInsert::Duplicate => {
                return Err(RoomError::AlreadyJoined { user_id: cmd.user_id });
            }
        }

        if let Err(e) = self.repository.update(&room).await {
            // Compensating cleanup: do not leave an orphan participant
            // behind a half-applied join.
            if let Err(cleanup) = self
                .repository
                .delete_participant(&cmd.room_id, &cmd.user_id)
                .await
            {
                warn!(
                    room_id = %cmd.room_id,
                    user_id = %cmd.user_id,
                    error = %cleanup,
                    "Failed to clean up participant after join rollback"
                );
            }
            return Err(e.into());
        }

        if let Err(e) = self.cache.put_room(&room).await {
            warn!(room_id = %room.room_id(), error = %e, "Cache write after join failed");
        }
        if let Err(e) = self.cache.put_participant(&participant).await {
            warn!(
                room_id = %room.room_id(),
                user_id = %cmd.user_id,
                error = %e,
                "Participant cache write after join failed"
            );
        }

        let event = RoomEvent::new(RoomEventType::UserJoined, cmd.room_id, cmd.user_id.clone());
        if let Err(e) = self.notifier.publish(&event).await {
            warn!(room_id = %cmd.room_id, error = %e, "Failed to publish USER_JOINED event");
        }

        info!(room_id = %cmd.room_id, user_id = %cmd.user_id, "User joined room");

        Ok(JoinRoomResult { room })
    }
}

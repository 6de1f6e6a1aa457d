//! LeaveRoomHandler - departures, host succession, and empty-room teardown.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::foundation::{RoomId, UserId};
use crate::domain::room::{RoomError, RoomEvent, RoomEventType};
use crate::ports::{RoomCache, RoomNotifier, RoomRepository};

/// Command for a user leaving a room.
#[derive(Debug, Clone)]
pub struct LeaveRoomCommand {
    pub room_id: RoomId,
    pub user_id: UserId,
}

/// What the departure did to the room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaveOutcome {
    /// A non-host member left; the room is unchanged otherwise.
    Left,
    /// The host left and the given member was promoted.
    HostChanged(UserId),
    /// The last member left and the room was deleted.
    RoomDeleted,
}

/// Result of a processed departure.
#[derive(Debug, Clone)]
pub struct LeaveRoomResult {
    pub outcome: LeaveOutcome,
}

impl LeaveRoomResult {
    /// Transport-facing success message.
    pub fn message(&self) -> &'static str {
        match self.outcome {
            LeaveOutcome::RoomDeleted => "Room deleted as it is empty",
            _ => "User left room successfully",
        }
    }
}

/// Handler for leaving rooms.
///
/// Exactly one of three branches runs per departure, and each branch emits
/// exactly one event: USER_LEFT for an ordinary member, HOST_CHANGE when the
/// host leaves and a successor is promoted, ROOM_CLOSED when the last member
/// leaves and the room is torn down.
pub struct LeaveRoomHandler {
    repository: Arc<dyn RoomRepository>,
    cache: Arc<dyn RoomCache>,
    notifier: Arc<dyn RoomNotifier>,
}

impl LeaveRoomHandler {
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

    pub async fn handle(&self, cmd: LeaveRoomCommand) -> Result<LeaveRoomResult, RoomError> {
        let mut room = self
            .repository
            .find_with_participants(&cmd.room_id)
            .await?
            .ok_or(RoomError::NotFound(cmd.room_id))?;

        let was_host = room.is_host(&cmd.user_id);
        room.remove(&cmd.user_id)?;

        if room.is_empty() {
            // Last member out: the room has no reason to exist. Cascade
            // removes any straggler participant rows.
            self.repository.delete(&cmd.room_id).await?;
            self.evict(&cmd.room_id, &cmd.user_id).await;
            self.publish(RoomEventType::RoomClosed, cmd.room_id, cmd.user_id.clone())
                .await;
            info!(room_id = %cmd.room_id, "Room deleted after last member left");
            return Ok(LeaveRoomResult {
                outcome: LeaveOutcome::RoomDeleted,
            });
        }

        let outcome = if was_host {
            // Succession is deterministic: longest-tenured member wins,
            // user id breaks joined_at ties. The handoff is a single
            // atomic store operation so a failure can never leave two
            // HOSTER records behind.
            let successor = room
                .promote_next_host()
                .ok_or_else(|| RoomError::Storage("no successor in non-empty room".to_string()))?;
            self.repository
                .transfer_host(&room, &successor, &cmd.user_id)
                .await?;
            LeaveOutcome::HostChanged(successor.user_id().clone())
        } else {
            self.repository
                .delete_participant(&cmd.room_id, &cmd.user_id)
                .await?;
            self.repository.update(&room).await?;
            LeaveOutcome::Left
        };

        self.evict(&cmd.room_id, &cmd.user_id).await;
        if let Err(e) = self.cache.put_room(&room).await {
            warn!(room_id = %cmd.room_id, error = %e, "Cache write after leave failed");
        }

        match &outcome {
            LeaveOutcome::HostChanged(successor) => {
                self.publish(RoomEventType::HostChange, cmd.room_id, successor.clone())
                    .await;
            }
            LeaveOutcome::Left => {
                self.publish(RoomEventType::UserLeft, cmd.room_id, cmd.user_id.clone())
                    .await;
            }
            LeaveOutcome::RoomDeleted => unreachable!(),
        }

        info!(room_id = %cmd.room_id, user_id = %cmd.user_id, "User left room");

        Ok(LeaveRoomResult { outcome })
    }

    async fn evict(&self, room_id: &RoomId, user_id: &UserId) {
        if let Err(e) = self.cache.evict_participant(room_id, user_id).await {
            warn!(room_id = %room_id, user_id = %user_id, error = %e, "Participant cache eviction failed");
        }
        if let Err(e) = self.cache.evict_room(room_id).await {
            warn!(room_id = %room_id, error = %e, "Room cache eviction failed");
        }
    }

    async fn publish(&self, event_type: RoomEventType, room_id: RoomId, user_id: UserId) {
        let event = RoomEvent::new(event_type, room_id, user_id);
        if let Err(e) = self.notifier.publish(&event).await {
            warn!(room_id = %room_id, error = %e, "Failed to publish room event");
        }
    }
}

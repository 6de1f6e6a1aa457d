//! Participant entity - a user's membership record within one room.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{RoomId, Timestamp, UserId};

/// Role a participant holds within a room.
///
/// Exactly one participant of an active non-empty room holds `Hoster`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Hoster,
    Participant,
}

/// A user's membership in a room.
///
/// Identified by the (user, room) pair, unique per room. The room reference
/// is a stored identifier, not a live back-link; the Room owns the canonical
/// participant list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    user_id: UserId,
    room_id: RoomId,
    role: Role,
    joined_at: Timestamp,
}

impl Participant {
    /// Creates a membership record for the given user and room.
    pub fn new(user_id: UserId, room_id: RoomId, role: Role, joined_at: Timestamp) -> Self {
        Self {
            user_id,
            room_id,
            role,
            joined_at,
        }
    }

    /// Returns the user identifier.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Returns the identifier of the owning room.
    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// Returns the participant's role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns when the participant joined.
    pub fn joined_at(&self) -> &Timestamp {
        &self.joined_at
    }

    /// Whether this participant holds the host role.
    pub fn is_hoster(&self) -> bool {
        self.role == Role::Hoster
    }

    pub(crate) fn promote(&mut self) {
        self.role = Role::Hoster;
    }
}

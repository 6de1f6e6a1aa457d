//! Room-specific error types.

use crate::domain::foundation::{DomainError, ErrorCode, RoomId, UserId};

/// Errors produced by room lifecycle operations.
///
/// `NotFound`, `Forbidden` and `AlreadyJoined` are deliberate business
/// outcomes the transports map to response codes; `Storage` is an
/// adapter-level failure and is always propagated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomError {
    /// Room was not found.
    NotFound(RoomId),
    /// No membership record for the user in the room.
    ParticipantNotFound { room_id: RoomId, user_id: UserId },
    /// Wrong join secret, inactive room, or wrong host. Deliberately one
    /// variant so callers cannot probe which check failed.
    Forbidden,
    /// The user is already a participant of the room.
    AlreadyJoined { user_id: UserId },
    /// Store adapter failure.
    Storage(String),
}

impl RoomError {
    pub fn not_found(room_id: RoomId) -> Self {
        RoomError::NotFound(room_id)
    }

    pub fn storage(message: impl Into<String>) -> Self {
        RoomError::Storage(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            RoomError::NotFound(_) => ErrorCode::RoomNotFound,
            RoomError::ParticipantNotFound { .. } => ErrorCode::ParticipantNotFound,
            RoomError::Forbidden => ErrorCode::Forbidden,
            RoomError::AlreadyJoined { .. } => ErrorCode::DuplicateParticipant,
            RoomError::Storage(_) => ErrorCode::DatabaseError,
        }
    }

    pub fn message(&self) -> String {
        match self {
            RoomError::NotFound(room_id) => format!("Room not found: {}", room_id),
            RoomError::ParticipantNotFound { room_id, user_id } => {
                format!("User {} is not in room {}", user_id, room_id)
            }
            RoomError::Forbidden => "Invalid password or room not active".to_string(),
            RoomError::AlreadyJoined { user_id } => {
                format!("User {} is already in the room", user_id)
            }
            RoomError::Storage(msg) => format!("Storage error: {}", msg),
        }
    }
}

impl std::fmt::Display for RoomError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for RoomError {}

impl From<DomainError> for RoomError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::Forbidden => RoomError::Forbidden,
            _ => RoomError::Storage(err.to_string()),
        }
    }
}

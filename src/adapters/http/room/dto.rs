//! HTTP DTOs for room endpoints.
//!
//! These types decouple the HTTP API from domain types, allowing independent evolution.

use serde::{Deserialize, Serialize};

use crate::domain::room::{Participant, Role, Room, RoomStatus};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to create a new room.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRoomRequest {
    pub hoster: String,
}

/// Request to join a room with its password.
#[derive(Debug, Clone, Deserialize)]
pub struct JoinRoomRequest {
    pub room_id: String,
    pub password: String,
    pub user_id: String,
}

/// Request to leave a room.
#[derive(Debug, Clone, Deserialize)]
pub struct LeaveRoomRequest {
    pub room_id: String,
    pub user_id: String,
}

/// Request to update a room; the body id must match the path id.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRoomRequest {
    pub room_id: String,
}

/// Query parameters for closing a room.
#[derive(Debug, Clone, Deserialize)]
pub struct CloseRoomParams {
    pub room_id: String,
    pub hoster: String,
}

/// Query parameters for participant lookup.
#[derive(Debug, Clone, Deserialize)]
pub struct ParticipantParams {
    pub room_id: String,
    pub user_id: String,
}

/// Query parameters for host-initiated participant removal.
#[derive(Debug, Clone, Deserialize)]
pub struct KickParticipantParams {
    pub room_id: String,
    pub user_id: String,
    pub hoster: String,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Response to room creation: the id and the secret the host hands out.
#[derive(Debug, Clone, Serialize)]
pub struct CreateRoomResponse {
    pub room_id: String,
    pub join_password: String,
}

/// Generic message-bearing success response.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Room view for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct RoomResponse {
    pub room_id: String,
    pub hoster_user_id: String,
    pub join_password: String,
    pub status: RoomStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Room> for RoomResponse {
    fn from(room: &Room) -> Self {
        Self {
            room_id: room.room_id().to_string(),
            hoster_user_id: room.hoster_user_id().to_string(),
            join_password: room.join_secret().as_str().to_string(),
            status: room.status(),
            created_at: room.created_at().as_datetime().to_rfc3339(),
            updated_at: room.updated_at().as_datetime().to_rfc3339(),
        }
    }
}

/// Participant view for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct ParticipantResponse {
    pub user_id: String,
    pub room_id: String,
    pub role: Role,
    pub joined_at: String,
}

impl From<&Participant> for ParticipantResponse {
    fn from(participant: &Participant) -> Self {
        Self {
            user_id: participant.user_id().to_string(),
            room_id: participant.room_id().to_string(),
            role: participant.role(),
            joined_at: participant.joined_at().as_datetime().to_rfc3339(),
        }
    }
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new("FORBIDDEN", message)
    }
}

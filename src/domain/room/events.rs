//! Lifecycle notifications emitted after successful state transitions.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{RoomId, UserId};

/// The kind of membership transition that occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomEventType {
    UserJoined,
    UserLeft,
    HostChange,
    RoomClosed,
}

/// Best-effort notification payload, published to a single well-known
/// channel after each successful transition.
///
/// Delivery is fire-and-forget: the membership transition is the source of
/// truth, not the notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomEvent {
    pub event_type: RoomEventType,
    pub room_id: RoomId,
    pub user_id: UserId,
}

impl RoomEvent {
    pub fn new(event_type: RoomEventType, room_id: RoomId, user_id: UserId) -> Self {
        Self {
            event_type,
            room_id,
            user_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_event_type_in_screaming_snake_case() {
        let event = RoomEvent::new(
            RoomEventType::UserJoined,
            RoomId::new(),
            UserId::new("bob".to_string()).unwrap(),
        );
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event_type"], "USER_JOINED");
        assert_eq!(json["user_id"], "bob");
    }

    #[test]
    fn roundtrips_through_json() {
        let event = RoomEvent::new(
            RoomEventType::HostChange,
            RoomId::new(),
            UserId::new("carol".to_string()).unwrap(),
        );
        let json = serde_json::to_string(&event).unwrap();
        let back: RoomEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}

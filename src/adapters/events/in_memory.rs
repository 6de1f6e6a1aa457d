//! In-memory notifier for tests.
//!
//! Records published events for assertions; doubles as a no-op notifier
//! when nothing inspects the recording.
//!
//! # Panics
//!
//! Methods panic if the internal lock is poisoned; test-only code.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::domain::foundation::DomainError;
use crate::domain::room::{RoomEvent, RoomEventType};
use crate::ports::RoomNotifier;

/// In-memory implementation of RoomNotifier.
#[derive(Default)]
pub struct InMemoryRoomNotifier {
    published: Mutex<Vec<RoomEvent>>,
}

impl InMemoryRoomNotifier {
    /// Creates an empty notifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all published events (for test assertions).
    pub fn published_events(&self) -> Vec<RoomEvent> {
        self.published
            .lock()
            .expect("InMemoryRoomNotifier: lock poisoned")
            .clone()
    }

    /// Returns events of a specific type.
    pub fn events_of_type(&self, event_type: RoomEventType) -> Vec<RoomEvent> {
        self.published_events()
            .into_iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Returns the number of published events.
    pub fn event_count(&self) -> usize {
        self.published
            .lock()
            .expect("InMemoryRoomNotifier: lock poisoned")
            .len()
    }

    /// Clears recorded events (for test isolation).
    pub fn clear(&self) {
        self.published
            .lock()
            .expect("InMemoryRoomNotifier: lock poisoned")
            .clear();
    }
}

#[async_trait]
impl RoomNotifier for InMemoryRoomNotifier {
    async fn publish(&self, event: &RoomEvent) -> Result<(), DomainError> {
        self.published
            .lock()
            .expect("InMemoryRoomNotifier: lock poisoned")
            .push(event.clone());
        Ok(())
    }
}

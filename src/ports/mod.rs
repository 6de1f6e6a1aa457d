//! Ports - interfaces the membership engine depends on.
//!
//! Adapters implement these against PostgreSQL, Redis, and in-memory
//! backends; the engine only ever sees the traits.

mod room_cache;
mod room_notifier;
mod room_repository;

pub use room_cache::RoomCache;
pub use room_notifier::RoomNotifier;
pub use room_repository::{ParticipantInsert, RoomRepository};

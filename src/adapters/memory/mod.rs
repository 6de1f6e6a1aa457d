//! In-memory store adapter for tests and deterministic wiring.

mod room_repository;

pub use room_repository::InMemoryRoomRepository;

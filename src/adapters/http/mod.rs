//! HTTP adapters - REST API implementations.

pub mod room;

pub use room::room_router;
pub use room::RoomAppState;

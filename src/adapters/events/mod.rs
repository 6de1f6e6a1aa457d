//! Notifier adapters implementing the RoomNotifier port.

mod in_memory;
mod redis;

pub use in_memory::InMemoryRoomNotifier;
pub use redis::RedisRoomNotifier;

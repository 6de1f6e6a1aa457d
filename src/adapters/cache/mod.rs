//! Cache adapters implementing the RoomCache port.

mod in_memory;
mod redis;

pub use in_memory::InMemoryRoomCache;
pub use redis::RedisRoomCache;

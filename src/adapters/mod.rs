//! Adapters - concrete implementations of the ports plus the transports.

pub mod cache;
pub mod events;
pub mod grpc;
pub mod http;
pub mod memory;
pub mod postgres;

pub use cache::{InMemoryRoomCache, RedisRoomCache};
pub use events::{InMemoryRoomNotifier, RedisRoomNotifier};
pub use memory::InMemoryRoomRepository;
pub use postgres::PostgresRoomRepository;

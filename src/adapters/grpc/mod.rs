//! gRPC adapters - tonic implementations of the room RPC surface.

pub mod room_service;

pub use room_service::{proto, RoomGrpcService};

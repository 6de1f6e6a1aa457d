//! HTTP adapter for room endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    CloseRoomParams, CreateRoomRequest, CreateRoomResponse, ErrorResponse, JoinRoomRequest,
    KickParticipantParams, LeaveRoomRequest, MessageResponse, ParticipantParams,
    ParticipantResponse, RoomResponse, UpdateRoomRequest,
};
pub use handlers::RoomAppState;
pub use routes::room_router;

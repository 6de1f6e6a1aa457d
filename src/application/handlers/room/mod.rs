//! Room lifecycle handlers - the membership engine.
//!
//! Each operation is a handler with an explicit command or query struct.
//! Handlers own the cache/store consistency policy: the store is written
//! authoritatively, results are mirrored into the cache (failures logged,
//! non-fatal), and exactly one notification is emitted per successful
//! transition (publish failures logged and swallowed).

#[cfg(test)]
pub(crate) mod test_support;

mod access;
mod close_room;
mod create_room;
mod delete_room;
mod get_participant;
mod get_room;
mod join_room;
mod leave_room;
mod list_rooms;
mod update_room;

pub use access::RoomAccessPolicy;
pub use close_room::{CloseRoomCommand, CloseRoomHandler, CloseRoomResult};
pub use create_room::{CreateRoomCommand, CreateRoomHandler, CreateRoomResult};
pub use delete_room::{DeleteRoomCommand, DeleteRoomHandler};
pub use get_participant::{GetParticipantHandler, GetParticipantQuery};
pub use get_room::{GetRoomHandler, GetRoomQuery, GetRoomWithParticipantsHandler};
pub use join_room::{JoinRoomCommand, JoinRoomHandler, JoinRoomResult};
pub use leave_room::{LeaveOutcome, LeaveRoomCommand, LeaveRoomHandler, LeaveRoomResult};
pub use list_rooms::ListRoomsHandler;
pub use update_room::{UpdateRoomCommand, UpdateRoomHandler};

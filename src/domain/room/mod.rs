//! Room aggregate and its supporting types.

mod aggregate;
mod errors;
mod events;
mod join_secret;
mod participant;

pub use aggregate::{Room, RoomStatus};
pub use errors::RoomError;
pub use events::{RoomEvent, RoomEventType};
pub use join_secret::JoinSecret;
pub use participant::{Participant, Role};

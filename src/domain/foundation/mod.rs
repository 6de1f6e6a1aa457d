//! Foundation types shared across the domain layer.

mod errors;
mod ids;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{RoomId, UserId};
pub use timestamp::Timestamp;

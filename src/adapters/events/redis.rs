//! Redis pub/sub notifier for production deployments.
//!
//! Publishes the JSON event payload to a single well-known channel.
//! Subscribers are unspecified downstream consumers; delivery is
//! best-effort and the engine swallows failures.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::room::RoomEvent;
use crate::ports::RoomNotifier;

/// Redis pub/sub implementation of RoomNotifier.
#[derive(Clone)]
pub struct RedisRoomNotifier {
    conn: MultiplexedConnection,
    channel: String,
}

impl RedisRoomNotifier {
    /// Creates a notifier publishing to the given channel.
    pub fn new(conn: MultiplexedConnection, channel: impl Into<String>) -> Self {
        Self {
            conn,
            channel: channel.into(),
        }
    }

    /// Returns the channel events are published to.
    pub fn channel(&self) -> &str {
        &self.channel
    }
}

#[async_trait]
impl RoomNotifier for RedisRoomNotifier {
    async fn publish(&self, event: &RoomEvent) -> Result<(), DomainError> {
        let payload = serde_json::to_string(event).map_err(|e| {
            DomainError::new(
                ErrorCode::PublishError,
                format!("Failed to encode event: {}", e),
            )
        })?;

        let mut conn = self.conn.clone();
        conn.publish::<_, _, ()>(&self.channel, payload)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::PublishError,
                    format!("Failed to publish event: {}", e),
                )
            })?;
        Ok(())
    }
}

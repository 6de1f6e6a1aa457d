//! Room notifier port - fire-and-forget lifecycle announcements.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::room::RoomEvent;

/// Port for publishing lifecycle notifications.
///
/// Delivery is best-effort: the engine logs and swallows publish failures,
/// the triggering operation still reports success. Injected at handler
/// construction; the in-memory implementation doubles as a no-op for tests.
#[async_trait]
pub trait RoomNotifier: Send + Sync {
    /// Publish a single event to the well-known channel.
    async fn publish(&self, event: &RoomEvent) -> Result<(), DomainError>;
}

use std::sync::Arc;

use async_trait::async_trait;

use super::Result;

/// Handles one delivery from the event channel.
///
/// Returning `Ok` acknowledges the message. Returning `Err` leaves it
/// unacknowledged and the transport redelivers it, so handlers must be
/// idempotent or tolerate duplicate application.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, payload: &[u8]) -> Result<()>;
}

/// At-least-once, topic-addressed publish/subscribe transport.
#[async_trait]
pub trait EventChannel: Send + Sync {
    /// Publishes a message to a topic. Returns once the transport has
    /// accepted the message; consumer processing is not awaited.
    async fn publish(&self, topic: &str, payload: &[u8]) -> Result<()>;

    /// Registers a durable, named subscription on a topic. Messages a prior
    /// handler invocation did not acknowledge are redelivered to the same
    /// `subscriber_id`.
    async fn subscribe(
        &self,
        topic: &str,
        subscriber_id: &str,
        handler: Arc<dyn EventHandler>,
    ) -> Result<()>;
}

//! Subscriber draining the audit topic into the tracing pipeline.

use async_trait::async_trait;

use recipehub_core::events::{AuditEvent, EventHandler, Result as ChannelResult};

/// Durable subscriber id for the log sink.
pub const LOG_SINK_SUBSCRIBER: &str = "LogSubscriber";

/// Writes each audit event as a structured log line. Always acknowledges:
/// an audit record is not worth a redelivery loop.
pub struct LogSink;

#[async_trait]
impl EventHandler for LogSink {
    async fn handle(&self, payload: &[u8]) -> ChannelResult<()> {
        match serde_json::from_slice::<AuditEvent>(payload) {
            Ok(event) => {
                tracing::info!(
                    target: "recipehub::audit",
                    action = %event.action,
                    recipe_id = event.recipe_id,
                    service = %event.service,
                    timestamp = %event.timestamp,
                    "{}",
                    event.message
                );
            }
            Err(err) => {
                tracing::warn!(error = %err, "Discarding undecodable audit event");
            }
        }
        Ok(())
    }
}

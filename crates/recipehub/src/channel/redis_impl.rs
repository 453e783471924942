//! Redis Streams event channel.
//!
//! Each topic is a stream; each subscriber id is a consumer group on that
//! stream, created from id `0` so the group covers messages published
//! before the first subscription. A delivery is acknowledged with XACK only
//! after the handler returns `Ok`; rejected deliveries stay in the group's
//! pending list and are re-read on the next pending sweep, which gives
//! at-least-once delivery across restarts.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use redis::streams::{StreamReadOptions, StreamReadReply};
use redis::AsyncCommands;

use recipehub_core::events::{ChannelError, EventChannel, EventHandler, Result};

/// Stream field holding the message bytes.
const PAYLOAD_FIELD: &str = "payload";

/// How long one blocking read waits before the pending sweep runs again.
const BLOCK_MILLIS: usize = 5_000;

/// Messages fetched per read.
const READ_COUNT: usize = 10;

/// Pause after a transport error before the read loop continues.
const ERROR_BACKOFF: Duration = Duration::from_secs(1);

/// Redis Streams channel backend.
///
/// Publishes over a pooled connection manager; each subscription loop gets
/// its own dedicated connection so its blocking reads cannot stall
/// publishes.
pub struct RedisChannel {
    client: redis::Client,
    conn: redis::aio::ConnectionManager,
}

impl RedisChannel {
    /// Creates a new Redis channel connection.
    ///
    /// # Errors
    ///
    /// Returns `ChannelError::ConnectionFailed` if the connection cannot be
    /// established.
    pub async fn new(url: &str) -> Result<Self> {
        let client = redis::Client::open(url).map_err(map_connect_error)?;
        let conn = redis::aio::ConnectionManager::new(client.clone())
            .await
            .map_err(map_connect_error)?;
        Ok(Self { client, conn })
    }
}

fn map_connect_error(err: redis::RedisError) -> ChannelError {
    ChannelError::ConnectionFailed(err.to_string())
}

#[async_trait]
impl EventChannel for RedisChannel {
    async fn publish(&self, topic: &str, payload: &[u8]) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.xadd::<_, _, _, _, ()>(topic, "*", &[(PAYLOAD_FIELD, payload)])
            .await
            .map_err(|e| ChannelError::PublishFailed(e.to_string()))?;
        Ok(())
    }

    async fn subscribe(
        &self,
        topic: &str,
        subscriber_id: &str,
        handler: Arc<dyn EventHandler>,
    ) -> Result<()> {
        let mut conn = self.conn.clone();

        // Create the consumer group from the start of the stream so the
        // subscription is durable from first registration. BUSYGROUP means
        // the group already exists, which is the normal restart path.
        let created: std::result::Result<(), redis::RedisError> = conn
            .xgroup_create_mkstream(topic, subscriber_id, "0")
            .await;
        if let Err(err) = created {
            if err.code() != Some("BUSYGROUP") {
                return Err(ChannelError::SubscribeFailed(err.to_string()));
            }
        }

        tokio::spawn(run_consumer(
            self.client.clone(),
            topic.to_string(),
            subscriber_id.to_string(),
            handler,
        ));

        tracing::info!(topic, subscriber_id, "Consumer group registered");
        Ok(())
    }
}

/// Reads the stream on behalf of one consumer group, alternating between a
/// sweep of this consumer's pending (previously unacknowledged) entries and
/// a blocking read of new ones. Runs on its own connection.
async fn run_consumer(
    client: redis::Client,
    topic: String,
    group: String,
    handler: Arc<dyn EventHandler>,
) {
    let consumer = format!("{}-worker", group);

    let mut conn = loop {
        match client.get_multiplexed_async_connection().await {
            Ok(conn) => break conn,
            Err(err) => {
                tracing::error!(topic = %topic, group = %group, error = %err, "Consumer connection failed");
                tokio::time::sleep(ERROR_BACKOFF).await;
            }
        }
    };

    loop {
        // Unacknowledged deliveries first, so a rejected message is retried
        // before new traffic.
        if let Err(err) = read_batch(&mut conn, &topic, &group, &consumer, "0", &handler).await {
            tracing::error!(topic = %topic, group = %group, error = %err, "Pending sweep failed");
            tokio::time::sleep(ERROR_BACKOFF).await;
            continue;
        }

        if let Err(err) = read_batch(&mut conn, &topic, &group, &consumer, ">", &handler).await {
            tracing::error!(topic = %topic, group = %group, error = %err, "Stream read failed");
            tokio::time::sleep(ERROR_BACKOFF).await;
        }
    }
}

/// Reads one batch at `cursor` ("0" for pending entries, ">" for new ones)
/// and feeds it to the handler, acknowledging what the handler accepts.
async fn read_batch(
    conn: &mut redis::aio::MultiplexedConnection,
    topic: &str,
    group: &str,
    consumer: &str,
    cursor: &str,
    handler: &Arc<dyn EventHandler>,
) -> std::result::Result<(), redis::RedisError> {
    let mut options = StreamReadOptions::default()
        .group(group, consumer)
        .count(READ_COUNT);
    if cursor == ">" {
        options = options.block(BLOCK_MILLIS);
    }

    let reply: StreamReadReply = conn.xread_options(&[topic], &[cursor], &options).await?;

    for key in reply.keys {
        for entry in key.ids {
            let Some(payload) = entry.get::<Vec<u8>>(PAYLOAD_FIELD) else {
                // Malformed entry; acknowledge so it cannot wedge the group.
                tracing::warn!(topic, id = %entry.id, "Stream entry without payload field");
                conn.xack::<_, _, _, ()>(topic, group, &[&entry.id]).await?;
                continue;
            };

            match handler.handle(&payload).await {
                Ok(()) => {
                    conn.xack::<_, _, _, ()>(topic, group, &[&entry.id]).await?;
                }
                Err(err) => {
                    // Left pending; the next sweep redelivers it.
                    tracing::warn!(topic, id = %entry.id, error = %err, "Delivery rejected, left pending");
                }
            }
        }
    }

    Ok(())
}

//! In-process event channel.
//!
//! Each subscription gets its own bounded work queue and a worker task that
//! feeds deliveries to the handler. A delivery the handler rejects is
//! retried in place with a short pause, up to [`MAX_DELIVERY_ATTEMPTS`];
//! after that it is dropped with an error log. Queues only exist from the
//! moment of subscription, so publishes to a topic nobody has subscribed to
//! yet are logged and discarded.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, RwLock};

use recipehub_core::events::{ChannelError, EventChannel, EventHandler, Result};

/// Queue capacity per subscription.
const QUEUE_CAPACITY: usize = 1024;

/// How many times a delivery is attempted before it is dropped.
const MAX_DELIVERY_ATTEMPTS: u32 = 5;

/// Pause between delivery attempts.
const RETRY_DELAY: Duration = Duration::from_millis(100);

type Subscriptions = HashMap<String, HashMap<String, mpsc::Sender<Vec<u8>>>>;

/// In-process channel backed by per-subscription tokio mpsc queues.
#[derive(Clone, Default)]
pub struct MemoryChannel {
    // topic -> subscriber_id -> queue
    subscriptions: Arc<RwLock<Subscriptions>>,
}

impl MemoryChannel {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventChannel for MemoryChannel {
    async fn publish(&self, topic: &str, payload: &[u8]) -> Result<()> {
        let subscriptions = self.subscriptions.read().await;
        let Some(queues) = subscriptions.get(topic) else {
            tracing::warn!(topic, "Publish on topic with no subscribers, discarding");
            return Ok(());
        };

        for (subscriber_id, queue) in queues {
            if queue.send(payload.to_vec()).await.is_err() {
                // Worker task is gone; the process is likely shutting down.
                tracing::warn!(topic, subscriber_id, "Subscriber queue closed");
            }
        }

        Ok(())
    }

    async fn subscribe(
        &self,
        topic: &str,
        subscriber_id: &str,
        handler: Arc<dyn EventHandler>,
    ) -> Result<()> {
        let mut subscriptions = self.subscriptions.write().await;
        let queues = subscriptions.entry(topic.to_string()).or_default();
        if queues.contains_key(subscriber_id) {
            return Err(ChannelError::SubscribeFailed(format!(
                "subscriber '{}' already registered on topic '{}'",
                subscriber_id, topic
            )));
        }

        let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
        queues.insert(subscriber_id.to_string(), tx);

        tokio::spawn(run_worker(
            topic.to_string(),
            subscriber_id.to_string(),
            rx,
            handler,
        ));

        tracing::info!(topic, subscriber_id, "Subscription registered");
        Ok(())
    }
}

/// Drains one subscription queue, retrying rejected deliveries.
async fn run_worker(
    topic: String,
    subscriber_id: String,
    mut rx: mpsc::Receiver<Vec<u8>>,
    handler: Arc<dyn EventHandler>,
) {
    while let Some(payload) = rx.recv().await {
        let mut attempt = 1;
        loop {
            match handler.handle(&payload).await {
                Ok(()) => break,
                Err(err) if attempt < MAX_DELIVERY_ATTEMPTS => {
                    tracing::warn!(
                        topic = %topic,
                        subscriber_id = %subscriber_id,
                        attempt,
                        error = %err,
                        "Delivery rejected, retrying"
                    );
                    attempt += 1;
                    tokio::time::sleep(RETRY_DELAY).await;
                }
                Err(err) => {
                    tracing::error!(
                        topic = %topic,
                        subscriber_id = %subscriber_id,
                        error = %err,
                        "Delivery dropped after {} attempts",
                        MAX_DELIVERY_ATTEMPTS
                    );
                    break;
                }
            }
        }
    }
    tracing::debug!(topic = %topic, subscriber_id = %subscriber_id, "Subscription worker stopped");
}

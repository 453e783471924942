//! The mutation consumer.
//!
//! Subscribed to the mutations topic under a durable id, it applies
//! [`MutationEvent`]s to the store and keeps the cache coherent. Returning
//! `Ok` acknowledges the event; returning `Err` leaves it unacknowledged so
//! the channel redelivers it. Delivery is at-least-once, so every branch
//! here must tolerate seeing the same event twice.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use recipehub_core::cache::{recipe_key, Cache};
use recipehub_core::events::{EventHandler, MutationEvent, Result as ChannelResult};
use recipehub_core::storage::{RecipeRepository, RepositoryError};

use crate::service::refresh_all_recipes;

/// Applies mutation events to the repository and invalidates the cache.
pub struct MutationConsumer {
    repo: Arc<dyn RecipeRepository>,
    cache: Arc<dyn Cache>,
    ttl: Duration,
}

impl MutationConsumer {
    pub fn new(repo: Arc<dyn RecipeRepository>, cache: Arc<dyn Cache>, ttl: Duration) -> Self {
        Self { repo, cache, ttl }
    }

    async fn invalidate(&self, id: i64) {
        if let Err(err) = self.cache.delete(&recipe_key(id)).await {
            tracing::warn!(recipe_id = id, error = %err, "Failed to invalidate recipe cache");
        }
    }

    async fn apply(&self, event: MutationEvent) -> Result<(), RepositoryError> {
        match event {
            MutationEvent::Create { recipe } => {
                let id = self.repo.insert(&recipe).await?;
                // A redelivered create may have left a stale entry under the
                // newly assigned id.
                self.invalidate(id).await;
                tracing::info!(recipe_id = id, "Applied create event");
            }
            MutationEvent::Update { recipe } => {
                let id = recipe.id;
                match self.repo.update(&recipe).await {
                    Ok(()) => {
                        self.invalidate(id).await;
                        tracing::info!(recipe_id = id, "Applied update event");
                    }
                    Err(RepositoryError::NotFound { .. }) => {
                        // The row vanished between publish and delivery, or
                        // this is a redelivery racing a delete. Nothing left
                        // to apply; acknowledge.
                        tracing::warn!(recipe_id = id, "Update event targets a missing recipe");
                        return Ok(());
                    }
                    Err(err) => return Err(err),
                }
            }
            MutationEvent::Delete { id } => {
                match self.repo.delete(id).await {
                    Ok(()) => {
                        self.invalidate(id).await;
                        tracing::info!(recipe_id = id, "Applied delete event");
                    }
                    Err(RepositoryError::NotFound { .. }) => {
                        // Already gone; a redelivered delete is a no-op.
                        tracing::warn!(recipe_id = id, "Delete event targets a missing recipe");
                        return Ok(());
                    }
                    Err(err) => return Err(err),
                }
            }
        }

        refresh_all_recipes(self.repo.as_ref(), self.cache.as_ref(), self.ttl).await
    }
}

#[async_trait]
impl EventHandler for MutationConsumer {
    async fn handle(&self, payload: &[u8]) -> ChannelResult<()> {
        let event: MutationEvent = match serde_json::from_slice(payload) {
            Ok(event) => event,
            Err(err) => {
                // A poison message will never parse on redelivery either;
                // acknowledge it and move on.
                tracing::warn!(error = %err, "Discarding undecodable mutation event");
                return Ok(());
            }
        };

        self.apply(event).await.map_err(|err| {
            tracing::error!(error = %err, "Failed to apply mutation event, leaving unacked");
            recipehub_core::events::ChannelError::HandlerFailed(err.to_string())
        })
    }
}

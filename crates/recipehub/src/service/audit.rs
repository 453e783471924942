//! Audit decorator for the recipe catalog.
//!
//! Wraps any [`RecipeCatalog`] and publishes one best-effort [`AuditEvent`]
//! per operation onto the logs topic. Publish failures are logged and
//! swallowed: the audit path must never change the response returned to the
//! caller. Core service logic stays free of audit calls.

use std::sync::Arc;

use async_trait::async_trait;

use recipehub_core::events::{AuditEvent, EventChannel, LOGS_TOPIC};
use recipehub_core::recipe::{NewRecipe, Recipe, RecipeId};
use recipehub_core::storage::RepositoryError;

use super::{CatalogError, FetchSource, Fetched, RecipeCatalog};

/// A catalog wrapped with fire-and-forget audit publishing.
pub struct Audited<C> {
    inner: C,
    channel: Arc<dyn EventChannel>,
    service_name: String,
}

impl<C: RecipeCatalog> Audited<C> {
    pub fn new(inner: C, channel: Arc<dyn EventChannel>, service_name: impl Into<String>) -> Self {
        Self {
            inner,
            channel,
            service_name: service_name.into(),
        }
    }

    async fn audit(&self, action: &str, recipe_id: Option<RecipeId>, message: String) {
        let event = AuditEvent::now(action, recipe_id, message, self.service_name.clone());
        let payload = match serde_json::to_vec(&event) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::warn!(action, error = %err, "Failed to serialize audit event");
                return;
            }
        };
        if let Err(err) = self.channel.publish(LOGS_TOPIC, &payload).await {
            tracing::warn!(action, error = %err, "Failed to publish audit event");
        }
    }

    fn describe_error(error: &CatalogError) -> String {
        match error {
            CatalogError::Repository(RepositoryError::NotFound { .. }) => {
                "Recipe not found".to_string()
            }
            other => format!("Error: {}", other),
        }
    }
}

#[async_trait]
impl<C: RecipeCatalog> RecipeCatalog for Audited<C> {
    async fn create_recipe(&self, new: NewRecipe) -> Result<RecipeId, CatalogError> {
        let result = self.inner.create_recipe(new).await;
        match &result {
            Ok(id) => {
                self.audit(
                    "CreateRecipe",
                    Some(*id),
                    "Recipe created successfully".to_string(),
                )
                .await;
            }
            Err(err) => {
                self.audit("CreateRecipe", None, Self::describe_error(err))
                    .await;
            }
        }
        result
    }

    async fn get_recipe(&self, id: RecipeId) -> Result<Fetched<Recipe>, CatalogError> {
        let result = self.inner.get_recipe(id).await;
        match &result {
            Ok(fetched) => {
                let message = match fetched.source {
                    FetchSource::Cache => "Cache hit",
                    FetchSource::Store => "Recipe retrieved from database",
                };
                self.audit("GetRecipe", Some(id), message.to_string()).await;
            }
            Err(err) => {
                self.audit("GetRecipe", Some(id), Self::describe_error(err))
                    .await;
            }
        }
        result
    }

    async fn list_recipes(&self) -> Result<Fetched<Vec<Recipe>>, CatalogError> {
        let result = self.inner.list_recipes().await;
        match &result {
            Ok(fetched) => {
                let message = match fetched.source {
                    FetchSource::Cache => "Cache hit for ListRecipes".to_string(),
                    FetchSource::Store => format!("Found {} recipes", fetched.value.len()),
                };
                self.audit("ListRecipes", None, message).await;
            }
            Err(err) => {
                self.audit("ListRecipes", None, Self::describe_error(err))
                    .await;
            }
        }
        result
    }

    async fn update_recipe(&self, recipe: Recipe) -> Result<(), CatalogError> {
        let id = recipe.id;
        let result = self.inner.update_recipe(recipe).await;
        match &result {
            Ok(()) => {
                self.audit(
                    "UpdateRecipe",
                    Some(id),
                    "Recipe updated successfully".to_string(),
                )
                .await;
            }
            Err(err) => {
                self.audit("UpdateRecipe", Some(id), Self::describe_error(err))
                    .await;
            }
        }
        result
    }

    async fn delete_recipe(&self, id: RecipeId) -> Result<(), CatalogError> {
        let result = self.inner.delete_recipe(id).await;
        match &result {
            Ok(()) => {
                self.audit(
                    "DeleteRecipe",
                    Some(id),
                    "Recipe deleted successfully".to_string(),
                )
                .await;
            }
            Err(err) => {
                self.audit("DeleteRecipe", Some(id), Self::describe_error(err))
                    .await;
            }
        }
        result
    }
}

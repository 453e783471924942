//! The query/command service.
//!
//! Reads follow the cache-aside pattern: check the cache first, fall through
//! to the repository on miss, repopulate the cache. Writes always hit the
//! store before the cache so no caller can observe a cache entry for data
//! that failed to persist.

mod audit;
mod catalog;

pub use audit::Audited;
pub use catalog::{CatalogError, FetchSource, Fetched, RecipeCatalog};

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use recipehub_core::cache::{
    all_recipes_key, deserialize_recipe, deserialize_recipes, recipe_key, serialize_recipe,
    serialize_recipes, Cache,
};
use recipehub_core::events::{EventChannel, MutationEvent, MUTATIONS_TOPIC};
use recipehub_core::recipe::{NewRecipe, Recipe, RecipeId};
use recipehub_core::storage::{RecipeRepository, RepositoryError};

/// How update and delete commands are applied.
///
/// Create is always direct: a purely event-sourced create has no way to
/// return a real id to the caller, so the insert happens synchronously in
/// either mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// The service mutates the store and updates the cache within the
    /// request.
    #[default]
    Direct,
    /// The service publishes a mutation event and returns optimistically;
    /// the mutation consumer applies it later.
    Event,
}

/// Recomputes the full listing snapshot from the store and caches it.
///
/// Every mutation path runs this after its store write commits. Cache
/// failures are logged and swallowed: a stale or missing listing entry is
/// repaired by the next read within one TTL window.
pub(crate) async fn refresh_all_recipes(
    repo: &dyn RecipeRepository,
    cache: &dyn Cache,
    ttl: Duration,
) -> Result<(), RepositoryError> {
    let recipes = repo.list_all().await?;
    match serialize_recipes(&recipes) {
        Ok(bytes) => {
            if let Err(err) = cache.set(all_recipes_key(), &bytes, Some(ttl)).await {
                tracing::warn!(error = %err, "Failed to cache recipe listing");
            }
        }
        Err(err) => {
            tracing::warn!(error = %err, "Failed to serialize recipe listing");
        }
    }
    Ok(())
}

/// The query/command service over a repository, a cache, and an event
/// channel.
pub struct RecipeService {
    repo: Arc<dyn RecipeRepository>,
    cache: Arc<dyn Cache>,
    channel: Arc<dyn EventChannel>,
    ttl: Duration,
    write_mode: WriteMode,
}

impl RecipeService {
    pub fn new(
        repo: Arc<dyn RecipeRepository>,
        cache: Arc<dyn Cache>,
        channel: Arc<dyn EventChannel>,
        ttl: Duration,
        write_mode: WriteMode,
    ) -> Self {
        Self {
            repo,
            cache,
            channel,
            ttl,
            write_mode,
        }
    }

    async fn publish_mutation(&self, event: &MutationEvent) -> Result<(), CatalogError> {
        let payload = serde_json::to_vec(event)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        self.channel.publish(MUTATIONS_TOPIC, &payload).await?;
        Ok(())
    }

    /// Fails fast with `NotFound` when the target row does not exist.
    ///
    /// Event-mode commands validate existence before publishing so the
    /// caller sees the error synchronously instead of the consumer silently
    /// dropping the event later.
    async fn require_exists(&self, id: RecipeId) -> Result<(), CatalogError> {
        match self.repo.get(id).await? {
            Some(_) => Ok(()),
            None => Err(RepositoryError::NotFound { id }.into()),
        }
    }
}

#[async_trait]
impl RecipeCatalog for RecipeService {
    async fn create_recipe(&self, new: NewRecipe) -> Result<RecipeId, CatalogError> {
        new.validate()?;

        let id = self.repo.insert(&new).await?;
        let recipe = new.with_id(id);

        // Store write committed; populate the single-entity snapshot.
        match serialize_recipe(&recipe) {
            Ok(bytes) => {
                if let Err(err) = self.cache.set(&recipe_key(id), &bytes, Some(self.ttl)).await {
                    tracing::warn!(recipe_id = id, error = %err, "Failed to cache recipe");
                }
            }
            Err(err) => {
                tracing::warn!(recipe_id = id, error = %err, "Failed to serialize recipe");
            }
        }
        refresh_all_recipes(self.repo.as_ref(), self.cache.as_ref(), self.ttl).await?;

        tracing::debug!(recipe_id = id, "Recipe created");
        Ok(id)
    }

    async fn get_recipe(&self, id: RecipeId) -> Result<Fetched<Recipe>, CatalogError> {
        let cache_key = recipe_key(id);

        // Check cache first; corrupt entries fall through as misses.
        if let Ok(Some(bytes)) = self.cache.get(&cache_key).await {
            match deserialize_recipe(&bytes) {
                Ok(recipe) => {
                    tracing::trace!(recipe_id = id, "Cache hit for recipe");
                    return Ok(Fetched::from_cache(recipe));
                }
                Err(err) => {
                    tracing::warn!(recipe_id = id, error = %err, "Cache entry deserialization failed");
                }
            }
        }

        tracing::trace!(recipe_id = id, "Cache miss for recipe");
        let recipe = self
            .repo
            .get(id)
            .await?
            .ok_or(RepositoryError::NotFound { id })?;

        if let Ok(bytes) = serialize_recipe(&recipe) {
            if let Err(err) = self.cache.set(&cache_key, &bytes, Some(self.ttl)).await {
                tracing::warn!(recipe_id = id, error = %err, "Failed to cache recipe");
            }
        }

        Ok(Fetched::from_store(recipe))
    }

    async fn list_recipes(&self) -> Result<Fetched<Vec<Recipe>>, CatalogError> {
        if let Ok(Some(bytes)) = self.cache.get(all_recipes_key()).await {
            match deserialize_recipes(&bytes) {
                Ok(recipes) => {
                    tracing::trace!(count = recipes.len(), "Cache hit for recipe listing");
                    return Ok(Fetched::from_cache(recipes));
                }
                Err(err) => {
                    tracing::warn!(error = %err, "Listing cache deserialization failed");
                }
            }
        }

        tracing::trace!("Cache miss for recipe listing");
        let recipes = self.repo.list_all().await?;

        // An empty catalog is a valid listing and is cached like any other.
        if let Ok(bytes) = serialize_recipes(&recipes) {
            if let Err(err) = self
                .cache
                .set(all_recipes_key(), &bytes, Some(self.ttl))
                .await
            {
                tracing::warn!(error = %err, "Failed to cache recipe listing");
            }
        }

        Ok(Fetched::from_store(recipes))
    }

    async fn update_recipe(&self, recipe: Recipe) -> Result<(), CatalogError> {
        recipe.fields().validate()?;

        match self.write_mode {
            WriteMode::Direct => {
                self.repo.update(&recipe).await?;

                let cache_key = recipe_key(recipe.id);
                if let Err(err) = self.cache.delete(&cache_key).await {
                    tracing::warn!(recipe_id = recipe.id, error = %err, "Failed to invalidate recipe cache");
                }
                refresh_all_recipes(self.repo.as_ref(), self.cache.as_ref(), self.ttl).await?;

                tracing::debug!(recipe_id = recipe.id, "Recipe updated");
                Ok(())
            }
            WriteMode::Event => {
                self.require_exists(recipe.id).await?;
                let id = recipe.id;
                self.publish_mutation(&MutationEvent::Update { recipe })
                    .await?;
                tracing::debug!(recipe_id = id, "Recipe update published");
                Ok(())
            }
        }
    }

    async fn delete_recipe(&self, id: RecipeId) -> Result<(), CatalogError> {
        match self.write_mode {
            WriteMode::Direct => {
                self.repo.delete(id).await?;

                if let Err(err) = self.cache.delete(&recipe_key(id)).await {
                    tracing::warn!(recipe_id = id, error = %err, "Failed to invalidate recipe cache");
                }
                refresh_all_recipes(self.repo.as_ref(), self.cache.as_ref(), self.ttl).await?;

                tracing::debug!(recipe_id = id, "Recipe deleted");
                Ok(())
            }
            WriteMode::Event => {
                self.require_exists(id).await?;
                self.publish_mutation(&MutationEvent::Delete { id }).await?;
                tracing::debug!(recipe_id = id, "Recipe delete published");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{BrokenCache, MockCache, MockChannel, MockRepository};

    fn sample() -> NewRecipe {
        NewRecipe {
            name: "Borscht".to_string(),
            ingredients: "beet,cabbage".to_string(),
            prep_time: 20,
            cook_time: 60,
            instructions: "Simmer until tender.".to_string(),
        }
    }

    fn service(
        repo: Arc<MockRepository>,
        cache: Arc<MockCache>,
        channel: Arc<MockChannel>,
        mode: WriteMode,
    ) -> RecipeService {
        RecipeService::new(repo, cache, channel, Duration::from_secs(600), mode)
    }

    #[tokio::test]
    async fn test_create_then_get_returns_same_fields() {
        let repo = Arc::new(MockRepository::new());
        let cache = Arc::new(MockCache::new());
        let channel = Arc::new(MockChannel::new());
        let svc = service(repo, cache, channel, WriteMode::Direct);

        let id = svc.create_recipe(sample()).await.unwrap();
        assert!(id > 0);

        let fetched = svc.get_recipe(id).await.unwrap();
        assert_eq!(fetched.value.fields(), sample());
        assert_eq!(fetched.value.id, id);
    }

    #[tokio::test]
    async fn test_create_rejects_empty_name() {
        let repo = Arc::new(MockRepository::new());
        let cache = Arc::new(MockCache::new());
        let channel = Arc::new(MockChannel::new());
        let svc = service(repo.clone(), cache, channel, WriteMode::Direct);

        let mut recipe = sample();
        recipe.name = String::new();
        let result = svc.create_recipe(recipe).await;
        assert!(matches!(result, Err(CatalogError::Validation(_))));
        assert_eq!(repo.insert_calls(), 0);
    }

    #[tokio::test]
    async fn test_get_warm_key_makes_no_store_call() {
        let repo = Arc::new(MockRepository::new());
        let cache = Arc::new(MockCache::new());
        let channel = Arc::new(MockChannel::new());
        let svc = service(repo.clone(), cache, channel, WriteMode::Direct);

        let id = svc.create_recipe(sample()).await.unwrap();
        let calls_after_create = repo.get_calls();

        // Create populated the cache; this read must not touch the store.
        let fetched = svc.get_recipe(id).await.unwrap();
        assert_eq!(fetched.source, FetchSource::Cache);
        assert_eq!(repo.get_calls(), calls_after_create);
    }

    #[tokio::test]
    async fn test_get_miss_populates_cache() {
        let repo = Arc::new(MockRepository::new());
        let cache = Arc::new(MockCache::new());
        let channel = Arc::new(MockChannel::new());

        let id = repo.seed(sample()).await;
        let svc = service(repo.clone(), cache.clone(), channel, WriteMode::Direct);

        let fetched = svc.get_recipe(id).await.unwrap();
        assert_eq!(fetched.source, FetchSource::Store);
        assert!(cache.contains(&recipe_key(id)).await);

        // Second read is served from cache.
        let fetched = svc.get_recipe(id).await.unwrap();
        assert_eq!(fetched.source, FetchSource::Cache);
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let repo = Arc::new(MockRepository::new());
        let cache = Arc::new(MockCache::new());
        let channel = Arc::new(MockChannel::new());
        let svc = service(repo, cache.clone(), channel, WriteMode::Direct);

        let result = svc.get_recipe(9999).await;
        assert!(matches!(
            result,
            Err(CatalogError::Repository(RepositoryError::NotFound { id: 9999 }))
        ));
        assert!(!cache.contains(&recipe_key(9999)).await);
    }

    #[tokio::test]
    async fn test_corrupt_cache_entry_falls_through_to_store() {
        let repo = Arc::new(MockRepository::new());
        let cache = Arc::new(MockCache::new());
        let channel = Arc::new(MockChannel::new());

        let id = repo.seed(sample()).await;
        cache.put_raw(&recipe_key(id), b"not valid json").await;

        let svc = service(repo, cache, channel, WriteMode::Direct);
        let fetched = svc.get_recipe(id).await.unwrap();
        assert_eq!(fetched.source, FetchSource::Store);
        assert_eq!(fetched.value.id, id);
    }

    #[tokio::test]
    async fn test_unreachable_cache_serves_reads_from_store() {
        let repo = Arc::new(MockRepository::new());
        let channel = Arc::new(MockChannel::new());

        let id = repo.seed(sample()).await;
        let svc = RecipeService::new(
            repo,
            Arc::new(BrokenCache),
            channel,
            Duration::from_secs(600),
            WriteMode::Direct,
        );

        // Cache errors on every operation; reads and writes still succeed.
        let fetched = svc.get_recipe(id).await.unwrap();
        assert_eq!(fetched.source, FetchSource::Store);

        let fetched = svc.list_recipes().await.unwrap();
        assert_eq!(fetched.value.len(), 1);

        svc.delete_recipe(id).await.unwrap();
    }

    #[tokio::test]
    async fn test_list_empty_store_is_empty_listing() {
        let repo = Arc::new(MockRepository::new());
        let cache = Arc::new(MockCache::new());
        let channel = Arc::new(MockChannel::new());
        let svc = service(repo, cache, channel, WriteMode::Direct);

        let fetched = svc.list_recipes().await.unwrap();
        assert!(fetched.value.is_empty());

        // The empty listing was cached.
        let fetched = svc.list_recipes().await.unwrap();
        assert_eq!(fetched.source, FetchSource::Cache);
    }

    #[tokio::test]
    async fn test_delete_removes_cache_entry() {
        let repo = Arc::new(MockRepository::new());
        let cache = Arc::new(MockCache::new());
        let channel = Arc::new(MockChannel::new());
        let svc = service(repo, cache.clone(), channel, WriteMode::Direct);

        let id = svc.create_recipe(sample()).await.unwrap();
        assert!(cache.contains(&recipe_key(id)).await);

        svc.delete_recipe(id).await.unwrap();
        // Removed, not left to expire.
        assert!(!cache.contains(&recipe_key(id)).await);

        let result = svc.get_recipe(id).await;
        assert!(matches!(
            result,
            Err(CatalogError::Repository(RepositoryError::NotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn test_update_missing_id_leaves_no_cache_entry() {
        let repo = Arc::new(MockRepository::new());
        let cache = Arc::new(MockCache::new());
        let channel = Arc::new(MockChannel::new());
        let svc = service(repo, cache.clone(), channel, WriteMode::Direct);

        let result = svc.update_recipe(sample().with_id(9999)).await;
        assert!(matches!(
            result,
            Err(CatalogError::Repository(RepositoryError::NotFound { id: 9999 }))
        ));
        assert!(!cache.contains(&recipe_key(9999)).await);
    }

    #[tokio::test]
    async fn test_update_refreshes_listing() {
        let repo = Arc::new(MockRepository::new());
        let cache = Arc::new(MockCache::new());
        let channel = Arc::new(MockChannel::new());
        let svc = service(repo, cache, channel, WriteMode::Direct);

        let id = svc.create_recipe(sample()).await.unwrap();

        let mut updated = sample().with_id(id);
        updated.name = "Green borscht".to_string();
        svc.update_recipe(updated.clone()).await.unwrap();

        let fetched = svc.list_recipes().await.unwrap();
        assert_eq!(fetched.source, FetchSource::Cache);
        assert_eq!(fetched.value, vec![updated]);
    }

    #[tokio::test]
    async fn test_event_mode_update_publishes_and_defers() {
        let repo = Arc::new(MockRepository::new());
        let cache = Arc::new(MockCache::new());
        let channel = Arc::new(MockChannel::new());

        let id = repo.seed(sample()).await;
        let svc = service(repo.clone(), cache, channel.clone(), WriteMode::Event);

        let mut updated = sample().with_id(id);
        updated.cook_time = 90;
        svc.update_recipe(updated.clone()).await.unwrap();

        // Store untouched; the event carries the mutation.
        assert_eq!(repo.get(id).await.unwrap().unwrap().cook_time, 60);
        let published = channel.published(MUTATIONS_TOPIC).await;
        assert_eq!(published.len(), 1);
        let event: MutationEvent = serde_json::from_slice(&published[0]).unwrap();
        assert_eq!(event, MutationEvent::Update { recipe: updated });
    }

    #[tokio::test]
    async fn test_event_mode_fails_fast_on_missing_target() {
        let repo = Arc::new(MockRepository::new());
        let cache = Arc::new(MockCache::new());
        let channel = Arc::new(MockChannel::new());
        let svc = service(repo, cache, channel.clone(), WriteMode::Event);

        let result = svc.delete_recipe(9999).await;
        assert!(matches!(
            result,
            Err(CatalogError::Repository(RepositoryError::NotFound { id: 9999 }))
        ));
        assert!(channel.published(MUTATIONS_TOPIC).await.is_empty());
    }

    #[tokio::test]
    async fn test_event_mode_create_still_returns_real_id() {
        let repo = Arc::new(MockRepository::new());
        let cache = Arc::new(MockCache::new());
        let channel = Arc::new(MockChannel::new());
        let svc = service(repo.clone(), cache, channel, WriteMode::Event);

        // Create is direct in either mode.
        let id = svc.create_recipe(sample()).await.unwrap();
        assert!(id > 0);
        assert!(repo.get(id).await.unwrap().is_some());
    }
}

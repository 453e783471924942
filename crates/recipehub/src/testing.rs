//! Shared test doubles: an instrumented repository, a plain map cache, and a
//! recording channel. Only compiled for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use recipehub_core::cache::{Cache, CacheError, Result as CacheResult};
use recipehub_core::events::{
    ChannelError, EventChannel, EventHandler, Result as ChannelResult,
};
use recipehub_core::recipe::{NewRecipe, Recipe, RecipeId};
use recipehub_core::storage::{RecipeRepository, RepositoryError, Result as RepoResult};

/// In-memory repository that counts calls, for asserting that warm cache
/// reads never reach the store.
pub struct MockRepository {
    rows: RwLock<HashMap<RecipeId, Recipe>>,
    next_id: AtomicI64,
    insert_calls: AtomicUsize,
    get_calls: AtomicUsize,
}

impl MockRepository {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
            insert_calls: AtomicUsize::new(0),
            get_calls: AtomicUsize::new(0),
        }
    }

    /// Inserts directly, bypassing the counters.
    pub async fn seed(&self, new: NewRecipe) -> RecipeId {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.rows.write().await.insert(id, new.with_id(id));
        id
    }

    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }

    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecipeRepository for MockRepository {
    async fn migrate(&self) -> RepoResult<()> {
        Ok(())
    }

    async fn insert(&self, recipe: &NewRecipe) -> RepoResult<RecipeId> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.rows.write().await.insert(id, recipe.clone().with_id(id));
        Ok(id)
    }

    async fn get(&self, id: RecipeId) -> RepoResult<Option<Recipe>> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn update(&self, recipe: &Recipe) -> RepoResult<()> {
        let mut rows = self.rows.write().await;
        if !rows.contains_key(&recipe.id) {
            return Err(RepositoryError::NotFound { id: recipe.id });
        }
        rows.insert(recipe.id, recipe.clone());
        Ok(())
    }

    async fn delete(&self, id: RecipeId) -> RepoResult<()> {
        let mut rows = self.rows.write().await;
        if rows.remove(&id).is_none() {
            return Err(RepositoryError::NotFound { id });
        }
        Ok(())
    }

    async fn list_all(&self) -> RepoResult<Vec<Recipe>> {
        let rows = self.rows.read().await;
        let mut recipes: Vec<Recipe> = rows.values().cloned().collect();
        recipes.sort_by_key(|r| r.id);
        Ok(recipes)
    }
}

/// Map-backed cache without TTL enforcement (tests never wait out a TTL).
pub struct MockCache {
    store: RwLock<HashMap<String, Vec<u8>>>,
}

impl MockCache {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.store.read().await.contains_key(key)
    }

    /// Plants raw bytes, e.g. a corrupt entry.
    pub async fn put_raw(&self, key: &str, value: &[u8]) {
        self.store
            .write()
            .await
            .insert(key.to_string(), value.to_vec());
    }
}

#[async_trait]
impl Cache for MockCache {
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        Ok(self.store.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &[u8], _ttl: Option<Duration>) -> CacheResult<()> {
        self.store
            .write()
            .await
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        self.store.write().await.remove(key);
        Ok(())
    }
}

/// Cache whose every operation fails, for fail-open assertions.
pub struct BrokenCache;

#[async_trait]
impl Cache for BrokenCache {
    async fn get(&self, _key: &str) -> CacheResult<Option<Vec<u8>>> {
        Err(CacheError::ConnectionFailed("cache down".to_string()))
    }

    async fn set(&self, _key: &str, _value: &[u8], _ttl: Option<Duration>) -> CacheResult<()> {
        Err(CacheError::ConnectionFailed("cache down".to_string()))
    }

    async fn delete(&self, _key: &str) -> CacheResult<()> {
        Err(CacheError::ConnectionFailed("cache down".to_string()))
    }
}

/// Channel that records published payloads per topic and delivers nothing.
pub struct MockChannel {
    messages: RwLock<HashMap<String, Vec<Vec<u8>>>>,
}

impl MockChannel {
    pub fn new() -> Self {
        Self {
            messages: RwLock::new(HashMap::new()),
        }
    }

    pub async fn published(&self, topic: &str) -> Vec<Vec<u8>> {
        self.messages
            .read()
            .await
            .get(topic)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl EventChannel for MockChannel {
    async fn publish(&self, topic: &str, payload: &[u8]) -> ChannelResult<()> {
        self.messages
            .write()
            .await
            .entry(topic.to_string())
            .or_default()
            .push(payload.to_vec());
        Ok(())
    }

    async fn subscribe(
        &self,
        _topic: &str,
        _subscriber_id: &str,
        _handler: Arc<dyn EventHandler>,
    ) -> ChannelResult<()> {
        Ok(())
    }
}

/// Channel whose every publish fails, for best-effort-audit assertions.
pub struct FailingChannel;

#[async_trait]
impl EventChannel for FailingChannel {
    async fn publish(&self, _topic: &str, _payload: &[u8]) -> ChannelResult<()> {
        Err(ChannelError::PublishFailed("broker unreachable".to_string()))
    }

    async fn subscribe(
        &self,
        _topic: &str,
        _subscriber_id: &str,
        _handler: Arc<dyn EventHandler>,
    ) -> ChannelResult<()> {
        Err(ChannelError::SubscribeFailed("broker unreachable".to_string()))
    }
}

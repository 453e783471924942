//! Application state.
//!
//! Defines the shared state passed to all request handlers: the catalog
//! (the audited service) plus the raw backend handles the boot sequence and
//! the background consumers need. Backend combinations are selected at
//! compile time via feature flags.

use std::sync::Arc;

use recipehub_core::cache::Cache;
use recipehub_core::events::EventChannel;
use recipehub_core::storage::RecipeRepository;

use crate::config::Config;
use crate::service::{Audited, RecipeCatalog, RecipeService};

// Storage features: exactly one must be enabled
#[cfg(all(feature = "sqlite", feature = "inmemory"))]
compile_error!("Cannot enable both 'sqlite' and 'inmemory' storage features");

#[cfg(not(any(feature = "sqlite", feature = "inmemory")))]
compile_error!("Must enable exactly one storage feature: 'sqlite' or 'inmemory'");

// Cache features: exactly one must be enabled
#[cfg(all(feature = "memory", feature = "redis"))]
compile_error!("Cannot enable both 'memory' and 'redis' cache features");

#[cfg(not(any(feature = "memory", feature = "redis")))]
compile_error!("Must enable exactly one cache feature: 'memory' or 'redis'");

// Channel features: exactly one must be enabled
#[cfg(all(feature = "chan-memory", feature = "chan-redis"))]
compile_error!("Cannot enable both 'chan-memory' and 'chan-redis' channel features");

#[cfg(not(any(feature = "chan-memory", feature = "chan-redis")))]
compile_error!("Must enable exactly one channel feature: 'chan-memory' or 'chan-redis'");

/// Service name stamped on every audit event.
pub const SERVICE_NAME: &str = "RecipesService";

/// Shared application state.
///
/// Cloned for each request handler. Handlers only touch `catalog`; the raw
/// backend handles exist for the boot sequence (migrations, consumer
/// subscriptions).
#[derive(Clone)]
pub struct AppState {
    /// The audited recipe catalog handlers call into.
    pub catalog: Arc<dyn RecipeCatalog>,
    /// Raw repository, for boot migrations and the mutation consumer.
    pub repo: Arc<dyn RecipeRepository>,
    /// Raw cache, for the mutation consumer.
    pub cache: Arc<dyn Cache>,
    /// Event channel, for consumer subscriptions at boot.
    pub channel: Arc<dyn EventChannel>,
}

impl AppState {
    fn build(
        repo: Arc<dyn RecipeRepository>,
        cache: Arc<dyn Cache>,
        channel: Arc<dyn EventChannel>,
        config: &Config,
    ) -> Self {
        let service = RecipeService::new(
            repo.clone(),
            cache.clone(),
            channel.clone(),
            config.cache_ttl(),
            config.write_mode,
        );
        let catalog = Arc::new(Audited::new(service, channel.clone(), SERVICE_NAME));

        Self {
            catalog,
            repo,
            cache,
            channel,
        }
    }
}

// ============================================================================
// Factory functions for different backend combinations
// ============================================================================

#[cfg(all(feature = "inmemory", feature = "memory", feature = "chan-memory"))]
mod inmemory_memory {
    use super::*;
    use crate::cache::memory::MemoryCache;
    use crate::channel::memory::MemoryChannel;
    use crate::storage::InMemoryRepository;

    impl AppState {
        /// Creates AppState with in-memory storage, cache, and channel.
        /// Useful for development without any external dependencies.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let repo = Arc::new(InMemoryRepository::new());
            let cache = Arc::new(MemoryCache::new(config.cache_max_entries));
            let channel = Arc::new(MemoryChannel::new());

            Ok(Self::build(repo, cache, channel, config))
        }
    }
}

#[cfg(all(feature = "sqlite", feature = "memory", feature = "chan-memory"))]
mod sqlite_memory {
    use super::*;
    use crate::cache::memory::MemoryCache;
    use crate::channel::memory::MemoryChannel;
    use crate::storage::SqliteRepository;

    impl AppState {
        /// Creates AppState with SQLite storage, in-memory cache and channel.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let repo = Arc::new(SqliteRepository::new(&config.sqlite_path).await?);
            let cache = Arc::new(MemoryCache::new(config.cache_max_entries));
            let channel = Arc::new(MemoryChannel::new());

            Ok(Self::build(repo, cache, channel, config))
        }
    }
}

#[cfg(all(feature = "sqlite", feature = "redis", feature = "chan-memory"))]
mod sqlite_redis_chanmemory {
    use super::*;
    use crate::cache::redis_impl::RedisCache;
    use crate::channel::memory::MemoryChannel;
    use crate::storage::SqliteRepository;

    impl AppState {
        /// Creates AppState with SQLite storage, Redis cache, and in-memory
        /// channel.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let repo = Arc::new(SqliteRepository::new(&config.sqlite_path).await?);
            let cache = Arc::new(RedisCache::new(&config.redis_url).await?);
            let channel = Arc::new(MemoryChannel::new());

            Ok(Self::build(repo, cache, channel, config))
        }
    }
}

#[cfg(all(feature = "sqlite", feature = "redis", feature = "chan-redis"))]
mod sqlite_redis_chanredis {
    use super::*;
    use crate::cache::redis_impl::RedisCache;
    use crate::channel::redis_impl::RedisChannel;
    use crate::storage::SqliteRepository;

    impl AppState {
        /// Creates AppState with SQLite storage, Redis cache, and Redis
        /// Streams channel.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let repo = Arc::new(SqliteRepository::new(&config.sqlite_path).await?);
            let cache = Arc::new(RedisCache::new(&config.redis_url).await?);
            let channel = Arc::new(RedisChannel::new(&config.redis_url).await?);

            Ok(Self::build(repo, cache, channel, config))
        }
    }
}

// ============================================================================
// Test support - provides Default implementation for unit tests
// ============================================================================

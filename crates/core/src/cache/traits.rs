use std::time::Duration;

use async_trait::async_trait;

use super::Result;

/// Trait for basic cache operations.
///
/// Values are opaque bytes; serialization lives in
/// [`super::serialization`]. `set` overwrites unconditionally
/// (last-writer-wins, no version check) and `delete` of an absent key is a
/// no-op, not an error.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Gets a value from the cache by key. Returns `None` on miss or after
    /// the entry's TTL has elapsed.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Sets a value in the cache with an optional TTL.
    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()>;

    /// Deletes a value from the cache by key.
    async fn delete(&self, key: &str) -> Result<()>;
}

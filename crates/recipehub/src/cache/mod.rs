//! Cache backend implementations.
//!
//! Concrete implementations of the cache trait defined in
//! `recipehub_core::cache`, selected at compile time via feature flags.
//!
//! # Feature Flags
//!
//! - `memory` (default): In-memory cache with LRU eviction
//! - `redis`: Redis cache using the redis crate
//!
//! These features are mutually exclusive - only one cache backend can be
//! enabled at a time.

#[cfg(all(feature = "memory", feature = "redis"))]
compile_error!(
    "Features 'memory' and 'redis' are mutually exclusive. \
    Enable only one cache backend at a time."
);

#[cfg(not(any(feature = "memory", feature = "redis")))]
compile_error!(
    "No cache backend selected. Enable 'memory' or 'redis' feature. \
    Example: cargo build -p recipehub --features memory"
);

#[cfg(feature = "memory")]
pub mod memory;

#[cfg(feature = "redis")]
pub mod redis_impl;

#[cfg(feature = "memory")]
#[allow(unused_imports)]
pub use memory::MemoryCache;

#[cfg(feature = "redis")]
#[allow(unused_imports)]
pub use redis_impl::RedisCache;

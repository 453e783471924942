//! Event channel implementations.
//!
//! Concrete implementations of the channel traits defined in
//! `recipehub_core::events`, selected at compile time via feature flags.
//!
//! # Feature Flags
//!
//! - `chan-memory` (default): In-process work queues, for development and
//!   tests
//! - `chan-redis`: Redis Streams with consumer groups, for deployments
//!   where the consumer runs in a separate process
//!
//! These features are mutually exclusive - only one channel backend can be
//! enabled at a time.

#[cfg(all(feature = "chan-memory", feature = "chan-redis"))]
compile_error!(
    "Features 'chan-memory' and 'chan-redis' are mutually exclusive. \
    Enable only one channel backend at a time."
);

#[cfg(not(any(feature = "chan-memory", feature = "chan-redis")))]
compile_error!(
    "No channel backend selected. Enable 'chan-memory' or 'chan-redis' feature. \
    Example: cargo build -p recipehub --features chan-memory"
);

#[cfg(feature = "chan-memory")]
pub mod memory;

#[cfg(feature = "chan-redis")]
pub mod redis_impl;

#[cfg(feature = "chan-memory")]
#[allow(unused_imports)]
pub use memory::MemoryChannel;

#[cfg(feature = "chan-redis")]
#[allow(unused_imports)]
pub use redis_impl::RedisChannel;

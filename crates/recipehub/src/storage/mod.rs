//! Storage backend implementations.
//!
//! Concrete implementations of the repository trait defined in
//! `recipehub_core::storage`. The implementations are selected at compile
//! time via feature flags.
//!
//! # Feature Flags
//!
//! - `inmemory` (default): In-memory storage backend, for development and
//!   tests
//! - `sqlite`: SQLite storage backend using `rusqlite` and `tokio-rusqlite`
//!
//! These features are mutually exclusive - only one storage backend can be
//! enabled at a time.

#[cfg(all(feature = "sqlite", feature = "inmemory"))]
compile_error!(
    "Features 'sqlite' and 'inmemory' are mutually exclusive. \
    Enable only one storage backend at a time."
);

#[cfg(not(any(feature = "sqlite", feature = "inmemory")))]
compile_error!(
    "No storage backend selected. Enable 'sqlite' or 'inmemory' feature. \
    Example: cargo build -p recipehub --features sqlite"
);

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "inmemory")]
pub mod inmemory;

#[cfg(feature = "sqlite")]
#[allow(unused_imports)]
pub use sqlite::SqliteRepository;

#[cfg(feature = "inmemory")]
#[allow(unused_imports)]
pub use inmemory::InMemoryRepository;

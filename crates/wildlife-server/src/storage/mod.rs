//! Storage layer
//!
//! Document stores behind the `DocumentStore` port: SQLite (embedded, the
//! default) and an in-memory store backed by DashMap.

pub mod db;
pub mod memory;
pub mod retry;

use std::time::Duration;

pub use db::SqliteDocumentStore;
pub use memory::MemoryDocumentStore;
pub use retry::{connect_with_retry, RetryPolicy};

/// Fixed connection and per-call limits of a store
#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub retry: RetryPolicy,
    /// Bound on a single connection attempt
    pub connect_timeout: Duration,
    /// Bound on the liveness check done before each operation
    pub ping_timeout: Duration,
    /// Bound on each store operation
    pub operation_timeout: Duration,
    pub max_connections: u32,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            connect_timeout: Duration::from_secs(30),
            ping_timeout: Duration::from_secs(5),
            operation_timeout: Duration::from_secs(45),
            max_connections: 5,
        }
    }
}

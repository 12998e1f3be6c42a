//! Shared-store client abstraction
//!
//! Thin interface over the remote key-value store that mediates all
//! inter-process coordination. The Redis implementation is used in
//! production; the in-memory implementation backs tests and local runs.

pub mod memory;
pub mod redis;

pub use self::memory::MemoryStore;
pub use self::redis::{RedisStore, StoreConfig};

use async_trait::async_trait;
use std::time::Duration;

use crate::error::Result;

/// Outcome of a guarded queue push
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// The guard key held the expected value and the item was appended
    Pushed,
    /// The guard key held a different value (or none); nothing was written
    Contested,
}

/// Operations the pool requires from the shared store.
///
/// All coordination safety rests on two conditional primitives: `set_nx`
/// (mutual exclusion without a lock manager) and `guarded_rpush` (write
/// conditioned on a prior read of the guard key). Everything else is plain
/// key/list plumbing.
#[async_trait]
pub trait Store: Send + Sync {
    /// Set `key` to `value` with expiry `ttl`, only if the key is absent.
    /// Returns true iff this call caused the write.
    async fn set_nx(&self, key: &str, value: &str, ttl: Duration) -> Result<bool>;

    /// Read a key's value; `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Refresh a key's TTL. Returns false if the key no longer exists.
    async fn expire(&self, key: &str, ttl: Duration) -> Result<bool>;

    /// Append a value to the tail of a list.
    async fn rpush(&self, key: &str, value: &str) -> Result<()>;

    /// Append `value` to `list_key` only if `guard_key` currently holds
    /// `expected`. A missing guard key counts as contested. The comparison
    /// and the append are atomic with respect to other store clients.
    async fn guarded_rpush(
        &self,
        guard_key: &str,
        expected: &str,
        list_key: &str,
        value: &str,
    ) -> Result<PushOutcome>;

    /// Pop the head of a list, blocking up to `timeout`. `None` means the
    /// wait elapsed with nothing available, which is not an error.
    async fn blpop(&self, key: &str, timeout: Duration) -> Result<Option<String>>;

    /// Read the full contents of a list without modifying it.
    async fn lrange(&self, key: &str) -> Result<Vec<String>>;

    /// Delete a key.
    async fn del(&self, key: &str) -> Result<()>;

    /// Atomically read the full contents of a list and clear it.
    async fn drain_list(&self, key: &str) -> Result<Vec<String>>;
}

//! Producer lease arbitration
//!
//! A single store key is the point of mutual exclusion for the whole pool:
//! its value names the current leader and its TTL bounds how long a crashed
//! leader can block a takeover. Acquisition rides on the store's
//! conditional-set primitive, so no lock manager is involved.

use std::sync::Arc;
use std::time::Duration;

use crate::error::Result;
use crate::store::Store;
use crate::LEASE_KEY;

/// Arbitrates ownership of the producer lease for one process
pub struct LeaseArbiter {
    store: Arc<dyn Store>,
    identity: String,
    ttl: Duration,
}

impl LeaseArbiter {
    /// Create an arbiter bound to this process's identity
    pub fn new(store: Arc<dyn Store>, identity: String, ttl: Duration) -> Self {
        Self {
            store,
            identity,
            ttl,
        }
    }

    /// Try to claim the lease. Returns true iff this call wrote the key,
    /// meaning this process is now the leader. False means some other
    /// identity already holds it.
    pub async fn try_acquire(&self) -> Result<bool> {
        self.store.set_nx(LEASE_KEY, &self.identity, self.ttl).await
    }

    /// Read the lease and compare it to this process's identity. No side
    /// effects.
    pub async fn is_held_by(&self) -> Result<bool> {
        let holder = self.store.get(LEASE_KEY).await?;
        Ok(holder.as_deref() == Some(self.identity.as_str()))
    }

    /// Refresh the lease TTL without checking ownership first.
    ///
    /// Callers must only reach this from a confirmed-leader code path (the
    /// generator role); the per-push guard is what catches a takeover, and
    /// adding an ownership check here would change the observable renewal
    /// timing.
    pub async fn renew(&self) -> Result<()> {
        self.store.expire(LEASE_KEY, self.ttl).await?;
        Ok(())
    }
}

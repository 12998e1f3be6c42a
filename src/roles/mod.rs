//! Pool roles and scheduling
//!
//! Each process runs a fixed-tick loop that is either the generator (the
//! single leased producer) or a reader (consumer and lease contender).

pub mod generator;
pub mod reader;
pub mod scheduler;

pub use scheduler::{Role, RoleScheduler};

use std::sync::Arc;
use std::time::Duration;

use crate::handler::FaultJudge;
use crate::lease::LeaseArbiter;
use crate::store::Store;

/// Timing and behavior knobs for the pool.
///
/// The defaults are the reference cadences; they are not meant to be tuned
/// at runtime, but tests shrink them to keep wall-clock time down.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Producer lease lifetime
    pub lease_ttl: Duration,
    /// How often the generator refreshes the lease
    pub renew_interval: Duration,
    /// How often a reader tries to claim the lease
    pub acquire_interval: Duration,
    /// Bounded wait for the blocking queue pop
    pub poll_timeout: Duration,
    /// Scheduler tick between role invocations
    pub tick_interval: Duration,
    /// Simulated per-item handler latency
    pub handler_latency: Duration,
    /// Probability that a handled item is classified as errored
    pub fault_probability: f64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            lease_ttl: Duration::from_secs(10),
            renew_interval: Duration::from_millis(500),
            acquire_interval: Duration::from_millis(500),
            poll_timeout: Duration::from_millis(1000),
            tick_interval: Duration::from_millis(500),
            handler_latency: Duration::from_millis(1000),
            fault_probability: 0.15,
        }
    }
}

/// Everything a role invocation needs, constructed once per process.
///
/// Identity and the store handle are immutable for the process lifetime;
/// there is no hidden global state.
pub struct PoolContext {
    /// Unique identity minted at process start
    pub identity: String,
    /// Shared store client
    pub store: Arc<dyn Store>,
    /// Lease arbiter bound to this identity
    pub lease: LeaseArbiter,
    /// Fault classifier handed to spawned handlers
    pub judge: Arc<dyn FaultJudge>,
    /// Timing configuration
    pub config: PoolConfig,
}

impl PoolContext {
    /// Build the context for one process
    pub fn new(
        identity: String,
        store: Arc<dyn Store>,
        judge: Arc<dyn FaultJudge>,
        config: PoolConfig,
    ) -> Self {
        let lease = LeaseArbiter::new(store.clone(), identity.clone(), config.lease_ttl);
        Self {
            identity,
            store,
            lease,
            judge,
            config,
        }
    }
}

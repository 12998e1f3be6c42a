//! Foreman - Redis-coordinated process pool with a single leased producer
//!
//! Every process in the pool runs the same binary and alternates between two
//! roles: exactly one holds a TTL lease on the producer key and emits work
//! items onto a shared FIFO queue, while the rest drain the queue and race to
//! take over the lease when it lapses. Coordination happens entirely through
//! the shared store's conditional primitives; processes never talk to each
//! other directly.

pub mod error;
pub mod handler;
pub mod lease;
pub mod metrics;
pub mod roles;
pub mod store;

pub use error::ForemanError;
pub use lease::LeaseArbiter;
pub use roles::{PoolConfig, PoolContext, Role, RoleScheduler};
pub use store::Store;

/// Store key holding the FIFO work queue
pub const QUEUE_KEY: &str = "queue";

/// Store key holding the producer lease; the value is the leader's identity
pub const LEASE_KEY: &str = "generator";

/// Store key holding the accumulated error log
pub const ERRORS_KEY: &str = "errors";

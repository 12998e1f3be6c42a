//! Work item handling
//!
//! Each dequeued item is processed on its own fire-and-forget task: a fixed
//! simulated latency, then a stochastic pass/fail classification. Failed
//! items are appended to the shared error log on a best-effort basis; there
//! is no retry and no bound on in-flight handlers.

use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::metrics::standard::HANDLER_FAULTS;
use crate::store::Store;
use crate::ERRORS_KEY;

/// Decides whether a processed item counts as errored.
///
/// Injectable so tests can force either branch deterministically.
pub trait FaultJudge: Send + Sync {
    fn is_faulty(&self, item: &str) -> bool;
}

/// Classifies items as errored with a fixed probability
pub struct RandomFaults {
    probability: f64,
}

impl RandomFaults {
    /// Create a judge with the given fault probability in `[0, 1]`
    pub fn new(probability: f64) -> Self {
        Self { probability }
    }
}

impl FaultJudge for RandomFaults {
    fn is_faulty(&self, _item: &str) -> bool {
        rand::thread_rng().gen_bool(self.probability)
    }
}

/// Process one dequeued item to completion.
///
/// Never fails: a store error while recording an errored item is logged and
/// the entry is dropped.
pub async fn handle_item(
    store: Arc<dyn Store>,
    judge: Arc<dyn FaultJudge>,
    item: String,
    latency: Duration,
) {
    tokio::time::sleep(latency).await;

    if judge.is_faulty(&item) {
        HANDLER_FAULTS.inc();
        warn!("item {} classified as errored", item);
        if let Err(e) = store.rpush(ERRORS_KEY, &item).await {
            warn!("failed to record errored item {}: {}", item, e);
        }
    }
}

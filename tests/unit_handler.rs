//! Unit tests for item handling and the error log sink

use foreman::error::{ForemanError, Result};
use foreman::handler::{handle_item, RandomFaults};
use foreman::store::{MemoryStore, PushOutcome};
use foreman::{Store, ERRORS_KEY};
use std::sync::Arc;
use std::time::Duration;

const NO_LATENCY: Duration = Duration::from_millis(0);

#[tokio::test]
async fn test_faulty_item_recorded() {
    let store = Arc::new(MemoryStore::new());
    let judge = Arc::new(RandomFaults::new(1.0));

    handle_item(store.clone(), judge, "7".into(), NO_LATENCY).await;

    assert_eq!(store.lrange(ERRORS_KEY).await.unwrap(), vec!["7"]);
}

#[tokio::test]
async fn test_clean_item_not_recorded() {
    let store = Arc::new(MemoryStore::new());
    let judge = Arc::new(RandomFaults::new(0.0));

    handle_item(store.clone(), judge, "7".into(), NO_LATENCY).await;

    assert!(store.lrange(ERRORS_KEY).await.unwrap().is_empty());
}

/// Draining after a batch of faults returns every recorded entry once;
/// an immediate second drain is empty.
#[tokio::test]
async fn test_drain_after_faults() {
    let store = Arc::new(MemoryStore::new());
    let judge = Arc::new(RandomFaults::new(1.0));

    for i in 1..=3 {
        handle_item(store.clone(), judge.clone(), i.to_string(), NO_LATENCY).await;
    }

    assert_eq!(store.drain_list(ERRORS_KEY).await.unwrap(), vec!["1", "2", "3"]);
    assert!(store.drain_list(ERRORS_KEY).await.unwrap().is_empty());
}

/// Store that rejects every append, for the best-effort logging path
struct RejectingStore;

#[async_trait::async_trait]
impl Store for RejectingStore {
    async fn set_nx(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<bool> {
        Ok(false)
    }
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }
    async fn expire(&self, _key: &str, _ttl: Duration) -> Result<bool> {
        Ok(false)
    }
    async fn rpush(&self, _key: &str, _value: &str) -> Result<()> {
        Err(ForemanError::Store {
            message: "append rejected".into(),
        })
    }
    async fn guarded_rpush(
        &self,
        _guard_key: &str,
        _expected: &str,
        _list_key: &str,
        _value: &str,
    ) -> Result<PushOutcome> {
        Ok(PushOutcome::Contested)
    }
    async fn blpop(&self, _key: &str, _timeout: Duration) -> Result<Option<String>> {
        Ok(None)
    }
    async fn lrange(&self, _key: &str) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
    async fn del(&self, _key: &str) -> Result<()> {
        Ok(())
    }
    async fn drain_list(&self, _key: &str) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}

/// A failed error-log append is swallowed, never propagated.
#[tokio::test]
async fn test_append_failure_swallowed() {
    let judge = Arc::new(RandomFaults::new(1.0));

    // completes despite the store rejecting the append
    handle_item(Arc::new(RejectingStore), judge, "7".into(), NO_LATENCY).await;
}

//! In-memory store
//!
//! Implements the store contract against process-local state, with
//! TTL-aware keys and a notify-based blocking pop. Backs the test suite and
//! single-process local runs; never used across process boundaries.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use tokio::sync::{Mutex, Notify};
use tokio::time::Instant;

use super::{PushOutcome, Store};
use crate::error::Result;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn expired(&self) -> bool {
        self.expires_at.is_some_and(|at| at <= Instant::now())
    }
}

#[derive(Default)]
struct State {
    keys: HashMap<String, Entry>,
    lists: HashMap<String, VecDeque<String>>,
}

impl State {
    /// Drop the entry if its TTL has lapsed, then return what is left.
    fn live_entry(&mut self, key: &str) -> Option<&mut Entry> {
        if self.keys.get(key).is_some_and(Entry::expired) {
            self.keys.remove(key);
        }
        self.keys.get_mut(key)
    }
}

/// In-process store with the same semantics as the Redis client
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    arrivals: Notify,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn set_nx(&self, key: &str, value: &str, ttl: Duration) -> Result<bool> {
        let mut state = self.state.lock().await;
        if state.live_entry(key).is_some() {
            return Ok(false);
        }
        state.keys.insert(
            key.into(),
            Entry {
                value: value.into(),
                expires_at: Some(Instant::now() + ttl),
            },
        );
        Ok(true)
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut state = self.state.lock().await;
        Ok(state.live_entry(key).map(|e| e.value.clone()))
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<bool> {
        let mut state = self.state.lock().await;
        match state.live_entry(key) {
            Some(entry) => {
                entry.expires_at = Some(Instant::now() + ttl);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn rpush(&self, key: &str, value: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        state.lists.entry(key.into()).or_default().push_back(value.into());
        self.arrivals.notify_one();
        Ok(())
    }

    async fn guarded_rpush(
        &self,
        guard_key: &str,
        expected: &str,
        list_key: &str,
        value: &str,
    ) -> Result<PushOutcome> {
        let mut state = self.state.lock().await;
        let owned = state
            .live_entry(guard_key)
            .is_some_and(|e| e.value == expected);
        if !owned {
            return Ok(PushOutcome::Contested);
        }
        state
            .lists
            .entry(list_key.into())
            .or_default()
            .push_back(value.into());
        self.arrivals.notify_one();
        Ok(PushOutcome::Pushed)
    }

    async fn blpop(&self, key: &str, timeout: Duration) -> Result<Option<String>> {
        let deadline = Instant::now() + timeout;
        loop {
            {
                let mut state = self.state.lock().await;
                if let Some(item) = state.lists.get_mut(key).and_then(VecDeque::pop_front) {
                    return Ok(Some(item));
                }
            }
            // notify_one stores a permit, so an append between the check
            // above and this wait still wakes us
            if tokio::time::timeout_at(deadline, self.arrivals.notified())
                .await
                .is_err()
            {
                return Ok(None);
            }
        }
    }

    async fn lrange(&self, key: &str) -> Result<Vec<String>> {
        let state = self.state.lock().await;
        Ok(state
            .lists
            .get(key)
            .map(|l| l.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn del(&self, key: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        state.keys.remove(key);
        state.lists.remove(key);
        Ok(())
    }

    async fn drain_list(&self, key: &str) -> Result<Vec<String>> {
        let mut state = self.state.lock().await;
        Ok(state
            .lists
            .remove(key)
            .map(Vec::from)
            .unwrap_or_default())
    }
}

//! Redis store client
//!
//! Async client over a multiplexed connection manager. The guarded queue
//! push runs as a server-side script so the ownership check and the append
//! commit as a single unit; blocking pops use a dedicated connection so they
//! do not stall unrelated commands.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::time::Duration;
use tracing::debug;

use super::{PushOutcome, Store};
use crate::error::{ForemanError, Result};

/// Configuration for the Redis store client
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Redis endpoint URL
    pub url: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".into(),
        }
    }
}

/// Append to the list only while the guard key still holds the caller's
/// value. A missing guard key compares unequal and falls through to 0.
const GUARDED_RPUSH_SCRIPT: &str = r#"
if redis.call('GET', KEYS[1]) == ARGV[1] then
    redis.call('RPUSH', KEYS[2], ARGV[2])
    return 1
end
return 0
"#;

/// Redis-backed store client
pub struct RedisStore {
    conn: ConnectionManager,
    /// Separate connection for blocking pops; BLPOP would otherwise hold up
    /// every command multiplexed onto the shared connection.
    pop_conn: ConnectionManager,
    push_script: redis::Script,
}

impl RedisStore {
    /// Connect to the configured Redis endpoint
    pub async fn connect(config: StoreConfig) -> Result<Self> {
        let client =
            redis::Client::open(config.url.as_str()).map_err(|e| ForemanError::Connection {
                endpoint: config.url.clone(),
                reason: e.to_string(),
            })?;

        let conn = client
            .get_connection_manager()
            .await
            .map_err(|e| ForemanError::Connection {
                endpoint: config.url.clone(),
                reason: e.to_string(),
            })?;
        let pop_conn = client
            .get_connection_manager()
            .await
            .map_err(|e| ForemanError::Connection {
                endpoint: config.url.clone(),
                reason: e.to_string(),
            })?;

        debug!("connected to store at {}", config.url);

        Ok(Self {
            conn,
            pop_conn,
            push_script: redis::Script::new(GUARDED_RPUSH_SCRIPT),
        })
    }
}

fn store_err(e: redis::RedisError) -> ForemanError {
    ForemanError::Store {
        message: e.to_string(),
    }
}

#[async_trait]
impl Store for RedisStore {
    async fn set_nx(&self, key: &str, value: &str, ttl: Duration) -> Result<bool> {
        let mut conn = self.conn.clone();
        let reply: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("NX")
            .arg("PX")
            .arg(ttl.as_millis() as u64)
            .query_async(&mut conn)
            .await
            .map_err(store_err)?;
        Ok(reply.is_some())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await.map_err(store_err)?;
        Ok(value)
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<bool> {
        let mut conn = self.conn.clone();
        let refreshed: bool = conn
            .pexpire(key, ttl.as_millis() as i64)
            .await
            .map_err(store_err)?;
        Ok(refreshed)
    }

    async fn rpush(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: i64 = conn.rpush(key, value).await.map_err(store_err)?;
        Ok(())
    }

    async fn guarded_rpush(
        &self,
        guard_key: &str,
        expected: &str,
        list_key: &str,
        value: &str,
    ) -> Result<PushOutcome> {
        let mut conn = self.conn.clone();
        let pushed: i64 = self
            .push_script
            .key(guard_key)
            .key(list_key)
            .arg(expected)
            .arg(value)
            .invoke_async(&mut conn)
            .await
            .map_err(store_err)?;
        Ok(if pushed == 1 {
            PushOutcome::Pushed
        } else {
            PushOutcome::Contested
        })
    }

    async fn blpop(&self, key: &str, timeout: Duration) -> Result<Option<String>> {
        let mut conn = self.pop_conn.clone();
        let reply: Option<(String, String)> = conn
            .blpop(key, timeout.as_secs_f64())
            .await
            .map_err(store_err)?;
        Ok(reply.map(|(_, value)| value))
    }

    async fn lrange(&self, key: &str) -> Result<Vec<String>> {
        let mut conn = self.conn.clone();
        let items: Vec<String> = conn.lrange(key, 0, -1).await.map_err(store_err)?;
        Ok(items)
    }

    async fn del(&self, key: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: i64 = conn.del(key).await.map_err(store_err)?;
        Ok(())
    }

    async fn drain_list(&self, key: &str) -> Result<Vec<String>> {
        let mut conn = self.conn.clone();
        let (entries,): (Vec<String>,) = redis::pipe()
            .atomic()
            .lrange(key, 0, -1)
            .del(key)
            .ignore()
            .query_async(&mut conn)
            .await
            .map_err(store_err)?;
        Ok(entries)
    }
}

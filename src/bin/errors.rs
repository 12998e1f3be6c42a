//! Error-log maintenance binary
//!
//! Atomically drains the shared error log and prints the collected entries.
//! Exits non-zero if the store cannot be reached or the drain fails.

use foreman::store::{RedisStore, StoreConfig};
use foreman::{Store, ERRORS_KEY};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let store_config = StoreConfig {
        url: std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".into()),
    };

    let store = RedisStore::connect(store_config).await?;
    let entries = store.drain_list(ERRORS_KEY).await?;

    info!("Drained {} error entries", entries.len());
    for entry in entries {
        println!("{}", entry);
    }

    Ok(())
}

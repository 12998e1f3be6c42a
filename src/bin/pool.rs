//! Pool service binary
//!
//! Runs the role loop for one process; every pool member runs this same
//! binary against the same store and the lease decides who produces.

use axum::{routing::get, Router};
use foreman::handler::RandomFaults;
use foreman::roles::{PoolConfig, PoolContext, RoleScheduler};
use foreman::store::{RedisStore, StoreConfig};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    info!("Starting foreman pool process");

    let store_config = StoreConfig {
        url: std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".into()),
    };

    info!("Connecting to store at {}", store_config.url);
    let store = match RedisStore::connect(store_config).await {
        Ok(s) => Arc::new(s),
        Err(e) => {
            error!("Failed to connect to store: {}", e);
            return Err(e.into());
        }
    };

    let identity = uuid::Uuid::new_v4().to_string();
    info!("Process identity {}", identity);

    let config = PoolConfig::default();
    let judge = Arc::new(RandomFaults::new(config.fault_probability));
    let ctx = PoolContext::new(identity, store, judge, config);

    // Metrics endpoint
    tokio::spawn(async move {
        let app = Router::new()
            .route("/metrics", get(|| async { foreman::metrics::gather_metrics() }))
            .layer(CorsLayer::permissive());

        let addr = SocketAddr::from(([0, 0, 0, 0], 9100));
        info!("Metrics endpoint listening on {}", addr);

        if let Err(e) = axum::serve(tokio::net::TcpListener::bind(addr).await.unwrap(), app).await {
            warn!("Metrics server error: {}", e);
        }
    });

    RoleScheduler::new(ctx).run().await;

    Ok(())
}

//! BookWise API Server
//!
//! Run with: cargo run --bin bookwise-api
//!
//! # Configuration
//!
//! Read from the first of `$CONFIG_DIR/bookwise/config.toml`,
//! `/etc/bookwise/config.toml` and `./config.toml`, with environment overrides:
//! - `BOOKWISE_API_HOST`: Host to bind to (default: 0.0.0.0)
//! - `BOOKWISE_API_PORT`: Port to listen on (default: 8090)
//! - `BOOKWISE_SEED_DIR`: Directory with seed JSON files (default: built-in data)
//! - `BOOKWISE_SIMULATE_LATENCY`: Delay operations like a remote service (default: true)
//! - `BOOKWISE_LATENCY_SCALE`: Delay multiplier (default: 1.0)
//! - `BOOKWISE_DEFAULT_BUDGET`: Budget for newly opened months (default: 1000)
//! - `BOOKWISE_LOG_LEVEL`, `BOOKWISE_LOG_FORMAT`: Logging
//! - `RUST_LOG`: Overrides the log filter entirely

use bookwise::api::{serve, AppState};
use bookwise::config::Config;
use bookwise::store::BookStore;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_default();
    bookwise::logging::init(&config.logging);

    tracing::info!("Starting BookWise API server v{}", env!("CARGO_PKG_VERSION"));

    let store_config = config.store.to_store_config();
    match &store_config.seed_dir {
        Some(dir) => tracing::info!("Seed directory: {:?}", dir),
        None => tracing::info!("Using built-in seed data"),
    }
    tracing::info!(
        "Simulated latency: {} (scale {})",
        store_config.latency.enabled,
        store_config.latency.scale
    );

    let store = Arc::new(BookStore::new(store_config)?);
    tracing::info!("Store ready: {}", store.stats().await);

    let state = AppState::new(Arc::clone(&store), config.api.clone());

    tracing::info!("Starting server on {}", config.api.addr());
    serve(state, &config.api).await?;

    tracing::info!("BookWise API server stopped");
    Ok(())
}

use groupie_backend::config;
use groupie_backend::module::artist::{ArtistCache, GroupieApiClient};
use groupie_backend::server::{self, AppState};

use anyhow::Result;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = config::read_config()?;

    // Initialize logging
    let _logging_guard = groupie_backend::logging::init_logging(
        &config.log_dir,
        "groupie-backend",
        &config.log_level,
        config.log_retention_days,
    )?;

    tracing::info!("Groupie Backend starting...");
    tracing::info!("Server will listen on {}", config.server_address());

    if !config.static_dir.is_dir() {
        tracing::error!("Static directory does not exist: {}", config.static_dir.display());
        anyhow::bail!("Static directory not found: {}", config.static_dir.display());
    }
    tracing::info!("Serving static files from: {}", config.static_dir.display());

    let client = GroupieApiClient::new(config.upstream.base_url.clone(), config.request_timeout())?;
    tracing::info!(
        "Upstream API: {} (timeout {}s)",
        client.base_url(),
        config.upstream.request_timeout_secs
    );

    let policy = config.cache_policy();
    tracing::info!(
        "Artist cache TTL {}s, serve stale on error: {}",
        policy.ttl.as_secs(),
        policy.serve_stale_on_error
    );

    let state = AppState {
        cache: Arc::new(ArtistCache::new(Arc::new(client), policy)),
        filter_defaults: config.filters,
    };

    server::serve(config, state).await
}

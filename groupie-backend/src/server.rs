///! HTTP boundary
///!
///! Thin axum handlers over the artist cache: every page request fetches
///! the current snapshot, runs the pure filter/suggestion functions on it
///! and renders the result.
use anyhow::Context;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use groupie_common::{MergedArtist, SearchType};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::module::artist::{
    ArtistCache, FetchError, FilterDefaults, apply_filters, generate_suggestions, parse_filters,
};
use crate::module::renderer;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<ArtistCache>,
    pub filter_defaults: FilterDefaults,
}

/// Error page with a status code
#[derive(Debug)]
pub struct PageError {
    status: StatusCode,
    title: &'static str,
    message: String,
}

impl PageError {
    fn new(status: StatusCode, title: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            title,
            message: message.into(),
        }
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "Page Not Found", message)
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Bad Request", message)
    }
}

impl From<FetchError> for PageError {
    fn from(e: FetchError) -> Self {
        warn!("Serving 503, artist data unavailable: {}", e);
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "Unable to load data",
            "The artist data could not be loaded right now. Please try again later.",
        )
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        (self.status, Html(renderer::render_error(self.title, &self.message))).into_response()
    }
}

pub fn router(state: AppState, static_dir: impl AsRef<std::path::Path>) -> Router {
    Router::new()
        .route("/", get(welcome))
        .route("/home", get(home))
        .route("/artist/{id}", get(artist_page))
        .route("/search", get(search))
        .route("/health", get(health_check))
        .nest_service("/static", ServeDir::new(static_dir.as_ref()))
        .fallback(not_found)
        .with_state(state)
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
}

async fn welcome() -> Html<String> {
    Html(renderer::render_welcome())
}

async fn home(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Html<String>, PageError> {
    let data = state.cache.get_data().await?;
    let filters = parse_filters(&pairs, &state.filter_defaults);
    let matches = apply_filters(&data, &filters);

    tracing::debug!("Home page: {} of {} artists match", matches.len(), data.len());
    Ok(Html(renderer::render_home(&matches, &filters)))
}

async fn artist_page(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Html<String>, PageError> {
    let id = match raw_id.parse::<u32>() {
        Ok(id) if id > 0 => id,
        _ => return Err(PageError::bad_request(format!("'{}' is not a valid artist id", raw_id))),
    };

    let data = state.cache.get_data().await?;
    let entry: &MergedArtist = data
        .iter()
        .find(|entry| entry.id() == id)
        .ok_or_else(|| PageError::not_found(format!("No artist with id {}", id)))?;

    Ok(Html(renderer::render_artist(entry)))
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
    #[serde(rename = "searchType")]
    search_type: Option<String>,
}

async fn search(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Response {
    if params.q.trim().is_empty() {
        return Redirect::to("/home").into_response();
    }

    // An empty selector counts as missing
    let search_type = params
        .search_type
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(SearchType::parse)
        .unwrap_or(SearchType::General);

    match state.cache.get_data().await {
        Ok(data) => Json(generate_suggestions(&data, &params.q, search_type)).into_response(),
        Err(e) => {
            warn!("Suggestions unavailable: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({ "error": "Unable to load data" })),
            )
                .into_response()
        }
    }
}

async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    let cache = state.cache.snapshot_info().await.map(|info| {
        serde_json::json!({
            "artist_count": info.artist_count,
            "fetched_at": info.fetched_at.to_rfc3339(),
            "age_secs": info.age.as_secs(),
            "is_fresh": info.is_fresh,
        })
    });

    Json(serde_json::json!({
        "status": "ok",
        "service": "groupie-backend",
        "version": env!("CARGO_PKG_VERSION"),
        "cache": cache,
    }))
}

async fn not_found() -> PageError {
    PageError::not_found("The page you are looking for does not exist.")
}

/// Bind, serve until Ctrl-C / SIGTERM, then drain in-flight requests
pub async fn serve(config: &AppConfig, state: AppState) -> anyhow::Result<()> {
    let app = router(state, &config.static_dir);

    let address = config.server_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!("HTTP server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

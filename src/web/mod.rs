mod routes;
pub mod pages;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::{PostsApi, PostsClient};
use crate::config::Config;
use crate::feed::Feed;
use crate::modal::ModalHost;
use crate::session::{FileStorage, SessionStore, Storage};

/// Shared application state.
#[derive(Clone, Debug)]
pub struct AppState {
    pub config: Arc<Config>,
    pub session: SessionStore,
    pub modal: ModalHost,
    pub feed: Feed,
}

impl AppState {
    /// Build the state for `config`: an HTTP client for the posts API and a
    /// session file at the configured path.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: Config) -> Result<Self> {
        let api = PostsClient::new(&config).context("Failed to build posts API client")?;
        let storage = FileStorage::new(&config.session_store_path);
        Ok(Self::with_services(config, Arc::new(api), Arc::new(storage)))
    }

    /// Build the state around the given API and storage.
    #[must_use]
    pub fn with_services(
        config: Config,
        api: Arc<dyn PostsApi>,
        storage: Arc<dyn Storage>,
    ) -> Self {
        let session = SessionStore::open(storage);
        let modal = ModalHost::new();
        let feed = Feed::new(api, modal.clone(), session.clone());
        Self {
            config: Arc::new(config),
            session,
            modal,
            feed,
        }
    }
}

/// Start the web server and run until `shutdown` resolves.
///
/// # Errors
///
/// Returns an error if the server fails to start.
pub async fn serve(
    state: AppState,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", state.config.web_host, state.config.web_port)
        .parse()
        .context("Invalid web server address")?;

    let app = create_app(state);

    info!(addr = %addr, "Starting HTTP web server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind web server")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("Web server error")?;

    Ok(())
}

/// Create the main application router.
pub fn create_app(state: AppState) -> Router {
    // Determine static files directory
    let static_dir = find_static_dir();
    info!(static_dir = ?static_dir, "Serving static files");

    Router::new()
        .merge(routes::router())
        .nest_service("/static", ServeDir::new(&static_dir))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Find the static files directory.
///
/// Checks in order:
/// 1. ./static (development)
/// 2. /usr/share/social-feed/static (installed)
/// 3. Falls back to ./static
fn find_static_dir() -> PathBuf {
    let candidates = [
        PathBuf::from("./static"),
        PathBuf::from("/usr/share/social-feed/static"),
    ];

    for path in &candidates {
        if path.exists() && path.is_dir() {
            return path.clone();
        }
    }

    // Default fallback
    PathBuf::from("./static")
}

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use super::api::{self, AppState};
use crate::board::store::{BOARD_FILE_NAME, BoardStore, StoreHandle};

/// Configuration for the authority server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Directory holding the board file
    pub dir: PathBuf,
    pub board_file: String,
    /// Bind on all interfaces and allow cross-origin requests
    pub dev_mode: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 9000,
            dir: PathBuf::from("."),
            board_file: BOARD_FILE_NAME.to_string(),
            dev_mode: false,
        }
    }
}

/// Build the full application router.
pub fn build_router(state: Arc<AppState>) -> Router {
    api::api_router().with_state(state)
}

/// Open the board file and serve it until Ctrl+C.
pub async fn start_server(config: ServerConfig) -> Result<()> {
    let store = BoardStore::open(&config.dir, &config.board_file).with_context(|| {
        format!(
            "Failed to open board {} in {}",
            config.board_file,
            config.dir.display()
        )
    })?;
    let state = Arc::new(AppState {
        store: StoreHandle::new(store),
    });

    let mut app = build_router(state);
    if config.dev_mode {
        app = app.layer(CorsLayer::permissive());
    }

    let host = if config.dev_mode { "0.0.0.0" } else { "127.0.0.1" };
    let addr = format!("{}:{}", host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    let local_addr = listener.local_addr()?;
    info!(%local_addr, "board authority listening");
    println!("bangbang running at http://{}", local_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    println!("Server shut down gracefully.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    println!("\nShutting down...");
}

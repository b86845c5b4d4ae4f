//! HTTP server for the sharing backend.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use crate::config::Config;
use crate::db::Database;
use crate::Result;

use super::handlers::AppState;
use super::router::create_router;

/// Web server for the API.
pub struct WebServer {
    /// `host:port` to bind.
    socket: String,
    /// Fully layered router.
    router: Router,
}

impl WebServer {
    /// Create a new web server with store-backed services.
    pub fn new(config: &Config, db: Database) -> Result<Self> {
        let app_state = Arc::new(AppState::from_config(config, db)?);
        Ok(Self::with_state(config, app_state))
    }

    /// Create a web server around already wired services.
    pub fn with_state(config: &Config, app_state: Arc<AppState>) -> Self {
        Self {
            socket: config.server.socket.clone(),
            router: create_router(app_state, config),
        }
    }

    /// Run the web server until Ctrl-C.
    pub async fn run(self) -> Result<()> {
        let listener = TcpListener::bind(&self.socket).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!("Web server listening on http://{}", local_addr);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Web server stopped");
        Ok(())
    }

    /// Run the server in the background and return the bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> Result<SocketAddr> {
        let listener = TcpListener::bind(&self.socket).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!("Web server listening on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, self.router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

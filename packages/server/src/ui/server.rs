//! Server execution logic.

use std::{future::Future, sync::Arc};

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::{domain::MessagePusher, usecase::ChatSessionCoordinator};

use super::{
    handler::{get_roster, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// WebSocket chat server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(coordinator, message_pusher);
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    /// ChatSessionCoordinator（接続ライフサイクルの窓口）
    coordinator: Arc<ChatSessionCoordinator>,
    /// MessagePusher（WebSocket への配信）
    message_pusher: Arc<dyn MessagePusher>,
}

impl Server {
    /// Create a new Server instance
    ///
    /// # Arguments
    ///
    /// * `coordinator` - Handles join, send and disconnect for every connection
    /// * `message_pusher` - Must be the same pusher the coordinator delivers through
    pub fn new(
        coordinator: Arc<ChatSessionCoordinator>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            coordinator,
            message_pusher,
        }
    }

    /// Build the router with all endpoints.
    pub fn router(&self) -> Router {
        let app_state = Arc::new(AppState {
            coordinator: self.coordinator.clone(),
            message_pusher: self.message_pusher.clone(),
        });

        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/roster", get(get_roster))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state)
    }

    /// Run the WebSocket chat server until Ctrl+C or SIGTERM.
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Connect to: ws://{}/ws?name=<your name>", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await?;
        Ok(())
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        tracing::info!(
            "WebSocket chat server listening on {}",
            listener.local_addr()?
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

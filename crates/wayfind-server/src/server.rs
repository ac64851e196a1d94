//! Site server implementation.

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::services::{ServeDir, ServeFile};

/// Configuration for the site server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Directory containing the built site
    pub dir: PathBuf,

    /// Host to bind to
    pub host: String,

    /// Port to listen on; 0 picks a free port
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("dist"),
            host: "127.0.0.1".to_string(),
            port: 4321,
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Site directory not found: {0}. Run 'wayfind build' first.")]
    MissingDir(PathBuf),

    #[error("Invalid address {0}")]
    InvalidAddress(String),

    #[error("Failed to bind to {0}: {1}")]
    BindError(String, String),

    #[error("Server error: {0}")]
    Serve(String),
}

/// Static site server.
pub struct SiteServer {
    config: ServerConfig,
}

/// A server listening on a bound address.
pub struct RunningServer {
    addr: SocketAddr,
    handle: JoinHandle<Result<(), ServerError>>,
}

impl SiteServer {
    /// Create a new site server.
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Router serving the site directory.
    pub fn router(&self) -> Router {
        let dir = &self.config.dir;
        let not_found = ServeFile::new(dir.join("404.html"));

        Router::new().fallback_service(ServeDir::new(dir).not_found_service(not_found))
    }

    async fn bind(&self) -> Result<TcpListener, ServerError> {
        if !self.config.dir.is_dir() {
            return Err(ServerError::MissingDir(self.config.dir.clone()));
        }

        let addr = format!("{}:{}", self.config.host, self.config.port);
        let socket: SocketAddr = addr
            .parse()
            .map_err(|_| ServerError::InvalidAddress(addr.clone()))?;

        TcpListener::bind(socket)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))
    }

    /// Serve in a background task and return once the socket is bound.
    pub async fn spawn(self) -> Result<RunningServer, ServerError> {
        let listener = self.bind().await?;
        let addr = listener
            .local_addr()
            .map_err(|e| ServerError::Serve(e.to_string()))?;
        let app = self.router();

        tracing::info!("Serving {} at http://{}", self.config.dir.display(), addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .map_err(|e| ServerError::Serve(e.to_string()))
        });

        Ok(RunningServer { addr, handle })
    }
}

impl RunningServer {
    /// Address the server is listening on.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Base URL of the served site.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Wait until the server stops.
    pub async fn wait(self) -> Result<(), ServerError> {
        self.handle
            .await
            .map_err(|e| ServerError::Serve(e.to_string()))?
    }

    /// Stop serving.
    pub fn shutdown(self) {
        self.handle.abort();
    }
}

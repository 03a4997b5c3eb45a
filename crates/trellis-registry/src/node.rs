//! Trellis Node - the main application entry point.
//!
//! Architecture:
//! - Single daemon process with one RocksDB member store
//! - One [`Registry`] shared by the HTTP API and the admin socket
//! - Unix admin socket for local operator commands (trellis-admin CLI)

use crate::admin_socket::AdminSocket;
use crate::api;
use crate::error::{Error, Result};
use crate::registry::Registry;
use crate::storage::RocksStore;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

/// Configuration for a Trellis node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    /// Data directory for storage
    pub data_dir: PathBuf,

    /// HTTP API listen address
    pub api_addr: SocketAddr,

    /// Admin socket path (for trellis-admin CLI)
    pub admin_socket: PathBuf,
}

impl NodeConfig {
    /// Create config from environment variables with sensible defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = PathBuf::from(
            lookup("TRELLIS_DATA_DIR").unwrap_or_else(|| "./trellis-data".to_string()),
        );

        let api_addr_raw = lookup("TRELLIS_API_ADDR").unwrap_or_else(|| "0.0.0.0:5000".to_string());
        let api_addr = api_addr_raw.parse::<SocketAddr>().map_err(|e| {
            Error::Validation(format!("invalid TRELLIS_API_ADDR {api_addr_raw:?}: {e}"))
        })?;

        let admin_socket = lookup("TRELLIS_ADMIN_SOCKET")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("admin.sock"));

        Ok(Self {
            data_dir,
            api_addr,
            admin_socket,
        })
    }

    /// Directory holding the RocksDB member store.
    pub fn store_dir(&self) -> PathBuf {
        self.data_dir.join("members")
    }
}

/// A Trellis node instance.
pub struct Node {
    registry: Arc<Registry>,
    config: NodeConfig,
}

impl Node {
    /// Open storage and create the node.
    pub fn new(config: NodeConfig) -> Result<Self> {
        // Ensure data directory exists
        std::fs::create_dir_all(&config.data_dir)?;

        let store = Arc::new(RocksStore::open(config.store_dir())?);
        let registry = Arc::new(Registry::new(store));

        Ok(Self { registry, config })
    }

    /// Shared registry (for API handlers and the admin socket).
    pub fn registry(&self) -> Arc<Registry> {
        Arc::clone(&self.registry)
    }

    /// Run the node (starts the admin socket and the HTTP server).
    pub async fn run(self) -> Result<()> {
        tracing::info!("Trellis node starting");
        tracing::info!("  API: http://{}", self.config.api_addr);
        tracing::info!("  Admin: {:?}", self.config.admin_socket);
        tracing::info!("  Data: {:?}", self.config.data_dir);

        match self.registry.stats() {
            Ok(stats) => tracing::info!(
                members = stats.members,
                root = stats.root.as_deref().unwrap_or("-"),
                "member store opened"
            ),
            Err(e) => tracing::warn!("could not read member stats: {}", e),
        }

        let admin_socket = AdminSocket::new(self.registry(), self.config.admin_socket.clone());
        tokio::spawn(async move {
            if let Err(e) = admin_socket.run().await {
                tracing::error!("Admin socket error: {}", e);
            }
        });

        let app = api::build_router(self.registry());

        let listener = tokio::net::TcpListener::bind(self.config.api_addr).await?;
        tracing::info!("HTTP server listening on {}", self.config.api_addr);

        axum::serve(listener, app).await?;

        Ok(())
    }
}

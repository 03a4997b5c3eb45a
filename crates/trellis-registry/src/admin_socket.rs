//! Unix socket server for admin commands.
//!
//! Provides a local IPC interface for inspecting the member tree. The
//! protocol is one JSON command per line and one JSON response per line.

use crate::error::Result;
use crate::models::{DownlineReport, MemberView, RegistryStats, SponsorStatus};
use crate::registry::Registry;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};

/// Admin command sent over the socket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum AdminCommand {
    /// Member count, root and next code
    Stats,
    /// Show one member
    Show { code: String },
    /// Slot availability of a sponsor
    VerifySponsor { code: String },
    /// Both subtrees of a member
    Downline { code: String },
    /// Placement parents of a member up to the root
    Upline { code: String },
    /// Ping (health check)
    Ping,
}

/// Response from admin command.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AdminResponse {
    Error { error: String },
    Stats { stats: RegistryStats },
    Member { member: MemberView },
    Sponsor { sponsor: SponsorStatus },
    Downline { downline: DownlineReport },
    Upline { upline: Vec<String> },
    Pong,
}

/// Admin socket server.
pub struct AdminSocket {
    registry: Arc<Registry>,
    socket_path: PathBuf,
}

impl AdminSocket {
    /// Create a new admin socket server.
    pub fn new(registry: Arc<Registry>, socket_path: impl Into<PathBuf>) -> Self {
        Self {
            registry,
            socket_path: socket_path.into(),
        }
    }

    /// Run the admin socket server.
    pub async fn run(&self) -> Result<()> {
        // Remove existing socket file if present
        let _ = std::fs::remove_file(&self.socket_path);

        let listener = UnixListener::bind(&self.socket_path)?;
        tracing::info!("Admin socket listening on {:?}", self.socket_path);

        loop {
            match listener.accept().await {
                Ok((stream, _)) => {
                    let registry = Arc::clone(&self.registry);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, registry).await {
                            tracing::error!("Admin connection error: {}", e);
                        }
                    });
                }
                Err(e) => {
                    tracing::error!("Failed to accept admin connection: {}", e);
                }
            }
        }
    }
}

async fn handle_connection(stream: UnixStream, registry: Arc<Registry>) -> Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut line = String::new();

    while reader.read_line(&mut line).await? > 0 {
        let response = match serde_json::from_str::<AdminCommand>(&line) {
            Ok(cmd) => {
                let registry = Arc::clone(&registry);
                tokio::task::spawn_blocking(move || execute_command(cmd, &registry))
                    .await
                    .unwrap_or_else(|e| AdminResponse::Error {
                        error: format!("command task failed: {}", e),
                    })
            }
            Err(e) => AdminResponse::Error {
                error: format!("Invalid command: {}", e),
            },
        };

        let response_json = serde_json::to_string(&response)? + "\n";
        writer.write_all(response_json.as_bytes()).await?;
        line.clear();
    }

    Ok(())
}

fn execute_command(cmd: AdminCommand, registry: &Registry) -> AdminResponse {
    let result = match cmd {
        AdminCommand::Stats => registry.stats().map(|stats| AdminResponse::Stats { stats }),
        AdminCommand::Show { code } => registry
            .get_member(&code)
            .map(|member| AdminResponse::Member { member }),
        AdminCommand::VerifySponsor { code } => registry
            .resolve_sponsor(&code)
            .map(|sponsor| AdminResponse::Sponsor { sponsor }),
        AdminCommand::Downline { code } => registry
            .downline(&code)
            .map(|downline| AdminResponse::Downline { downline }),
        AdminCommand::Upline { code } => registry
            .upline(&code)
            .map(|upline| AdminResponse::Upline { upline }),
        AdminCommand::Ping => Ok(AdminResponse::Pong),
    };

    result.unwrap_or_else(|e| {
        tracing::warn!("Admin command failed: {}", e);
        AdminResponse::Error {
            error: e.to_string(),
        }
    })
}

/// Default socket path.
pub fn default_socket_path() -> PathBuf {
    let data_dir =
        std::env::var("TRELLIS_DATA_DIR").unwrap_or_else(|_| "./trellis-data".to_string());
    PathBuf::from(data_dir).join("admin.sock")
}

//! Trellis Registry - Member Registration Node
//!
//! Enrolls members into the Trellis binary placement tree and serves the
//! resulting tree over HTTP.
//!
//! # Architecture
//!
//! - **Models**: Registration requests/outcomes and public member views
//! - **Storage**: Snapshot persistence (RocksDB or in-memory)
//! - **Registry**: Validation, placement, attachment and counter propagation
//!   committed as a single snapshot write
//! - **Credential**: Salted BLAKE3 hashing of member secrets
//! - **API**: HTTP endpoints for registration and reporting
//! - **Admin Socket**: Unix socket for local admin commands (trellis-admin CLI)
//!
//! # Example
//!
//! ```no_run
//! use trellis_registry::{Node, NodeConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = NodeConfig::from_env()?;
//!     let node = Node::new(config)?;
//!     node.run().await?;
//!     Ok(())
//! }
//! ```

pub mod admin_socket;
pub mod api;
pub mod credential;
pub mod error;
pub mod models;
pub mod node;
pub mod registry;
pub mod storage;

pub use error::{Error, Result};
pub use models::{
    DownlineEntry, DownlineReport, MemberView, Registration, RegistrationRequest, RegistryStats,
    SponsorStatus,
};
pub use node::{Node, NodeConfig};
pub use registry::Registry;
pub use storage::{MemberStore, MemoryStore, RocksStore};

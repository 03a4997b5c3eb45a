//! Trellis Node binary
//!
//! Serves member registration and downline reports over HTTP.

use trellis_registry::{Node, NodeConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    "trellis_node=info,trellis_registry=info,tower_http=info".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Trellis Node");

    let config = NodeConfig::from_env()?;

    let node = Node::new(config)?;
    node.run().await?;

    Ok(())
}

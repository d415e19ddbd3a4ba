//! Token Swap MCP Server
//!
//! A Model Context Protocol server for swapping tokens through a TokenSwap contract.

use rmcp::ServiceExt;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use token_swap_mcp::{Config, ConfigResolver, TokenSwapServer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let resolver = ConfigResolver::from_env();

    // Initialize logging before resolving, so fallback warnings are visible.
    // stdout carries the MCP protocol.
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(resolver.log_level()));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = Config::resolve(&resolver)?;

    tracing::info!(chain_id = config.chain_id, "Starting Token Swap MCP Server");

    let server = TokenSwapServer::new(config)?;

    // Run with stdio transport
    let transport = rmcp::transport::stdio();
    let running = server.serve(transport).await?;

    running.waiting().await?;

    Ok(())
}

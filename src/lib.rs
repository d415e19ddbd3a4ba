//! Token Swap MCP Server Library
//!
//! A Model Context Protocol server that swaps ERC20 tokens through a
//! deployed TokenSwap contract. Every swap is an allowance approval
//! followed by the swap call, sent from a locally held key.
//!
//! # Features
//!
//! - **Token Registry**: Swappable tokens resolved from the environment
//! - **Request Validation**: Amount, token pair, and precision checks before signing
//! - **Swap Orchestration**: Approve, swap, or both, with a single observable transaction state
//!
//! # Example
//!
//! ```rust,ignore
//! use token_swap_mcp::{Config, TokenSwapServer};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let server = TokenSwapServer::new(config)?;
//!     // Run server...
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod ethereum;
pub mod mcp;
pub mod services;
pub mod types;

pub use config::{Config, ConfigResolver};
pub use error::{AppError, ConfigError, Result, TransactionError, ValidationError};
pub use ethereum::constants::*;
pub use mcp::TokenSwapServer;
pub use services::{SwapOrchestrator, SwapRequestValidator, TokenRegistry};

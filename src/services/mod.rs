//! Business logic services.
//!
//! Contains the token registry, request validation, and swap orchestration.

pub mod swap;
pub mod token_registry;
pub mod validator;

pub use swap::SwapOrchestrator;
pub use token_registry::TokenRegistry;
pub use validator::{SwapRequestValidator, ValidatedSwap};

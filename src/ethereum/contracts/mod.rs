//! Smart contract bindings.

pub mod erc20;
pub mod token_swap;

pub use erc20::IERC20;
pub use token_swap::ITokenSwap;

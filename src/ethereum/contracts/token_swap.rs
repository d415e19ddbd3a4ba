//! TokenSwap contract bindings.

use alloy::sol;

// TokenSwap interface: a single state-mutating entry point, no outputs.
sol! {
    interface ITokenSwap {
        function swap(address tokenIn, address tokenOut, uint256 amountIn) external;
    }
}

//! ERC20 contract bindings.

use alloy::sol;

// Only the allowance surface is needed: approve to grant, allowance to inspect.
sol! {
    #[sol(rpc)]
    interface IERC20 {
        function approve(address spender, uint256 amount) external returns (bool);
        function allowance(address owner, address spender) external view returns (uint256);
    }
}

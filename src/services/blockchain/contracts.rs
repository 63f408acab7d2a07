//! ERC-20 contract bindings.

use alloy::sol;

sol! {
	/// Subset of the ERC-20 interface read by the monitor
	#[sol(rpc)]
	interface IERC20 {
		event Transfer(address indexed from, address indexed to, uint256 value);

		function balanceOf(address owner) external view returns (uint256);
	}
}

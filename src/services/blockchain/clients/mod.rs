//! Blockchain client implementations.
//!
//! Contains the EVM client used against Ethereum JSON-RPC nodes.

mod evm {
	pub mod client;
}

pub use evm::client::EvmClient;

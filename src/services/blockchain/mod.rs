//! Blockchain client interfaces and implementations.
//!
//! Provides the chain query capability used by the poller and the aggregate
//! queries:
//!
//! - Generic blockchain client trait
//! - ERC-20 contract bindings
//! - EVM client backed by an alloy provider
//! - Error handling for blockchain operations

mod client;
mod clients;
mod contracts;
mod error;

pub use client::BlockChainClient;
pub use clients::EvmClient;
pub use contracts::IERC20;
pub use error::BlockChainError;

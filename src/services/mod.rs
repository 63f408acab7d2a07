//! Core services implementing the monitor's business logic.
//!
//! - `aggregate`: burn totals and history queries
//! - `blockchain`: chain access through JSON-RPC
//! - `blockwatcher`: the polling loop and block cursor
//! - `filter`: classification of raw logs into domain events
//! - `notification`: channel adapters, fan-out and operator alerts
//! - `price`: USD rate and circulating supply oracle

pub mod aggregate;
pub mod blockchain;
pub mod blockwatcher;
pub mod filter;
pub mod notification;
pub mod price;

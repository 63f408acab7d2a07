//! Burn engine monitoring library.
//!
//! Watches an ERC-20 token for deposits into a burn engine contract and for
//! transfers to the null address, renders each event as a notification and fans
//! it out to every configured messaging channel. Aggregate burn statistics are
//! computed on demand from the on-chain history.
//!
//! # Architecture
//! - `bootstrap`: wires configuration into running services
//! - `models`: domain types and configuration loading
//! - `services`: chain access, polling, classification, notifications, price
//!   oracle and aggregate queries
//! - `utils`: formatting, HTTP, logging and metrics helpers

pub mod bootstrap;
pub mod models;
pub mod services;
pub mod utils;

//! Market data for the monitored token.
//!
//! Fetches the USD conversion rate and circulating supply and keeps the last
//! good values for message rendering and aggregate queries.

mod error;
mod oracle;

pub use error::PriceError;
pub use oracle::{HttpPriceSource, PriceOracleClient, PriceSource};

//! Burn statistics.
//!
//! Folds historical burns into totals and answers the on-demand queries:
//! total burned, most recent burns and the burn engine's balance.

mod computer;
mod error;

pub use computer::{build_snapshot, fold_burns, AggregateComputer};
pub use error::AggregateError;

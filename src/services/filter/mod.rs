//! Log classification.
//!
//! Turns raw token `Transfer` logs into domain events:
//! - Deposits into the burn engine
//! - Burns sent to the null address
//! - Anomalies for logs that cannot be trusted

mod classifier;
mod error;

pub use classifier::EventClassifier;
pub use error::ClassificationError;

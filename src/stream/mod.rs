//! Stream aggregation core
//!
//! - `filters`: pure predicates narrowing provider results
//! - `normalize`: provider result → stream descriptor conversion
//! - `provider`: the dispatcher tying metadata, search, filters, and
//!   normalization together

pub mod filters;
pub mod normalize;
pub mod provider;

pub use provider::{ProviderError, StreamProvider};

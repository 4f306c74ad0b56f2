//! Common types shared across the trendcast crates.
//!
//! Every crate in the workspace reports failures through [`TrendcastError`]
//! so that the pipeline can propagate them untouched to the caller.

pub mod error;

pub use error::{Result, TrendcastError};

//! Shared helpers for the product API crates: tracing setup and small wire types.

pub mod types;
pub mod utils;

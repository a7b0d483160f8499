//! Shared test utilities used across the knng crates.

pub mod ci;
pub mod tracing;

//! Benchmark support for the NN-Descent k-NN graph engine.
//!
//! Provides synthetic vector sources, a brute-force exact k-NN oracle and
//! integer recall scoring used by the Criterion benchmarks.

pub mod error;
pub mod params;
pub mod recall;
pub mod source;

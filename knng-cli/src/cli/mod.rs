//! Command-line interface for building k-nearest-neighbour graphs.
//!
//! The `run` command loads dense vectors from Parquet or delimited text,
//! runs NN-Descent and prints one `(source, target, similarity)` row per
//! graph edge after a short metadata header.

mod commands;

pub use commands::{
    Cli, CliError, CliErrorCode, Command, ExecutionSummary, MetricArg, ParamArgs, ParquetArgs,
    RunCommand, RunSource, TextArgs, render_summary, run_cli,
};

#[cfg(test)]
mod test_fixtures;

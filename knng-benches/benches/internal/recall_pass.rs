//! Recall pass for the sample-rate sweep.

use std::{path::PathBuf, time::Instant};

use knng_benches::{
    error::BenchSetupError,
    params::SweepBenchParams,
    recall::{RecallMeasurement, graph_recall, write_recall_report},
    source::SyntheticSource,
};
use knng_core::{Knn, SimilarityComputer, TerminationFlag};

/// Report destination unless `KNNG_BENCH_RECALL_REPORT_PATH` overrides it.
const RECALL_REPORT_PATH: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../target/benchmarks/knn_recall_vs_sample_rate.csv"
);

/// Number of query nodes scored per sweep step.
const RECALL_QUERY_COUNT: usize = 100;

fn is_discovery_mode() -> bool {
    std::env::args().any(|arg| arg == "--list" || arg == "--exact")
}

fn should_collect_recall_report() -> bool {
    match std::env::var("KNNG_BENCH_RECALL_REPORT") {
        Ok(value) => !matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "0" | "false" | "off"
        ),
        Err(_) => !is_discovery_mode(),
    }
}

fn recall_report_path() -> PathBuf {
    std::env::var_os("KNNG_BENCH_RECALL_REPORT_PATH")
        .map_or_else(|| PathBuf::from(RECALL_REPORT_PATH), PathBuf::from)
}

/// Builds one graph per sample rate, scores it and writes the CSV report.
pub(crate) fn collect_recall_report(
    source: &SyntheticSource,
    top_k: usize,
    sample_rate_percents: &[u32],
    make_knn: impl Fn(&SweepBenchParams) -> Result<Knn, BenchSetupError>,
) -> Result<(), BenchSetupError> {
    if !should_collect_recall_report() {
        return Ok(());
    }
    let point_count = source.node_count();
    let queries = point_count.min(RECALL_QUERY_COUNT);
    let mut records = Vec::with_capacity(sample_rate_percents.len());
    for &sample_rate_percent in sample_rate_percents {
        let params = SweepBenchParams {
            point_count,
            sample_rate_percent,
        };
        let knn = make_knn(&params)?;
        let started = Instant::now();
        let result = knn.run(source, &TerminationFlag::new())?;
        let build_time_millis = started.elapsed().as_millis();
        records.push(RecallMeasurement {
            point_count,
            top_k,
            sample_rate_percent,
            ran_iterations: result.ran_iterations(),
            node_pairs_considered: result.node_pairs_considered(),
            recall: graph_recall(&result, source, top_k, 0..queries),
            build_time_millis,
        });
    }
    write_recall_report(recall_report_path(), &records)?;
    Ok(())
}

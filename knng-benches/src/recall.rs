//! Recall measurement against an exact k-NN oracle.
//!
//! Provides a brute-force top-k scan, an integer recall scorer and a CSV
//! report writer so benchmarks can relate build time to graph quality.

use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use knng_core::{KnnResult, Neighbour, SimilarityComputer};

/// Integer recall score; convert to a fraction only when reporting.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RecallScore {
    /// Oracle neighbours found by the approximate graph.
    pub hits: usize,
    /// Number of oracle neighbours compared.
    pub total: usize,
}

impl RecallScore {
    /// Adds the counts of `other` to this score.
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        Self {
            hits: self.hits.saturating_add(other.hits),
            total: self.total.saturating_add(other.total),
        }
    }
}

/// Computes the exact `k` most similar other nodes of `query`.
///
/// Undefined similarities are skipped. Results are ordered by descending
/// similarity, ties by ascending id.
#[must_use]
pub fn brute_force_top_k<C: SimilarityComputer + ?Sized>(
    computer: &C,
    query: usize,
    k: usize,
) -> Vec<Neighbour> {
    if k == 0 {
        return Vec::new();
    }
    let mut neighbours: Vec<Neighbour> = (0..computer.node_count())
        .filter(|&candidate| candidate != query)
        .map(|candidate| Neighbour {
            id: candidate,
            similarity: computer.similarity(query, candidate),
        })
        .filter(|neighbour| !neighbour.similarity.is_nan())
        .collect();
    neighbours.sort_unstable_by(|left, right| {
        right
            .similarity
            .total_cmp(&left.similarity)
            .then(left.id.cmp(&right.id))
    });
    neighbours.truncate(k);
    neighbours
}

/// Computes recall@k between oracle and observed neighbour lists.
///
/// Both lists are truncated to `min(k, oracle.len(), observed.len())`.
///
/// # Examples
///
/// ```
/// use knng_benches::recall::{RecallScore, recall_at_k};
/// use knng_core::Neighbour;
///
/// let oracle = vec![
///     Neighbour { id: 0, similarity: 0.9 },
///     Neighbour { id: 1, similarity: 0.8 },
/// ];
/// let observed = vec![
///     Neighbour { id: 0, similarity: 0.9 },
///     Neighbour { id: 2, similarity: 0.5 },
/// ];
/// assert_eq!(recall_at_k(&oracle, &observed, 2), RecallScore { hits: 1, total: 2 });
/// ```
#[must_use]
pub fn recall_at_k(oracle: &[Neighbour], observed: &[Neighbour], k: usize) -> RecallScore {
    let target = k.min(oracle.len()).min(observed.len());
    if target == 0 {
        return RecallScore::default();
    }
    let oracle_ids: HashSet<usize> = oracle.iter().take(target).map(|n| n.id).collect();
    let hits = observed
        .iter()
        .take(target)
        .filter(|neighbour| oracle_ids.contains(&neighbour.id))
        .count();
    RecallScore {
        hits,
        total: target,
    }
}

/// Sums recall@k over `queries`, comparing each node's graph list with the
/// brute-force oracle.
#[must_use]
pub fn graph_recall<C: SimilarityComputer + ?Sized>(
    result: &KnnResult,
    computer: &C,
    k: usize,
    queries: impl IntoIterator<Item = usize>,
) -> RecallScore {
    queries
        .into_iter()
        .map(|query| {
            let oracle = brute_force_top_k(computer, query, k);
            recall_at_k(&oracle, &result.neighbours(query), k)
        })
        .fold(RecallScore::default(), RecallScore::merge)
}

/// A single row in the recall-versus-sample-rate report.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecallMeasurement {
    /// Number of points in the dataset.
    pub point_count: usize,
    /// Neighbours kept per node.
    pub top_k: usize,
    /// Sample rate in whole percent.
    pub sample_rate_percent: u32,
    /// Iterations the run performed.
    pub ran_iterations: usize,
    /// Similarity evaluations performed by the run.
    pub node_pairs_considered: u64,
    /// Aggregated recall across all queries.
    pub recall: RecallScore,
    /// Wall-clock build time in milliseconds.
    pub build_time_millis: u128,
}

impl RecallMeasurement {
    const fn csv_header() -> &'static str {
        "point_count,top_k,sample_rate_percent,ran_iterations,node_pairs_considered,recall_hits,recall_total,recall_fraction,build_time_ms\n"
    }

    fn to_csv_row(&self) -> String {
        format!(
            "{},{},{},{},{},{},{},{},{}\n",
            self.point_count,
            self.top_k,
            self.sample_rate_percent,
            self.ran_iterations,
            self.node_pairs_considered,
            self.recall.hits,
            self.recall.total,
            recall_fraction(self.recall),
            self.build_time_millis,
        )
    }
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "recall fraction is only rendered for the CSV report"
)]
fn recall_fraction(score: RecallScore) -> String {
    if score.total == 0 {
        return "0.000000".to_owned();
    }
    format!("{:.6}", score.hits as f64 / score.total as f64)
}

/// Writes recall measurements to a CSV file, creating parent directories.
///
/// # Errors
/// Returns [`std::io::Error`] if directory creation or writing fails.
pub fn write_recall_report(
    report_path: impl AsRef<Path>,
    records: &[RecallMeasurement],
) -> Result<PathBuf, std::io::Error> {
    let report_file_path = report_path.as_ref().to_path_buf();
    if let Some(parent) = report_file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut output = String::from(RecallMeasurement::csv_header());
    for record in records {
        output.push_str(&record.to_csv_row());
    }
    fs::write(&report_file_path, output)?;
    Ok(report_file_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use knng_core::{KnnBuilder, ScalarSimilarity, TerminationFlag};
    use rstest::rstest;

    #[expect(
        clippy::cast_precision_loss,
        reason = "test ids are tiny"
    )]
    fn neighbours_from_ids(ids: &[usize]) -> Vec<Neighbour> {
        ids.iter()
            .map(|&id| Neighbour {
                id,
                similarity: 1.0 / (1.0 + id as f64),
            })
            .collect()
    }

    #[rstest]
    #[case::perfect(vec![0, 1, 2], vec![0, 1, 2], 3, RecallScore { hits: 3, total: 3 })]
    #[case::partial(vec![0, 1, 2], vec![0, 2, 5], 3, RecallScore { hits: 2, total: 3 })]
    #[case::none(vec![0, 1, 2], vec![3, 4, 5], 3, RecallScore { hits: 0, total: 3 })]
    #[case::k_zero(vec![0, 1], vec![0, 1], 0, RecallScore { hits: 0, total: 0 })]
    #[case::empty_oracle(vec![], vec![0, 1], 2, RecallScore { hits: 0, total: 0 })]
    #[case::observed_shorter(vec![0, 1, 2], vec![0], 3, RecallScore { hits: 1, total: 1 })]
    fn recall_at_k_scores_overlap(
        #[case] oracle_ids: Vec<usize>,
        #[case] observed_ids: Vec<usize>,
        #[case] k: usize,
        #[case] expected: RecallScore,
    ) {
        let oracle = neighbours_from_ids(&oracle_ids);
        let observed = neighbours_from_ids(&observed_ids);
        assert_eq!(recall_at_k(&oracle, &observed, k), expected);
    }

    #[rstest]
    fn brute_force_orders_by_similarity_and_skips_self() {
        let computer = ScalarSimilarity::new(
            "values",
            vec![Some(0.0), Some(5.0), Some(1.0), None, Some(2.0)],
        );
        let ids: Vec<usize> = brute_force_top_k(&computer, 0, 3)
            .iter()
            .map(|neighbour| neighbour.id)
            .collect();
        assert_eq!(ids, vec![2, 4, 1]);
        assert!(brute_force_top_k(&computer, 0, 0).is_empty());
    }

    #[rstest]
    fn exact_graph_scores_full_recall() {
        let computer = ScalarSimilarity::new(
            "values",
            vec![Some(0.0), Some(1.0), Some(3.0), Some(7.0), Some(15.0)],
        );
        let knn = KnnBuilder::new()
            .with_top_k(2)
            .with_concurrency(1)
            .with_random_seed(5)
            .with_random_joins(40)
            .build()
            .expect("valid params");
        let result = knn
            .run(&computer, &TerminationFlag::new())
            .expect("run succeeds");
        let score = graph_recall(&result, &computer, 2, 0..5);
        assert_eq!(score, RecallScore { hits: 10, total: 10 });
    }

    #[rstest]
    fn report_is_written_as_csv() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("recall.csv");
        let record = RecallMeasurement {
            point_count: 100,
            top_k: 10,
            sample_rate_percent: 50,
            ran_iterations: 4,
            node_pairs_considered: 12_345,
            recall: RecallScore { hits: 3, total: 4 },
            build_time_millis: 17,
        };
        let written = write_recall_report(&path, &[record]).expect("report written");
        let contents = fs::read_to_string(written).expect("report readable");
        let mut lines = contents.lines();
        assert!(lines.next().is_some_and(|header| header.starts_with("point_count,")));
        assert_eq!(lines.next(), Some("100,10,50,4,12345,3,4,0.750000,17"));
    }
}

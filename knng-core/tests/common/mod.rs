//! Fixtures shared by the `knng-core` integration tests.
#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::sync::atomic::{AtomicUsize, Ordering};

use knng_core::{KnnResult, SimilarityComputer, TerminationFlag, VectorMetric, VectorSimilarity};
use rand::{Rng, SeedableRng, rngs::SmallRng};

/// Uniform random vectors in `[-1, 1]^dimensions`.
pub fn random_vectors(nodes: usize, dimensions: usize, seed: u64) -> Vec<Vec<f32>> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..nodes)
        .map(|_| (0..dimensions).map(|_| rng.gen_range(-1.0..=1.0)).collect())
        .collect()
}

pub fn euclidean(vectors: Vec<Vec<f32>>) -> VectorSimilarity {
    VectorSimilarity::from_dense("random", VectorMetric::Euclidean, vectors)
}

/// Exact top-`k` neighbours of every node, most similar first.
pub fn brute_force_top_k<C: SimilarityComputer>(computer: &C, k: usize) -> Vec<Vec<usize>> {
    let nodes = computer.node_count();
    (0..nodes)
        .map(|node| {
            let mut scored: Vec<(usize, f64)> = (0..nodes)
                .filter(|&other| other != node)
                .map(|other| (other, computer.similarity(node, other)))
                .filter(|(_, similarity)| !similarity.is_nan())
                .collect();
            scored.sort_by(|left, right| right.1.total_cmp(&left.1));
            scored.truncate(k);
            scored.into_iter().map(|(other, _)| other).collect()
        })
        .collect()
}

/// Fraction of exact neighbours recovered by `result`.
pub fn recall(result: &KnnResult, exact: &[Vec<usize>]) -> f64 {
    let mut hits = 0_usize;
    let mut total = 0_usize;
    for (node, expected) in exact.iter().enumerate() {
        let found: Vec<usize> = result.neighbours_of(node).collect();
        hits += expected.iter().filter(|id| found.contains(id)).count();
        total += expected.len();
    }
    hits as f64 / total as f64
}

/// Wraps a computer and signals termination after a number of evaluations.
pub struct CancellingComputer<C> {
    inner: C,
    flag: TerminationFlag,
    budget: usize,
    calls: AtomicUsize,
}

impl<C: SimilarityComputer> CancellingComputer<C> {
    pub fn new(inner: C, flag: TerminationFlag, budget: usize) -> Self {
        Self {
            inner,
            flag,
            budget,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl<C: SimilarityComputer> SimilarityComputer for CancellingComputer<C> {
    fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    fn name(&self) -> &str {
        "cancelling"
    }

    fn similarity(&self, node: usize, candidate: usize) -> f64 {
        if self.calls.fetch_add(1, Ordering::Relaxed) + 1 == self.budget {
            self.flag.terminate();
        }
        self.inner.similarity(node, candidate)
    }
}

//! Shared test utilities for `knng-core`.

use knng_test_support::ci::property_test_profile::ProptestRunProfile;
use proptest::test_runner::Config as ProptestConfig;

use crate::{
    KnnParams, ScalarSimilarity, TerminationFlag,
    context::RunContext,
    neighbour_list::NeighbourList,
    partition::Scheduler,
    rng::StreamSeeds,
    similarity::SimilarityComputer,
};

/// Builds a standard proptest configuration from the shared CI profile.
///
/// This keeps property suites aligned on the same `PROGTEST_CASES` and
/// `KNNG_PBT_FORK` interpretation.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

/// Scalar computer over the values `0, 1, .., nodes - 1`.
pub(crate) fn line_similarity(nodes: usize) -> ScalarSimilarity {
    let values = (0..nodes).map(|value| Some(value as f64)).collect();
    ScalarSimilarity::new("line", values)
}

/// Owns the state behind a [`RunContext`] so phases can be tested alone.
pub(crate) struct RunFixture<'a, C: SimilarityComputer> {
    computer: &'a C,
    params: KnnParams,
    pub(crate) lists: Vec<NeighbourList>,
    scheduler: Scheduler,
    termination: TerminationFlag,
    k: usize,
}

impl<'a, C: SimilarityComputer> RunFixture<'a, C> {
    pub(crate) fn new(computer: &'a C, k: usize, concurrency: usize) -> Self {
        let nodes = computer.node_count();
        let params = KnnParams {
            top_k: k,
            concurrency,
            random_seed: Some(7),
            ..KnnParams::default()
        };
        let k = params.effective_k(nodes);
        Self {
            computer,
            params,
            lists: (0..nodes).map(|node| NeighbourList::new(node, k)).collect(),
            scheduler: Scheduler::new(nodes, concurrency).expect("scheduler must build"),
            termination: TerminationFlag::new(),
            k,
        }
    }

    pub(crate) fn with_random_joins(mut self, random_joins: usize) -> Self {
        self.params.random_joins = random_joins;
        self
    }

    pub(crate) fn context(&self) -> RunContext<'_, C> {
        self.context_with(&self.termination)
    }

    pub(crate) fn context_with<'s>(&'s self, termination: &'s TerminationFlag) -> RunContext<'s, C> {
        RunContext {
            computer: self.computer,
            params: &self.params,
            lists: &self.lists,
            scheduler: &self.scheduler,
            seeds: StreamSeeds::new(7),
            termination,
            k: self.k,
            sampled_k: self.params.sampled_k(self.k),
        }
    }
}

//! State shared by every phase of one NN-Descent run.

use std::iter::Sum;

use rand::{Rng, rngs::SmallRng};

use crate::{
    error::{KnnError, Result},
    neighbour_list::NeighbourList,
    params::KnnParams,
    partition::{Partition, Scheduler},
    rng::StreamSeeds,
    similarity::{MissingDataPolicy, SimilarityComputer},
    termination::{Phase, TerminationFlag},
};

/// Per-partition counters, summed at each phase barrier.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct Tally {
    /// Accepted insertions that count towards convergence.
    pub(crate) updates: usize,
    /// Similarity evaluations performed.
    pub(crate) pairs_considered: u64,
}

impl Sum for Tally {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, tally| Self {
            updates: acc.updates + tally.updates,
            pairs_considered: acc.pairs_considered + tally.pairs_considered,
        })
    }
}

/// Borrowed view of everything a phase needs.
pub(crate) struct RunContext<'a, C: SimilarityComputer + ?Sized> {
    pub(crate) computer: &'a C,
    pub(crate) params: &'a KnnParams,
    pub(crate) lists: &'a [NeighbourList],
    pub(crate) scheduler: &'a Scheduler,
    pub(crate) seeds: StreamSeeds,
    pub(crate) termination: &'a TerminationFlag,
    /// Neighbour list capacity, `min(k, n - 1)`.
    pub(crate) k: usize,
    /// Per-iteration sample size, `ceil(sample_rate * k)`.
    pub(crate) sampled_k: usize,
}

impl<C: SimilarityComputer + ?Sized> RunContext<'_, C> {
    pub(crate) fn node_count(&self) -> usize {
        self.lists.len()
    }

    /// Evaluates the similarity between `node` and `candidate`.
    ///
    /// Returns `Ok(None)` for an undefined similarity unless `strict` is set
    /// and the computer treats missing data as fatal.
    pub(crate) fn similarity(
        &self,
        node: usize,
        candidate: usize,
        strict: bool,
    ) -> Result<Option<f64>> {
        let similarity = self.computer.similarity(node, candidate);
        if !similarity.is_nan() {
            return Ok(Some(similarity));
        }
        if strict && self.computer.missing_data_policy() == MissingDataPolicy::FailFast {
            return Err(KnnError::MissingSimilarity {
                computer: self.computer.name().to_owned(),
                node,
                candidate,
            });
        }
        Ok(None)
    }

    /// Offers `candidate` to `owner`'s neighbour list, honouring the
    /// similarity cutoff.
    pub(crate) fn offer<R: Rng + ?Sized>(
        &self,
        owner: usize,
        candidate: usize,
        similarity: f64,
        rng: &mut R,
    ) -> Result<bool> {
        if similarity < self.params.similarity_cutoff {
            return Ok(false);
        }
        let list = self.lists.get(owner).ok_or_else(|| KnnError::InvariantViolation {
            message: format!("node {owner} is outside the graph of {} nodes", self.node_count()),
        })?;
        list.try_insert(candidate, similarity, self.params.perturbation_rate, rng)
    }

    /// Runs `task` over every partition with its own random stream.
    pub(crate) fn for_each_partition<T, F>(
        &self,
        phase: Phase,
        iteration: usize,
        task: F,
    ) -> Result<Vec<T>>
    where
        T: Send,
        F: Fn(Partition, &mut SmallRng) -> Result<T> + Sync,
    {
        self.scheduler.run(|partition| {
            let mut rng = self.seeds.stream(phase, iteration, partition.index());
            task(partition, &mut rng)
        })
    }

    pub(crate) fn check(&self, phase: Phase) -> Result<()> {
        self.termination.check(phase)
    }
}

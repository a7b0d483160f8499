//! Entry point for building approximate k-NN graphs with NN-Descent.
//!
//! [`Knn::run`] drives the phases in order: random initialisation, then
//! repeated split, reverse and join passes until the convergence controller
//! reports a terminal state. Each phase finishes on every partition before
//! the next begins.

use tracing::{debug, info, instrument, warn};

use crate::{
    Result,
    context::{RunContext, Tally},
    convergence::ConvergenceController,
    init::initialize,
    join::join,
    neighbour_list::NeighbourList,
    params::KnnParams,
    partition::Scheduler,
    result::KnnResult,
    rng::StreamSeeds,
    similarity::SimilarityComputer,
    split::{reverse, split},
    termination::TerminationFlag,
};

/// Configured NN-Descent computation.
///
/// Construct instances through [`crate::KnnBuilder`].
///
/// # Examples
/// ```
/// use knng_core::{KnnBuilder, ScalarSimilarity, TerminationFlag};
///
/// let values = (0..20).map(|value| Some(f64::from(value))).collect();
/// let computer = ScalarSimilarity::new("line", values);
/// let knn = KnnBuilder::new()
///     .with_top_k(2)
///     .with_concurrency(1)
///     .with_random_seed(42)
///     .build()?;
/// let result = knn.run(&computer, &TerminationFlag::new())?;
/// assert!(result.ran_iterations() >= 1);
/// assert_eq!(result.total_pair_count(), 40);
/// # Ok::<(), knng_core::KnnError>(())
/// ```
#[derive(Clone, Debug)]
pub struct Knn {
    params: KnnParams,
}

impl Knn {
    pub(crate) const fn new(params: KnnParams) -> Self {
        Self { params }
    }

    /// Returns the validated parameters of this computation.
    #[must_use]
    pub fn params(&self) -> &KnnParams {
        &self.params
    }

    /// Builds the approximate k-NN graph of every node known to `computer`.
    ///
    /// Fewer than two nodes, or `top_k == 0`, yield [`KnnResult::empty`]
    /// without evaluating any similarity.
    ///
    /// # Errors
    /// Returns [`crate::KnnError::Terminated`] once `termination` is
    /// signalled, [`crate::KnnError::MissingSimilarity`] when a computer
    /// with a fail-fast missing-data policy reports an undefined similarity
    /// during initialisation or the first iteration, and
    /// [`crate::KnnError::ThreadPool`] when the worker pool cannot start.
    #[instrument(
        name = "knn.run",
        err,
        skip(self, computer, termination),
        fields(
            computer = %computer.name(),
            nodes = computer.node_count(),
            top_k = self.params.top_k,
            concurrency = self.params.concurrency,
        ),
    )]
    pub fn run<C: SimilarityComputer + ?Sized>(
        &self,
        computer: &C,
        termination: &TerminationFlag,
    ) -> Result<KnnResult> {
        let node_count = computer.node_count();
        let k = self.params.effective_k(node_count);
        if k == 0 {
            warn!(
                computer = computer.name(),
                nodes = node_count,
                top_k = self.params.top_k,
                "degenerate input, returning empty result"
            );
            return Ok(KnnResult::empty(node_count));
        }

        let seeds = StreamSeeds::from_option(self.params.random_seed);
        debug!(seed = seeds.base_seed(), "random streams seeded");
        let scheduler = Scheduler::new(node_count, self.params.concurrency)?;
        let lists: Vec<NeighbourList> = (0..node_count)
            .map(|node| NeighbourList::new(node, k))
            .collect();
        let ctx = RunContext {
            computer,
            params: &self.params,
            lists: &lists,
            scheduler: &scheduler,
            seeds,
            termination,
            k,
            sampled_k: self.params.sampled_k(k),
        };

        let mut pairs_considered = initialize(&ctx)?.pairs_considered;
        record_pairs(pairs_considered);

        let mut controller = ConvergenceController::new(
            self.params.sample_rate,
            k,
            node_count,
            self.params.delta_threshold,
            self.params.max_iterations,
        );
        let mut iteration = 0;
        while !controller.state().is_terminal() {
            iteration += 1;
            let tally = iterate(&ctx, iteration, controller.update_threshold())?;
            pairs_considered += tally.pairs_considered;
            controller.record(tally.updates);
        }

        let did_converge = controller.did_converge();
        info!(
            iterations = controller.ran_iterations(),
            did_converge,
            pairs_considered,
            "nn-descent completed"
        );
        Ok(KnnResult::computed(
            lists,
            controller.ran_iterations(),
            did_converge,
            pairs_considered,
        ))
    }
}

#[instrument(
    name = "knn.iteration",
    err,
    skip(ctx),
    fields(iteration = iteration, updates = tracing::field::Empty),
)]
fn iterate<C: SimilarityComputer + ?Sized>(
    ctx: &RunContext<'_, C>,
    iteration: usize,
    update_threshold: u64,
) -> Result<Tally> {
    let samples = split(ctx, iteration)?;
    let candidates = reverse(ctx, iteration, samples)?;
    let tally = join(ctx, iteration, &candidates)?;
    tracing::Span::current().record("updates", tally.updates);
    debug!(
        updates = tally.updates,
        update_threshold,
        pairs_considered = tally.pairs_considered,
        "iteration finished"
    );
    record_iteration(tally);
    Ok(tally)
}

#[cfg(feature = "metrics")]
fn record_iteration(tally: Tally) {
    metrics::counter!("knn_iterations_total").increment(1);
    metrics::counter!("knn_join_updates_total").increment(tally.updates as u64);
    record_pairs(tally.pairs_considered);
}

#[cfg(not(feature = "metrics"))]
fn record_iteration(_tally: Tally) {}

#[cfg(feature = "metrics")]
fn record_pairs(pairs: u64) {
    metrics::counter!("knn_node_pairs_considered_total").increment(pairs);
}

#[cfg(not(feature = "metrics"))]
fn record_pairs(_pairs: u64) {}

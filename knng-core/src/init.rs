//! Random population of every neighbour list before the first iteration.

use tracing::{debug, instrument};

use crate::{
    Result,
    context::{RunContext, Tally},
    sampling::sample_other_nodes,
    similarity::SimilarityComputer,
    termination::Phase,
};

/// Offers `k` distinct random candidates to every node's list.
///
/// Undefined similarities are skipped, or abort the run when the computer
/// treats missing data as fatal.
#[instrument(name = "knn.initialize", err, skip(ctx), fields(nodes = ctx.node_count(), k = ctx.k))]
pub(crate) fn initialize<C: SimilarityComputer + ?Sized>(ctx: &RunContext<'_, C>) -> Result<Tally> {
    let node_count = ctx.node_count();
    let tallies = ctx.for_each_partition(Phase::Initialize, 0, |partition, rng| {
        let mut tally = Tally::default();
        for node in partition.nodes() {
            ctx.check(Phase::Initialize)?;
            let candidates: Vec<usize> = sample_other_nodes(rng, node_count, node, ctx.k).collect();
            for candidate in candidates {
                tally.pairs_considered += 1;
                if let Some(similarity) = ctx.similarity(node, candidate, true)? {
                    ctx.offer(node, candidate, similarity, rng)?;
                }
            }
        }
        Ok(tally)
    })?;
    let tally: Tally = tallies.into_iter().sum();
    debug!(pairs_considered = tally.pairs_considered, "neighbour lists initialised");
    Ok(tally)
}

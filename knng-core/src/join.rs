//! Local joins between sampled neighbours, plus random exploration joins.

use rand::Rng;

use crate::{
    Result,
    context::{RunContext, Tally},
    sampling::sample_other_nodes,
    similarity::SimilarityComputer,
    split::NodeSample,
    termination::Phase,
};

/// Performs the local join of every node and returns the summed tally.
///
/// For node `v`, every pair drawn from `new(v) x new(v)` and
/// `new(v) x old(v)` is offered in both directions using one similarity
/// evaluation, and `v` itself is offered to each of its new neighbours.
/// Afterwards `random_joins` uniformly drawn nodes are offered to `v`;
/// those insertions do not count as updates.
///
/// Undefined similarities abort the run during the first iteration when
/// the computer treats missing data as fatal.
pub(crate) fn join<C: SimilarityComputer + ?Sized>(
    ctx: &RunContext<'_, C>,
    iteration: usize,
    samples: &[NodeSample],
) -> Result<Tally> {
    let strict = iteration == 1;
    let tallies = ctx.for_each_partition(Phase::Join, iteration, |partition, rng| {
        let mut joiner = Joiner {
            ctx,
            strict,
            tally: Tally::default(),
        };
        for node in partition.nodes() {
            ctx.check(Phase::Join)?;
            joiner.local_join(node, &samples[node], rng)?;
            joiner.random_join(node, rng)?;
        }
        Ok(joiner.tally)
    })?;
    Ok(tallies.into_iter().sum())
}

struct Joiner<'c, 'a, C: SimilarityComputer + ?Sized> {
    ctx: &'c RunContext<'a, C>,
    strict: bool,
    tally: Tally,
}

impl<C: SimilarityComputer + ?Sized> Joiner<'_, '_, C> {
    fn local_join<R: Rng + ?Sized>(
        &mut self,
        node: usize,
        sample: &NodeSample,
        rng: &mut R,
    ) -> Result<()> {
        for (position, &first) in sample.new.iter().enumerate() {
            for &second in &sample.new[position + 1..] {
                self.join_pair(first, second, rng)?;
            }
            for &second in &sample.old {
                self.join_pair(first, second, rng)?;
            }
            if first != node {
                self.tally.pairs_considered += 1;
                if let Some(similarity) = self.ctx.similarity(first, node, self.strict)? {
                    self.count(self.ctx.offer(first, node, similarity, rng)?);
                }
            }
        }
        Ok(())
    }

    fn join_pair<R: Rng + ?Sized>(&mut self, first: usize, second: usize, rng: &mut R) -> Result<()> {
        if first == second {
            return Ok(());
        }
        self.tally.pairs_considered += 1;
        let Some(similarity) = self.ctx.similarity(first, second, self.strict)? else {
            return Ok(());
        };
        self.count(self.ctx.offer(first, second, similarity, rng)?);
        self.count(self.ctx.offer(second, first, similarity, rng)?);
        Ok(())
    }

    fn random_join<R: Rng + ?Sized>(&mut self, node: usize, rng: &mut R) -> Result<()> {
        let amount = self.ctx.params.random_joins;
        if amount == 0 {
            return Ok(());
        }
        let candidates: Vec<usize> =
            sample_other_nodes(rng, self.ctx.node_count(), node, amount).collect();
        for candidate in candidates {
            self.tally.pairs_considered += 1;
            if let Some(similarity) = self.ctx.similarity(node, candidate, self.strict)? {
                self.ctx.offer(node, candidate, similarity, rng)?;
            }
        }
        Ok(())
    }

    fn count(&mut self, accepted: bool) {
        self.tally.updates += usize::from(accepted);
    }
}

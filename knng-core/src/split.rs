//! Old/new sampling and reversal of the sampled neighbour relation.

use crate::{
    Result,
    context::RunContext,
    neighbour_list::Sampled,
    sampling::sample_slice,
    similarity::SimilarityComputer,
    termination::Phase,
};

/// Sampled neighbours of one node for the current iteration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct NodeSample {
    pub(crate) old: Vec<usize>,
    pub(crate) new: Vec<usize>,
}

/// Samples up to `sampled_k` old and new neighbours of every node.
///
/// Sampled new entries become checked. The returned vector is indexed by
/// node.
pub(crate) fn split<C: SimilarityComputer + ?Sized>(
    ctx: &RunContext<'_, C>,
    iteration: usize,
) -> Result<Vec<NodeSample>> {
    let per_partition = ctx.for_each_partition(Phase::Split, iteration, |partition, rng| {
        partition
            .nodes()
            .map(|node| {
                ctx.check(Phase::Split)?;
                let list = &ctx.lists[node];
                let old = list.sample(Sampled::Old, ctx.sampled_k, rng)?;
                let new = list.sample(Sampled::New, ctx.sampled_k, rng)?;
                Ok(NodeSample { old, new })
            })
            .collect::<Result<Vec<_>>>()
    })?;
    Ok(per_partition.into_iter().flatten().collect())
}

/// Extends every node's sample with a bounded draw from its reverse
/// neighbours.
///
/// `u` is a reverse old (new) neighbour of `v` when `v` appears in `u`'s
/// old (new) sample. Reverse neighbours already present in the forward
/// sample are kept, so a candidate may appear twice.
pub(crate) fn reverse<C: SimilarityComputer + ?Sized>(
    ctx: &RunContext<'_, C>,
    iteration: usize,
    samples: Vec<NodeSample>,
) -> Result<Vec<NodeSample>> {
    let edges = ctx.for_each_partition(Phase::Reverse, iteration, |partition, _rng| {
        let mut edges = Vec::new();
        for node in partition.nodes() {
            ctx.check(Phase::Reverse)?;
            let sample = &samples[node];
            edges.extend(sample.old.iter().map(|&target| (target, node, Sampled::Old)));
            edges.extend(sample.new.iter().map(|&target| (target, node, Sampled::New)));
        }
        Ok(edges)
    })?;

    let reversed = invert(ctx, samples.len(), edges)?;

    let merged = ctx.for_each_partition(Phase::Reverse, iteration, |partition, rng| {
        partition
            .nodes()
            .map(|node| {
                ctx.check(Phase::Reverse)?;
                let forward = &samples[node];
                let backward = &reversed[node];
                let mut old = forward.old.clone();
                old.extend(sample_slice(rng, &backward.old, ctx.sampled_k));
                let mut new = forward.new.clone();
                new.extend(sample_slice(rng, &backward.new, ctx.sampled_k));
                Ok(NodeSample { old, new })
            })
            .collect::<Result<Vec<_>>>()
    })?;
    Ok(merged.into_iter().flatten().collect())
}

type ReverseEdge = (usize, usize, Sampled);

/// Groups per-partition `(target, source, kind)` edges by target.
fn invert<C: SimilarityComputer + ?Sized>(
    ctx: &RunContext<'_, C>,
    node_count: usize,
    edges: Vec<Vec<ReverseEdge>>,
) -> Result<Vec<NodeSample>> {
    let mut reversed = vec![NodeSample::default(); node_count];
    for partition_edges in edges {
        ctx.check(Phase::Reverse)?;
        for (target, source, kind) in partition_edges {
            let entry = &mut reversed[target];
            match kind {
                Sampled::Old => entry.old.push(source),
                Sampled::New => entry.new.push(source),
            }
        }
    }
    Ok(reversed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        TerminationFlag,
        error::KnnError,
        init::initialize,
        test_utils::{RunFixture, line_similarity},
    };
    use rstest::rstest;

    #[rstest]
    fn first_split_only_samples_new_entries() {
        let computer = line_similarity(10);
        let fixture = RunFixture::new(&computer, 4, 1);
        let ctx = fixture.context();
        initialize(&ctx).expect("initialise");

        let samples = split(&ctx, 1).expect("split");
        assert_eq!(samples.len(), 10);
        for sample in &samples {
            assert!(sample.old.is_empty());
            assert!(sample.new.len() <= ctx.sampled_k);
        }
        assert!(samples.iter().any(|sample| !sample.new.is_empty()));

        let second = split(&ctx, 2).expect("split");
        assert!(second.iter().any(|sample| !sample.old.is_empty()));
    }

    #[rstest]
    fn reverse_adds_nodes_listing_the_target() {
        let computer = line_similarity(6);
        let fixture = RunFixture::new(&computer, 2, 1);
        let ctx = fixture.context();
        let samples = vec![
            NodeSample { old: vec![], new: vec![1] },
            NodeSample { old: vec![2], new: vec![] },
            NodeSample::default(),
            NodeSample::default(),
            NodeSample::default(),
            NodeSample::default(),
        ];
        let merged = reverse(&ctx, 1, samples).expect("reverse");
        assert_eq!(merged[0].new, vec![1]);
        assert_eq!(merged[1].new, vec![0]);
        assert_eq!(merged[1].old, vec![2]);
        assert_eq!(merged[2].old, vec![1]);
        assert!(merged[3].old.is_empty() && merged[3].new.is_empty());
    }

    #[rstest]
    fn split_observes_termination() {
        let computer = line_similarity(6);
        let fixture = RunFixture::new(&computer, 2, 1);
        let flag = TerminationFlag::new();
        flag.terminate();
        let ctx = fixture.context_with(&flag);
        let err = split(&ctx, 1).expect_err("terminated");
        assert_eq!(err, KnnError::Terminated { phase: Phase::Split });
    }

    #[rstest]
    fn inversion_observes_termination() {
        let computer = line_similarity(4);
        let fixture = RunFixture::new(&computer, 2, 1);
        let flag = TerminationFlag::new();
        flag.terminate();
        let ctx = fixture.context_with(&flag);
        let edges = vec![vec![(1, 0, Sampled::New)], vec![(0, 2, Sampled::Old)]];
        let err = invert(&ctx, 4, edges).expect_err("terminated");
        assert_eq!(err, KnnError::Terminated { phase: Phase::Reverse });
    }
}

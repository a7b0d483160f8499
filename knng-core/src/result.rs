//! Result types for k-NN graph computations.
//!
//! A [`KnnResult`] owns the final neighbour lists together with the run
//! metadata. Degenerate inputs produce a distinct empty graph that answers
//! every query in constant time.

use crate::neighbour_list::{Neighbour, NeighbourList};

/// Directed edge of the k-NN graph.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimilarityPair {
    /// Node owning the neighbour list.
    pub source: usize,
    /// Neighbour of [`SimilarityPair::source`].
    pub target: usize,
    /// Similarity between the two nodes.
    pub similarity: f64,
}

#[derive(Debug)]
enum SimilarityGraph {
    Empty { node_count: usize },
    Computed(Vec<NeighbourList>),
}

/// Represents the output of a [`crate::Knn::run`] invocation.
///
/// # Examples
/// ```
/// use knng_core::{KnnBuilder, ScalarSimilarity, TerminationFlag};
///
/// let computer = ScalarSimilarity::new("values", vec![Some(1.0), Some(2.0), Some(4.0)]);
/// let knn = KnnBuilder::new().with_top_k(1).with_concurrency(1).with_random_seed(3).build()?;
/// let result = knn.run(&computer, &TerminationFlag::new())?;
/// assert_eq!(result.neighbours_of(0).collect::<Vec<_>>(), vec![1]);
/// assert_eq!(result.total_pair_count(), 3);
/// # Ok::<(), knng_core::KnnError>(())
/// ```
#[derive(Debug)]
pub struct KnnResult {
    graph: SimilarityGraph,
    ran_iterations: usize,
    did_converge: bool,
    node_pairs_considered: u64,
}

impl KnnResult {
    /// Builds the always-empty result returned for degenerate inputs.
    ///
    /// # Examples
    /// ```
    /// use knng_core::KnnResult;
    ///
    /// let result = KnnResult::empty(1);
    /// assert_eq!(result.node_count(), 1);
    /// assert_eq!(result.total_pair_count(), 0);
    /// assert!(!result.did_converge());
    /// ```
    #[must_use]
    pub fn empty(node_count: usize) -> Self {
        Self {
            graph: SimilarityGraph::Empty { node_count },
            ran_iterations: 0,
            did_converge: false,
            node_pairs_considered: 0,
        }
    }

    pub(crate) fn computed(
        lists: Vec<NeighbourList>,
        ran_iterations: usize,
        did_converge: bool,
        node_pairs_considered: u64,
    ) -> Self {
        Self {
            graph: SimilarityGraph::Computed(lists),
            ran_iterations,
            did_converge,
            node_pairs_considered,
        }
    }

    /// Number of nodes in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        match &self.graph {
            SimilarityGraph::Empty { node_count } => *node_count,
            SimilarityGraph::Computed(lists) => lists.len(),
        }
    }

    /// Returns whether this is the degenerate empty result.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self.graph, SimilarityGraph::Empty { .. })
    }

    /// Iterations executed before the run stopped.
    #[must_use]
    pub fn ran_iterations(&self) -> usize {
        self.ran_iterations
    }

    /// Whether the run stopped because the update count fell to the
    /// convergence threshold.
    #[must_use]
    pub fn did_converge(&self) -> bool {
        self.did_converge
    }

    /// Number of similarity evaluations performed by the run.
    #[must_use]
    pub fn node_pairs_considered(&self) -> u64 {
        self.node_pairs_considered
    }

    /// Neighbour ids of `node`, most similar first.
    ///
    /// Each call re-reads the stored list. Unknown nodes have no neighbours.
    pub fn neighbours_of(&self, node: usize) -> impl Iterator<Item = usize> + use<> {
        self.neighbours(node).into_iter().map(|neighbour| neighbour.id)
    }

    /// Neighbours of `node` with their similarities, most similar first.
    #[must_use]
    pub fn neighbours(&self, node: usize) -> Vec<Neighbour> {
        self.lists()
            .get(node)
            .map(NeighbourList::snapshot)
            .unwrap_or_default()
    }

    /// Lazily flattens every neighbour list into `(source, target,
    /// similarity)` triples, ordered by source and then by descending
    /// similarity.
    ///
    /// Reading a list resets the checked flag of its entries.
    pub fn similarity_pairs(&self) -> impl Iterator<Item = SimilarityPair> + '_ {
        self.lists()
            .iter()
            .enumerate()
            .flat_map(|(source, list)| {
                list.snapshot_clearing_checked()
                    .into_iter()
                    .map(move |neighbour| SimilarityPair {
                        source,
                        target: neighbour.id,
                        similarity: neighbour.similarity,
                    })
            })
    }

    /// Total number of stored edges across all neighbour lists.
    #[must_use]
    pub fn total_pair_count(&self) -> usize {
        self.lists().iter().map(NeighbourList::len).sum()
    }

    fn lists(&self) -> &[NeighbourList] {
        match &self.graph {
            SimilarityGraph::Empty { .. } => &[],
            SimilarityGraph::Computed(lists) => lists,
        }
    }
}

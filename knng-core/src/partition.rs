//! Partitioned execution of per-node phases.
//!
//! The node range is cut into contiguous [`Partition`]s, several per worker,
//! and each phase maps every partition to a result on a dedicated rayon
//! pool. Collecting the results is the phase barrier. A single worker runs
//! the partitions in order on the calling thread.

use std::ops::Range;

use rayon::{ThreadPool, ThreadPoolBuilder, prelude::*};

use crate::error::{KnnError, Result};

/// Partitions created per worker to even out uneven node costs.
const PARTITIONS_PER_WORKER: usize = 4;

/// Contiguous slice of the node identifier space.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Partition {
    index: usize,
    start: usize,
    end: usize,
}

impl Partition {
    /// Position of this partition, used to derive its random stream.
    #[rustfmt::skip]
    pub(crate) const fn index(self) -> usize { self.index }

    pub(crate) const fn nodes(self) -> Range<usize> {
        self.start..self.end
    }
}

/// Splits `[0, node_count)` into contiguous, non-empty partitions.
pub(crate) fn partition_nodes(node_count: usize, concurrency: usize) -> Vec<Partition> {
    if node_count == 0 {
        return Vec::new();
    }
    let count = concurrency
        .max(1)
        .saturating_mul(PARTITIONS_PER_WORKER)
        .min(node_count);
    let boundary = |index: usize| index * node_count / count;
    (0..count)
        .map(|index| Partition {
            index,
            start: boundary(index),
            end: boundary(index + 1),
        })
        .collect()
}

/// Runs per-partition tasks for one NN-Descent computation.
pub(crate) struct Scheduler {
    pool: Option<ThreadPool>,
    partitions: Vec<Partition>,
}

impl Scheduler {
    /// Creates a scheduler over `node_count` nodes.
    ///
    /// # Errors
    /// Returns [`KnnError::ThreadPool`] when the worker pool cannot be built.
    pub(crate) fn new(node_count: usize, concurrency: usize) -> Result<Self> {
        let pool = if concurrency > 1 {
            let pool = ThreadPoolBuilder::new()
                .num_threads(concurrency)
                .thread_name(|index| format!("knng-worker-{index}"))
                .build()
                .map_err(|err| KnnError::ThreadPool {
                    concurrency,
                    message: err.to_string(),
                })?;
            Some(pool)
        } else {
            None
        };
        Ok(Self {
            pool,
            partitions: partition_nodes(node_count, concurrency),
        })
    }

    pub(crate) fn partitions(&self) -> &[Partition] {
        &self.partitions
    }

    /// Applies `task` to every partition and blocks until all complete.
    ///
    /// Results are returned in partition order. The first error observed
    /// is returned once every in-flight task has stopped.
    pub(crate) fn run<T, F>(&self, task: F) -> Result<Vec<T>>
    where
        T: Send,
        F: Fn(Partition) -> Result<T> + Sync,
    {
        match &self.pool {
            None => self.partitions.iter().copied().map(task).collect(),
            Some(pool) => pool.install(|| {
                self.partitions
                    .par_iter()
                    .copied()
                    .map(|partition| task(partition))
                    .collect()
            }),
        }
    }
}

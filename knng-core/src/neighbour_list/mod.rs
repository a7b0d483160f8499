//! Bounded, lock-protected neighbour lists.
//!
//! Each node owns one [`NeighbourList`] holding at most `capacity` entries
//! ranked by similarity. Entries are kept sorted in descending order so the
//! eviction candidate (the minimum) is always the last element. Every
//! mutation holds the list's own mutex for the whole
//! check-evict-insert sequence; no operation ever locks two lists.

use std::{
    cmp::Ordering,
    sync::{Mutex, MutexGuard, PoisonError},
};

use rand::{Rng, seq::index};

use crate::error::{KnnError, Result};

/// Neighbour reported by a finished computation.
///
/// # Examples
/// ```
/// use knng_core::Neighbour;
///
/// let neighbour = Neighbour { id: 3, similarity: 0.9 };
/// assert_eq!(neighbour.id, 3);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Neighbour {
    /// Identifier of the neighbouring node.
    pub id: usize,
    /// Similarity between the owning node and [`Neighbour::id`].
    pub similarity: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Entry {
    id: usize,
    similarity: f64,
    checked: bool,
}

/// Which entries a sampling pass selects from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Sampled {
    /// Entries already used as join sources.
    Old,
    /// Entries not yet used as join sources; sampling marks them checked.
    New,
}

impl Sampled {
    const fn matches(self, checked: bool) -> bool {
        match self {
            Self::Old => checked,
            Self::New => !checked,
        }
    }
}

/// Concurrency-safe ranked container of up to `capacity` neighbours.
#[derive(Debug)]
pub(crate) struct NeighbourList {
    owner: usize,
    capacity: usize,
    entries: Mutex<Vec<Entry>>,
}

impl NeighbourList {
    pub(crate) fn new(owner: usize, capacity: usize) -> Self {
        Self {
            owner,
            capacity,
            entries: Mutex::new(Vec::with_capacity(capacity)),
        }
    }

    /// Returns the number of stored entries.
    pub(crate) fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns the entries in descending similarity order.
    pub(crate) fn snapshot(&self) -> Vec<Neighbour> {
        self.read().iter().map(Entry::neighbour).collect()
    }

    /// Returns the entries in descending order and resets every entry to
    /// unchecked.
    pub(crate) fn snapshot_clearing_checked(&self) -> Vec<Neighbour> {
        let mut entries = self.read();
        entries
            .iter_mut()
            .map(|entry| {
                entry.checked = false;
                entry.neighbour()
            })
            .collect()
    }

    /// Inserts `candidate` if it improves the list.
    ///
    /// Returns `Ok(true)` when the candidate was stored. A candidate already
    /// present is ignored. When the list is full the candidate must beat the
    /// current minimum; a candidate tying the minimum replaces it with
    /// probability `perturbation_rate`, drawn from `rng`.
    ///
    /// # Errors
    /// Returns [`KnnError::InvariantViolation`] for self-loops or undefined
    /// similarities, and [`KnnError::LockPoisoned`] when the list mutex is
    /// poisoned.
    pub(crate) fn try_insert<R: Rng + ?Sized>(
        &self,
        candidate: usize,
        similarity: f64,
        perturbation_rate: f64,
        rng: &mut R,
    ) -> Result<bool> {
        if candidate == self.owner {
            return Err(KnnError::InvariantViolation {
                message: format!("node {candidate} cannot be its own neighbour"),
            });
        }
        if similarity.is_nan() {
            return Err(KnnError::InvariantViolation {
                message: format!(
                    "undefined similarity offered to node {} for candidate {candidate}",
                    self.owner
                ),
            });
        }

        let mut entries = self.write()?;
        if entries.iter().any(|entry| entry.id == candidate) {
            return Ok(false);
        }

        if entries.len() >= self.capacity {
            let Some(minimum) = entries.last().map(|entry| entry.similarity) else {
                return Ok(false);
            };
            let accept = match similarity.total_cmp(&minimum) {
                Ordering::Greater => true,
                Ordering::Equal => perturbation_rate > 0.0 && rng.gen_bool(perturbation_rate),
                Ordering::Less => false,
            };
            if !accept {
                return Ok(false);
            }
            entries.pop();
        }

        let position = entries.partition_point(|entry| entry.similarity >= similarity);
        entries.insert(
            position,
            Entry {
                id: candidate,
                similarity,
                checked: false,
            },
        );
        if entries.len() > self.capacity {
            return Err(KnnError::InvariantViolation {
                message: format!(
                    "neighbour list of node {} holds {} entries but capacity is {}",
                    self.owner,
                    entries.len(),
                    self.capacity
                ),
            });
        }
        Ok(true)
    }

    /// Draws up to `max_size` entries of the requested kind.
    ///
    /// A list with `m` matching entries yields exactly `min(max_size, m)` of
    /// them, chosen uniformly without regard to rank, and returned in list
    /// order. Sampled new entries are marked checked.
    ///
    /// # Errors
    /// Returns [`KnnError::LockPoisoned`] when the list mutex is poisoned.
    pub(crate) fn sample<R: Rng + ?Sized>(
        &self,
        kind: Sampled,
        max_size: usize,
        rng: &mut R,
    ) -> Result<Vec<usize>> {
        let mut entries = self.write()?;
        let positions: Vec<usize> = entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| kind.matches(entry.checked))
            .map(|(position, _)| position)
            .collect();
        if positions.is_empty() || max_size == 0 {
            return Ok(Vec::new());
        }

        let chosen = if max_size >= positions.len() {
            positions
        } else {
            let mut slots = index::sample(rng, positions.len(), max_size).into_vec();
            slots.sort_unstable();
            slots.into_iter().map(|slot| positions[slot]).collect()
        };
        Ok(chosen
            .into_iter()
            .map(|position| {
                let entry = &mut entries[position];
                if kind == Sampled::New {
                    entry.checked = true;
                }
                entry.id
            })
            .collect())
    }

    fn write(&self) -> Result<MutexGuard<'_, Vec<Entry>>> {
        self.entries.lock().map_err(|_| KnnError::LockPoisoned {
            resource: "neighbour list mutex",
        })
    }

    // Reads happen after the parallel phases have joined, so a poisoned
    // mutex can only hold a completed mutation.
    fn read(&self) -> MutexGuard<'_, Vec<Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Entry {
    const fn neighbour(&self) -> Neighbour {
        Neighbour {
            id: self.id,
            similarity: self.similarity,
        }
    }
}

#[cfg(test)]
mod tests;

//! Cooperative cancellation for long-running k-NN computations.
//!
//! A [`TerminationFlag`] is shared between the caller and the worker pool.
//! Every phase polls it at least once per processed node and converts an
//! observed signal into [`KnnError::Terminated`].

use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use crate::error::{KnnError, Result};

/// Phases of an NN-Descent run, in execution order.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Phase {
    /// Random population of every neighbour list.
    Initialize,
    /// Sampling of old and new neighbours.
    Split,
    /// Inversion of the sampled neighbour relation.
    Reverse,
    /// Local joins between sampled neighbours.
    Join,
}

impl Phase {
    /// Returns the lower-case label used in logs and error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Initialize => "initialize",
            Self::Split => "split",
            Self::Reverse => "reverse",
            Self::Join => "join",
        }
    }

    pub(crate) const fn stream_tag(self) -> u64 {
        match self {
            Self::Initialize => 1,
            Self::Split => 2,
            Self::Reverse => 3,
            Self::Join => 4,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shared, cloneable "still running" signal.
///
/// # Examples
/// ```
/// use knng_core::TerminationFlag;
///
/// let flag = TerminationFlag::new();
/// let handle = flag.clone();
/// assert!(flag.running());
/// handle.terminate();
/// assert!(!flag.running());
/// ```
#[derive(Clone, Debug, Default)]
pub struct TerminationFlag {
    terminated: Arc<AtomicBool>,
}

impl TerminationFlag {
    /// Creates a flag in the running state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Signals every holder of this flag to stop.
    pub fn terminate(&self) {
        self.terminated.store(true, Ordering::Release);
    }

    /// Returns `true` until [`Self::terminate`] has been called.
    #[must_use]
    pub fn running(&self) -> bool {
        !self.terminated.load(Ordering::Acquire)
    }

    /// Fails with [`KnnError::Terminated`] once termination was requested.
    ///
    /// # Errors
    /// Returns [`KnnError::Terminated`] tagged with `phase` when the flag is set.
    pub fn check(&self, phase: Phase) -> Result<()> {
        if self.running() {
            Ok(())
        } else {
            Err(KnnError::Terminated { phase })
        }
    }
}

//! Convergence tracking for NN-Descent iterations.

/// Lifecycle of a run's iteration loop.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConvergenceState {
    /// More iterations are required.
    Running,
    /// The last iteration produced at most the threshold number of updates.
    Converged,
    /// The iteration budget ran out before convergence.
    MaxIterationsReached,
}

impl ConvergenceState {
    /// Returns whether the loop should stop.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Running)
    }
}

/// Decides after each iteration whether the run has converged.
///
/// `max_updates = ceil(sample_rate * k * n)` bounds the useful updates of
/// one iteration; the run converges once an iteration accepts at most
/// `floor(delta_threshold * max_updates)` of them.
///
/// # Examples
/// ```
/// use knng_core::{ConvergenceController, ConvergenceState};
///
/// let mut controller = ConvergenceController::new(0.5, 10, 100, 0.001, 5);
/// assert_eq!(controller.update_threshold(), 0);
/// assert_eq!(controller.record(12), ConvergenceState::Running);
/// assert_eq!(controller.record(0), ConvergenceState::Converged);
/// assert_eq!(controller.ran_iterations(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct ConvergenceController {
    max_iterations: usize,
    update_threshold: u64,
    ran_iterations: usize,
    state: ConvergenceState,
}

impl ConvergenceController {
    /// Creates a controller for a graph of `node_count` nodes with
    /// neighbour lists of size `k`.
    #[must_use]
    pub fn new(
        sample_rate: f64,
        k: usize,
        node_count: usize,
        delta_threshold: f64,
        max_iterations: usize,
    ) -> Self {
        let max_updates = (sample_rate * k as f64 * node_count as f64).ceil();
        let update_threshold = (delta_threshold * max_updates).floor() as u64;
        Self {
            max_iterations,
            update_threshold,
            ran_iterations: 0,
            state: ConvergenceState::Running,
        }
    }

    /// Update count at or below which an iteration counts as converged.
    #[must_use]
    #[rustfmt::skip]
    pub fn update_threshold(&self) -> u64 { self.update_threshold }

    /// Iterations recorded so far.
    #[must_use]
    #[rustfmt::skip]
    pub fn ran_iterations(&self) -> usize { self.ran_iterations }

    /// Current state.
    #[must_use]
    #[rustfmt::skip]
    pub fn state(&self) -> ConvergenceState { self.state }

    /// Records the update count of a finished iteration and returns the
    /// resulting state. Terminal states are sticky.
    pub fn record(&mut self, updates: usize) -> ConvergenceState {
        if self.state.is_terminal() {
            return self.state;
        }
        self.ran_iterations += 1;
        self.state = if updates as u64 <= self.update_threshold {
            ConvergenceState::Converged
        } else if self.ran_iterations >= self.max_iterations {
            ConvergenceState::MaxIterationsReached
        } else {
            ConvergenceState::Running
        };
        self.state
    }

    /// Returns whether the run finished by converging.
    #[must_use]
    pub fn did_converge(&self) -> bool {
        self.state == ConvergenceState::Converged
    }
}

use phagefit_core::Snapshot;

/// Indicates how the solver terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Completed all requested steps.
    Complete,

    /// Stopped early due to an observer action.
    StoppedByObserver,
}

/// The result of an Euler integration.
#[derive(Debug, Clone)]
pub struct Solution<I, O> {
    /// How the solver terminated.
    pub status: Status,

    /// Snapshots from each step, starting with the initial state.
    pub history: Vec<Snapshot<I, O>>,

    /// Number of integration steps completed.
    pub steps: usize,
}

impl<I, O> Solution<I, O> {
    /// Returns the last recorded snapshot.
    ///
    /// The history of a solution returned by [`super::solve`] always holds at
    /// least the initial snapshot.
    #[must_use]
    pub fn final_snapshot(&self) -> &Snapshot<I, O> {
        &self.history[self.history.len() - 1]
    }
}

/// The last snapshot of an Euler integration run by [`super::solve_to_end`].
#[derive(Debug, Clone)]
pub struct Endpoint<I, O> {
    /// How the solver terminated.
    pub status: Status,

    /// The snapshot after the last completed step.
    pub snapshot: Snapshot<I, O>,

    /// Number of integration steps completed.
    pub steps: usize,
}

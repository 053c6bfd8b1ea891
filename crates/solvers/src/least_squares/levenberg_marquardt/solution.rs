use phagefit_core::Snapshot;

use crate::least_squares::Evaluation;

/// Indicates how the search terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// A gradient, step, or cost-reduction tolerance was met.
    Converged,

    /// Reached the iteration limit without converging.
    MaxIters,

    /// The damping exceeded its ceiling without finding an acceptable step.
    Stalled,

    /// Stopped early due to an observer decision.
    StoppedByObserver,
}

/// The result of a Levenberg–Marquardt search.
///
/// Every field describes the best point found, whatever the status.
#[derive(Debug, Clone)]
pub struct Solution<I, O, const N: usize> {
    pub status: Status,

    pub x: [f64; N],

    /// Residuals at `x`.
    pub residuals: Vec<f64>,

    /// Sum of squared residuals at `x`.
    pub cost: f64,

    pub snapshot: Snapshot<I, O>,

    /// Completed iterations.
    pub iters: usize,

    /// Total evaluations, including Jacobian probes and rejected trials.
    pub evals: usize,
}

impl<I, O, const N: usize> Solution<I, O, N> {
    pub(super) fn from_best(
        best: Evaluation<I, O, N>,
        status: Status,
        iters: usize,
        evals: usize,
    ) -> Self {
        Self {
            status,
            x: best.x,
            residuals: best.residuals,
            cost: best.cost,
            snapshot: best.snapshot,
            iters,
            evals,
        }
    }
}

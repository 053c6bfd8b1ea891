use phagefit_core::{LeastSquaresProblem, Model, Observer};

use crate::least_squares::EvalError;

use super::Action;

/// Why the solver evaluated a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    /// The initial guess.
    Initial,

    /// A forward-difference probe for one Jacobian column.
    Jacobian { column: usize },

    /// A damped step from the current best.
    Trial,
}

/// Events emitted by the Levenberg–Marquardt solver, one per evaluation.
///
/// `iter` is 0 for the initial evaluation and counts from 1 afterwards.
/// `best_cost` is the cost of the current best point (infinite before the
/// initial evaluation completes).
pub enum Event<'a, M, P, const N: usize>
where
    M: Model,
    P: LeastSquaresProblem<N, Input = M::Input, Output = M::Output>,
{
    /// Successful evaluation.
    Evaluated {
        probe: Probe,
        iter: usize,
        x: [f64; N],
        cost: f64,
        residuals: &'a [f64],
        input: &'a M::Input,
        output: &'a M::Output,
        best_cost: f64,
    },

    /// Model evaluation failed.
    ModelFailed {
        probe: Probe,
        iter: usize,
        x: [f64; N],
        best_cost: f64,
        error: &'a M::Error,
    },

    /// Problem method failed (input construction or residual computation).
    ProblemFailed {
        probe: Probe,
        iter: usize,
        x: [f64; N],
        best_cost: f64,
        error: &'a P::Error,
    },
}

impl<M, P, const N: usize> Event<'_, M, P, N>
where
    M: Model,
    P: LeastSquaresProblem<N, Input = M::Input, Output = M::Output>,
{
    /// Returns the point that was evaluated (or attempted).
    #[must_use]
    pub fn x(&self) -> &[f64; N] {
        match self {
            Self::Evaluated { x, .. } | Self::ModelFailed { x, .. } | Self::ProblemFailed { x, .. } => {
                x
            }
        }
    }

    #[must_use]
    pub fn probe(&self) -> Probe {
        match self {
            Self::Evaluated { probe, .. }
            | Self::ModelFailed { probe, .. }
            | Self::ProblemFailed { probe, .. } => *probe,
        }
    }

    #[must_use]
    pub fn iter(&self) -> usize {
        match self {
            Self::Evaluated { iter, .. }
            | Self::ModelFailed { iter, .. }
            | Self::ProblemFailed { iter, .. } => *iter,
        }
    }

    /// Returns the cost of the evaluated point, or `None` if evaluation failed.
    #[must_use]
    pub fn cost(&self) -> Option<f64> {
        match self {
            Self::Evaluated { cost, .. } => Some(*cost),
            Self::ModelFailed { .. } | Self::ProblemFailed { .. } => None,
        }
    }

    #[must_use]
    pub fn best_cost(&self) -> f64 {
        match self {
            Self::Evaluated { best_cost, .. }
            | Self::ModelFailed { best_cost, .. }
            | Self::ProblemFailed { best_cost, .. } => *best_cost,
        }
    }

    /// Emits a failure event and returns the observer's action.
    pub(super) fn emit_failure<Obs>(
        probe: Probe,
        iter: usize,
        x: [f64; N],
        best_cost: f64,
        error: &EvalError<M::Error, P::Error>,
        observer: &mut Obs,
    ) -> Option<Action>
    where
        Obs: for<'a> Observer<Event<'a, M, P, N>, Action>,
    {
        match error {
            EvalError::Model(e) => observer.observe(&Event::ModelFailed {
                probe,
                iter,
                x,
                best_cost,
                error: e,
            }),
            EvalError::Problem(e) => observer.observe(&Event::ProblemFailed {
                probe,
                iter,
                x,
                best_cost,
                error: e,
            }),
        }
    }
}

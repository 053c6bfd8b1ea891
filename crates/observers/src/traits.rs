//! Capability traits for cross-solver observers.
//!
//! These traits abstract over solver-specific event and action types, so one
//! observer can serve any solver whose events carry the needed data.
//!
//! # Event traits
//!
//! - [`HasCost`] — events that carry a least-squares cost
//!
//! # Action traits
//!
//! - [`CanStopEarly`] — actions that can signal early termination
//! - [`CanAssumeWorse`] — actions that can mark an evaluation as worse
//!
//! # Example
//!
//! ```rust
//! use phagefit_core::Observer;
//! use phagefit_observers::traits::{CanStopEarly, HasCost};
//!
//! struct EvalBudget {
//!     remaining: usize,
//! }
//!
//! impl<E: HasCost, A: CanStopEarly> Observer<E, A> for EvalBudget {
//!     fn observe(&mut self, _event: &E) -> Option<A> {
//!         self.remaining = self.remaining.saturating_sub(1);
//!         (self.remaining == 0).then(A::stop_early)
//!     }
//! }
//! ```

use phagefit_core::{LeastSquaresProblem, Model};
use phagefit_solvers::{least_squares::levenberg_marquardt, transient::euler};

/// An event that carries a least-squares cost.
pub trait HasCost {
    /// Returns the cost of the evaluated point.
    ///
    /// Returns `f64::NAN` when the event represents an error and no cost is
    /// available.
    fn cost(&self) -> f64;
}

/// An action type that can signal early termination.
pub trait CanStopEarly {
    /// Returns the action that stops the solver early.
    fn stop_early() -> Self;
}

/// An action type that can mark an evaluation as worse than the current best.
pub trait CanAssumeWorse {
    /// Returns the action that treats this evaluation as worse.
    fn assume_worse() -> Self;
}

impl<M, P, const N: usize> HasCost for levenberg_marquardt::Event<'_, M, P, N>
where
    M: Model,
    P: LeastSquaresProblem<N, Input = M::Input, Output = M::Output>,
{
    fn cost(&self) -> f64 {
        levenberg_marquardt::Event::cost(self).unwrap_or(f64::NAN)
    }
}

impl CanStopEarly for levenberg_marquardt::Action {
    fn stop_early() -> Self {
        Self::StopEarly
    }
}

impl CanStopEarly for euler::Action {
    fn stop_early() -> Self {
        Self::StopEarly
    }
}

impl CanAssumeWorse for levenberg_marquardt::Action {
    fn assume_worse() -> Self {
        Self::AssumeWorse
    }
}

//! Bounded Levenberg–Marquardt for nonlinear least squares.
//!
//! # Algorithm
//!
//! Each iteration builds the residual Jacobian `J` at the current best point
//! by forward differences, then solves the damped normal equations
//!
//! ```text
//! (JᵀJ + λ·diag(JᵀJ)) δ = −Jᵀr
//! ```
//!
//! and projects `x + δ` onto the bounds. Components sitting on a bound that
//! the gradient pushes against are frozen first: they take no part in the
//! solve and keep their value for the iteration. A trial that lowers the cost
//! is accepted and `λ` shrinks tenfold; otherwise `λ` grows tenfold and the
//! step is recomputed from the same Jacobian. The cost is `Σ r²`.
//!
//! Every point the solver evaluates, including Jacobian probes, lies inside
//! the bounds: probes step backward when a forward step would leave them.
//!
//! # Termination
//!
//! - [`Status::Converged`] — the projected gradient (`Jᵀr` with frozen
//!   components zeroed) has `‖·‖∞ ≤ g_tol`, or the projected step is no
//!   longer than `x_tol·(x_tol + ‖x‖)`, or an accepted step lowered the cost
//!   by at most `f_tol·cost`.
//! - [`Status::MaxIters`] — the iteration budget ran out.
//! - [`Status::Stalled`] — `λ` exceeded its ceiling without an acceptable step.
//! - [`Status::StoppedByObserver`] — an observer returned [`Action::StopEarly`].
//!
//! In every case the solution holds the best point found. Convergence is
//! local; starting from several guesses is up to the caller.
//!
//! # Observer Events
//!
//! The solver emits one [`Event`] per evaluation, tagged with its [`Probe`]:
//! the initial guess, each Jacobian column, and each trial step. Failed
//! evaluations are reported as [`Event::ModelFailed`] or
//! [`Event::ProblemFailed`] and end the search with an error unless the
//! observer returns an action. See [`Action`] for how each action applies.

mod action;
mod bounds;
mod config;
mod error;
mod evaluator;
mod event;
mod jacobian;
mod normal;
mod search;
mod solution;


pub use action::Action;
pub use bounds::{Bounds, BoundsError};
pub use config::{Config, ConfigError};
pub use error::Error;
pub use event::{Event, Probe};
pub use solution::{Solution, Status};

use phagefit_core::{LeastSquaresProblem, Model, Observer};

use search::search;

/// Minimizes the sum of squared residuals inside `bounds`, starting at `x0`.
///
/// The observer receives an [`Event`] for every evaluation.
///
/// # Errors
///
/// Returns an error if `x0` lies outside `bounds`, if the residual vector is
/// empty or changes length, or if the model or problem fails and the observer
/// does not handle the failure.
pub fn minimize<M, P, Obs, const N: usize>(
    model: &M,
    problem: &P,
    x0: [f64; N],
    bounds: &Bounds<N>,
    config: &Config,
    observer: Obs,
) -> Result<Solution<M::Input, M::Output, N>, Error>
where
    M: Model,
    P: LeastSquaresProblem<N, Input = M::Input, Output = M::Output>,
    Obs: for<'a> Observer<Event<'a, M, P, N>, Action>,
{
    search(model, problem, x0, bounds, config, observer)
}

/// Minimizes the sum of squared residuals without observer support.
///
/// # Errors
///
/// Returns an error if `x0` lies outside `bounds`, if the residual vector is
/// empty or changes length, or if the model or problem fails.
pub fn minimize_unobserved<M, P, const N: usize>(
    model: &M,
    problem: &P,
    x0: [f64; N],
    bounds: &Bounds<N>,
    config: &Config,
) -> Result<Solution<M::Input, M::Output, N>, Error>
where
    M: Model,
    P: LeastSquaresProblem<N, Input = M::Input, Output = M::Output>,
{
    minimize(model, problem, x0, bounds, config, ())
}

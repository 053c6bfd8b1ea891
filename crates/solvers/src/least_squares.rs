//! Solvers for nonlinear least-squares problems.
//!
//! A [`LeastSquaresProblem`] maps solver variables `x: [f64; N]` to model
//! inputs, calls the model, and computes a residual vector. Solvers in this
//! module search for the `x` that minimizes the sum of squared residuals.
//!
//! # Solvers
//!
//! - [`levenberg_marquardt`] — damped Gauss–Newton search inside box bounds
//!
//! [`LeastSquaresProblem`]: phagefit_core::LeastSquaresProblem

mod evaluate;

pub use evaluate::{EvalError, EvaluateResult, Evaluation, evaluate};

pub mod levenberg_marquardt;

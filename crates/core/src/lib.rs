//! Core traits and types for phagefit.
//!
//! This crate defines the shared abstractions that solvers, observers, and
//! population models build on:
//!
//! - [`Model`] — a callable that maps a typed input to a typed output
//! - [`Snapshot`] — a captured input/output pair from a model call
//! - [`Observer`] — receives solver events and optionally returns control actions
//! - [`OdeProblem`] — adapts a model to time integration by extracting a state
//!   and its derivative
//! - [`LeastSquaresProblem`] — adapts a model to parameter estimation by mapping
//!   solver variables to model input and model output to residuals

mod model;
mod observer;
mod problems;
mod step;

pub use observer::Observer;
pub use problems::{LeastSquaresProblem, OdeProblem, least_squares::sum_of_squares};
pub use step::{DerivativeOf, StepIntegrable};
pub use {model::Model, model::Snapshot};

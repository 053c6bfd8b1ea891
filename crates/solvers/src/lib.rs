//! Solvers for phagefit models.
//!
//! - [`transient::euler`] — fixed-step explicit integration with a per-step
//!   finalize hook
//! - [`transient::dopri5`] — adaptive Dormand–Prince 5(4) integration reported
//!   at caller-chosen output times
//! - [`least_squares::levenberg_marquardt`] — bounded nonlinear least squares

pub mod least_squares;
pub mod transient;

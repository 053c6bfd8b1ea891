//! Phage–bacteria population models and their calibration.
//!
//! Two model variants share one pipeline: simulate a known truth, sample it
//! with noise, then recover the parameters by bounded least squares.
//!
//! - [`lumped`] — a three-compartment ODE (free phage, phage–bacteria
//!   complexes, bacteria) integrated adaptively
//! - [`spatial`] — a one-dimensional reaction–diffusion PDE with logistic
//!   bacterial growth, stepped with explicit Euler and clamped nonnegative
//!
//! Each variant provides a context type implementing [`phagefit_core::Model`]
//! (parameters in, sampled prediction out) and a fit type implementing
//! [`phagefit_core::LeastSquaresProblem`], so [`calibration::estimate`] can
//! drive either one.

pub mod calibration;
pub mod grid;
pub mod lumped;
pub mod noise;
pub mod observation;
pub mod spatial;

mod error;
mod parameters;

pub use calibration::{Calibration, FitResult};
pub use error::{ConfigError, Error};
pub use grid::{Grid, TimeGrid};
pub use noise::{GaussianNoise, NoNoise, NoiseSource};
pub use observation::{Layout, ObservationSet};
pub use parameters::ParameterVector;

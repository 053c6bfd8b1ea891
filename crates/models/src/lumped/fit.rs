use std::convert::Infallible;

use log::warn;
use phagefit_core::{LeastSquaresProblem, Model};
use phagefit_solvers::transient::dopri5;

use crate::{
    ConfigError, Error, ParameterVector,
    observation::{Layout, ObservationSet},
};

use super::{LumpedParameters, LumpedState, simulate, simulate::validate_output_times};

/// Lumped observations are flattened time-major.
pub const LAYOUT: Layout = Layout::TimeMajor;

/// Everything needed to predict lumped observations except the parameters.
///
/// As a [`Model`], a context maps candidate parameters to the noiseless
/// observations they predict. An integration failure yields NaN predictions
/// rather than an error, so the optimizer treats the candidate as very poor.
#[derive(Debug, Clone, PartialEq)]
pub struct LumpedContext {
    y0: LumpedState,
    times: Vec<f64>,
    integrator: dopri5::Config,
}

impl LumpedContext {
    /// Creates a prediction context.
    ///
    /// # Errors
    ///
    /// Returns an error if `times` is empty, contains a negative or non-finite
    /// value, or decreases.
    pub fn new(
        y0: LumpedState,
        times: Vec<f64>,
        integrator: dopri5::Config,
    ) -> Result<Self, ConfigError> {
        validate_output_times(&times)?;
        Ok(Self {
            y0,
            times,
            integrator,
        })
    }

    #[must_use]
    pub fn y0(&self) -> &LumpedState {
        &self.y0
    }

    #[must_use]
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    #[must_use]
    pub fn integrator(&self) -> &dopri5::Config {
        &self.integrator
    }

    /// Predicts the noiseless observations for `params`.
    #[must_use]
    pub fn predict(&self, params: &LumpedParameters) -> ObservationSet<3> {
        match simulate(params, self.y0, &self.times, &self.integrator) {
            Ok(trajectory) => trajectory.to_observations(),
            Err(err) => {
                warn!("lumped prediction failed at {params:?}: {err}");
                ObservationSet::undefined(self.times.clone())
            }
        }
    }
}

impl Model for LumpedContext {
    type Input = LumpedParameters;
    type Output = ObservationSet<3>;
    type Error = Infallible;

    fn call(&self, params: &LumpedParameters) -> Result<ObservationSet<3>, Infallible> {
        Ok(self.predict(params))
    }
}

/// Compares lumped predictions against fixed observations.
#[derive(Debug, Clone, PartialEq)]
pub struct LumpedFit {
    observations: ObservationSet<3>,
}

impl LumpedFit {
    /// Creates a fit against `observations` taken at `context`'s times.
    ///
    /// # Errors
    ///
    /// Returns an error if the observation count differs from the number of
    /// output times in `context`.
    pub fn new(context: &LumpedContext, observations: ObservationSet<3>) -> Result<Self, ConfigError> {
        check_count(context, &observations)?;
        Ok(Self { observations })
    }

    #[must_use]
    pub fn observations(&self) -> &ObservationSet<3> {
        &self.observations
    }
}

impl LeastSquaresProblem<5> for LumpedFit {
    type Input = LumpedParameters;
    type Output = ObservationSet<3>;
    type Error = Infallible;

    fn input(&self, x: &[f64; 5]) -> Result<LumpedParameters, Infallible> {
        Ok(LumpedParameters::from_array(*x))
    }

    fn residuals(
        &self,
        _params: &LumpedParameters,
        predicted: &ObservationSet<3>,
    ) -> Result<Vec<f64>, Infallible> {
        Ok(predicted.misfit(&self.observations, LAYOUT))
    }
}

/// Returns `simulated − observed` for a flat `[k, s, d, a, r]` candidate.
///
/// Residuals are time-major; non-finite entries become
/// [`RESIDUAL_PENALTY`](crate::observation::RESIDUAL_PENALTY).
///
/// # Errors
///
/// Returns [`Error::InvalidConfiguration`] if `candidate` does not hold five
/// values or if `observations` does not match `context`'s output times.
pub fn residuals(
    candidate: &[f64],
    context: &LumpedContext,
    observations: &ObservationSet<3>,
) -> Result<Vec<f64>, Error> {
    let params = LumpedParameters::from_slice(candidate)?;
    check_count(context, observations)?;
    Ok(context.predict(&params).misfit(observations, LAYOUT))
}

fn check_count(context: &LumpedContext, observations: &ObservationSet<3>) -> Result<(), ConfigError> {
    if observations.len() == context.times.len() {
        Ok(())
    } else {
        Err(ConfigError::Length {
            name: "observations",
            expected: context.times.len(),
            actual: observations.len(),
        })
    }
}

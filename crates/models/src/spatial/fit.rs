use std::convert::Infallible;

use log::warn;
use phagefit_core::{LeastSquaresProblem, Model};

use crate::{
    ConfigError, Error, ParameterVector,
    grid::{Grid, TimeGrid},
    observation::{Layout, ObservationSet},
};

use super::{
    SpatialConstants, SpatialParameters,
    simulate,
    simulate::{check_profile, sample_indices},
};

/// Spatial observations are flattened channel-major.
pub const LAYOUT: Layout = Layout::ChannelMajor;

/// Everything needed to predict spatial totals except the fitted rates.
///
/// As a [`Model`], a context maps candidate parameters to the noiseless
/// `[ΣN, ΣP]` totals they predict at the sample times.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialContext {
    constants: SpatialConstants,
    grid: Grid,
    time_grid: TimeGrid,
    n0: Vec<f64>,
    p0: Vec<f64>,
    sample_times: Vec<f64>,
    indices: Vec<usize>,
}

impl SpatialContext {
    /// Creates a prediction context.
    ///
    /// # Errors
    ///
    /// Returns an error if the constants are invalid, if `n0` or `p0` does not
    /// match the grid, or if a sample time cannot be mapped to a step.
    pub fn new(
        constants: SpatialConstants,
        grid: Grid,
        time_grid: TimeGrid,
        n0: Vec<f64>,
        p0: Vec<f64>,
        sample_times: Vec<f64>,
    ) -> Result<Self, ConfigError> {
        constants.validate()?;
        check_profile("initial bacteria", &grid, &n0)?;
        check_profile("initial phage", &grid, &p0)?;
        let indices = sample_indices(&time_grid, &sample_times)?;

        Ok(Self {
            constants,
            grid,
            time_grid,
            n0,
            p0,
            sample_times,
            indices,
        })
    }

    #[must_use]
    pub fn constants(&self) -> &SpatialConstants {
        &self.constants
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn time_grid(&self) -> &TimeGrid {
        &self.time_grid
    }

    #[must_use]
    pub fn initial_bacteria(&self) -> &[f64] {
        &self.n0
    }

    #[must_use]
    pub fn initial_phage(&self) -> &[f64] {
        &self.p0
    }

    #[must_use]
    pub fn sample_times(&self) -> &[f64] {
        &self.sample_times
    }

    /// Step index of each sample time.
    #[must_use]
    pub fn sample_steps(&self) -> &[usize] {
        &self.indices
    }

    /// Predicts the noiseless totals for `params`.
    #[must_use]
    pub fn predict(&self, params: &SpatialParameters) -> ObservationSet<2> {
        match simulate(
            params,
            &self.constants,
            &self.grid,
            &self.time_grid,
            &self.n0,
            &self.p0,
        ) {
            Ok(trajectory) => trajectory.totals_at(&self.indices, &self.sample_times),
            Err(err) => {
                warn!("spatial prediction failed at {params:?}: {err}");
                ObservationSet::undefined(self.sample_times.clone())
            }
        }
    }
}

impl Model for SpatialContext {
    type Input = SpatialParameters;
    type Output = ObservationSet<2>;
    type Error = Infallible;

    fn call(&self, params: &SpatialParameters) -> Result<ObservationSet<2>, Infallible> {
        Ok(self.predict(params))
    }
}

/// Compares spatial predictions against fixed observations.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialFit {
    observations: ObservationSet<2>,
}

impl SpatialFit {
    /// Creates a fit against `observations` taken at `context`'s sample times.
    ///
    /// # Errors
    ///
    /// Returns an error if the observation count differs from the number of
    /// sample times in `context`.
    pub fn new(
        context: &SpatialContext,
        observations: ObservationSet<2>,
    ) -> Result<Self, ConfigError> {
        check_count(context, &observations)?;
        Ok(Self { observations })
    }

    #[must_use]
    pub fn observations(&self) -> &ObservationSet<2> {
        &self.observations
    }
}

impl LeastSquaresProblem<3> for SpatialFit {
    type Input = SpatialParameters;
    type Output = ObservationSet<2>;
    type Error = Infallible;

    fn input(&self, x: &[f64; 3]) -> Result<SpatialParameters, Infallible> {
        Ok(SpatialParameters::from_array(*x))
    }

    fn residuals(
        &self,
        _params: &SpatialParameters,
        predicted: &ObservationSet<2>,
    ) -> Result<Vec<f64>, Infallible> {
        Ok(predicted.misfit(&self.observations, LAYOUT))
    }
}

/// Returns `simulated − observed` for a flat `[k, beta, m]` candidate.
///
/// Residuals are channel-major: every `ΣN` residual, then every `ΣP` residual.
///
/// # Errors
///
/// Returns [`Error::InvalidConfiguration`] if `candidate` does not hold three
/// values or if `observations` does not match `context`'s sample times.
pub fn residuals(
    candidate: &[f64],
    context: &SpatialContext,
    observations: &ObservationSet<2>,
) -> Result<Vec<f64>, Error> {
    let params = SpatialParameters::from_slice(candidate)?;
    check_count(context, observations)?;
    Ok(context.predict(&params).misfit(observations, LAYOUT))
}

fn check_count(context: &SpatialContext, observations: &ObservationSet<2>) -> Result<(), ConfigError> {
    if observations.len() == context.sample_times.len() {
        Ok(())
    } else {
        Err(ConfigError::Length {
            name: "observations",
            expected: context.sample_times.len(),
            actual: observations.len(),
        })
    }
}

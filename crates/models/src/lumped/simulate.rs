use log::debug;
use phagefit_solvers::transient::dopri5;

use crate::{
    ConfigError, Error,
    noise::NoiseSource,
    observation::ObservationSet,
};

use super::{LAYOUT, LumpedInput, LumpedModel, LumpedParameters, LumpedProblem, LumpedState};

/// Lumped states reported at a sequence of output times.
#[derive(Debug, Clone, PartialEq)]
pub struct LumpedTrajectory {
    times: Vec<f64>,
    states: Vec<LumpedState>,
}

impl LumpedTrajectory {
    #[must_use]
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    #[must_use]
    pub fn states(&self) -> &[LumpedState] {
        &self.states
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    #[must_use]
    pub fn phage(&self) -> Vec<f64> {
        self.states.iter().map(|s| s.phage).collect()
    }

    #[must_use]
    pub fn complex(&self) -> Vec<f64> {
        self.states.iter().map(|s| s.complex).collect()
    }

    #[must_use]
    pub fn bacteria(&self) -> Vec<f64> {
        self.states.iter().map(|s| s.bacteria).collect()
    }

    /// Returns the trajectory as `[P, C, N]` observations.
    #[must_use]
    pub fn to_observations(&self) -> ObservationSet<3> {
        let values = self.states.iter().map(|&s| s.into()).collect();
        ObservationSet::from_rows(self.times.clone(), values)
    }
}

/// Integrates the lumped model from `y0` and reports it at each of `times`.
///
/// `times[0]` is the time of `y0`, so the first reported state is `y0` itself.
/// Repeated times repeat the state.
///
/// # Errors
///
/// Returns [`Error::InvalidConfiguration`] if `times` is empty, contains a
/// negative or non-finite value, or decreases, or if `y0` is not finite.
/// Returns [`Error::IntegrationFailure`] if the integrator gives up on any
/// interval.
pub fn simulate(
    params: &LumpedParameters,
    y0: LumpedState,
    times: &[f64],
    config: &dopri5::Config,
) -> Result<LumpedTrajectory, Error> {
    validate_output_times(times)?;
    validate_state(&y0)?;

    let model = LumpedModel::new(*params);
    let initial = LumpedInput {
        time: times[0],
        state: y0,
    };

    let solution = dopri5::solve::<_, _, 3>(&model, &LumpedProblem, initial, times, config)?;
    debug!(
        "lumped integration used {} evaluations ({} accepted, {} rejected steps)",
        solution.evaluations, solution.accepted_steps, solution.rejected_steps
    );

    Ok(LumpedTrajectory {
        times: times.to_vec(),
        states: solution
            .history
            .into_iter()
            .map(|snapshot| snapshot.input.state)
            .collect(),
    })
}

/// Samples every compartment of `trajectory` with additive noise.
///
/// Draws are time-major: all three compartments at the first time, then the
/// next time, and so on.
pub fn sample<S: NoiseSource + ?Sized>(trajectory: &LumpedTrajectory, noise: &mut S) -> ObservationSet<3> {
    trajectory.to_observations().perturbed(LAYOUT, noise)
}

pub(super) fn validate_output_times(times: &[f64]) -> Result<(), ConfigError> {
    if times.is_empty() {
        return Err(ConfigError::NoTimes);
    }

    let mut previous = 0.0;
    for (index, &time) in times.iter().enumerate() {
        if !time.is_finite() || time < previous {
            return Err(ConfigError::OutputTime { index, time });
        }
        previous = time;
    }
    Ok(())
}

fn validate_state(state: &LumpedState) -> Result<(), ConfigError> {
    let named = [
        ("initial phage", state.phage),
        ("initial complexes", state.complex),
        ("initial bacteria", state.bacteria),
    ];
    match named.into_iter().find(|(_, value)| !value.is_finite()) {
        Some((name, value)) => Err(ConfigError::NonFinite { name, value }),
        None => Ok(()),
    }
}

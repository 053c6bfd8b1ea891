//! End-to-end synthetic calibration of the lumped model.
//!
//! An experiment simulates a known truth, samples it with Gaussian noise,
//! estimates the parameters from a guess, and simulates once more with the
//! estimate so the fit can be compared against the truth.

use log::info;
use phagefit_core::Observer;
use phagefit_observers::LogProgress;
use phagefit_solvers::{
    least_squares::levenberg_marquardt::{self, Action, Event},
    transient::dopri5,
};
#[cfg(feature = "serde-derive")]
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    calibration::{Calibration, FitResult, estimate},
    grid::evenly_spaced,
    noise::{GaussianNoise, NoiseSource},
    observation::ObservationSet,
};

use super::{LumpedContext, LumpedFit, LumpedParameters, LumpedState, LumpedTrajectory, sample, simulate};

/// The setup of a synthetic lumped calibration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub struct LumpedExperiment {
    /// Parameters used to generate the observations.
    pub truth: LumpedParameters,
    /// State at `times[0]`.
    pub initial: LumpedState,
    /// Output and observation times.
    pub times: Vec<f64>,
    /// Standard deviation of the additive measurement noise.
    pub noise_std: f64,
    /// Seed for the noise generator.
    pub seed: u64,
    /// Starting point of the estimation.
    pub guess: LumpedParameters,
    pub lower: LumpedParameters,
    pub upper: LumpedParameters,
}

impl LumpedExperiment {
    /// Returns the reference setup: one phage, no complexes, and 100 bacteria,
    /// observed 20 times over ten time units with noise of σ = 5.
    #[must_use]
    pub fn reference() -> Self {
        Self {
            truth: LumpedParameters {
                k: 50.0,
                s: 1.0,
                d: 0.1,
                a: 0.01,
                r: 0.01,
            },
            initial: LumpedState {
                phage: 1.0,
                complex: 0.0,
                bacteria: 100.0,
            },
            times: evenly_spaced(0.0, 10.0, 20),
            noise_std: 5.0,
            seed: 42,
            guess: LumpedParameters {
                k: 40.0,
                s: 0.8,
                d: 0.05,
                a: 0.02,
                r: 0.02,
            },
            lower: LumpedParameters {
                k: 0.0,
                s: 0.0,
                d: 0.0,
                a: 0.0,
                r: 0.0,
            },
            upper: LumpedParameters {
                k: 100.0,
                s: 10.0,
                d: 10.0,
                a: 1.0,
                r: 1.0,
            },
        }
    }
}

/// Everything an experiment produced.
#[derive(Debug, Clone)]
pub struct LumpedReport {
    pub truth: LumpedTrajectory,
    pub observations: ObservationSet<3>,
    pub fit: FitResult<LumpedParameters>,
    pub fitted: LumpedTrajectory,
}

/// Runs an experiment with seeded Gaussian noise, logging estimator progress.
///
/// # Errors
///
/// Returns an error if any part of the setup is invalid, if the true or fitted
/// trajectory cannot be integrated, or if the estimator fails.
pub fn run(
    experiment: &LumpedExperiment,
    integrator: &dopri5::Config,
    estimator: &levenberg_marquardt::Config,
) -> Result<LumpedReport, Error> {
    let mut noise = GaussianNoise::seeded(experiment.noise_std, experiment.seed)?;
    let mut progress = LogProgress::new("lumped fit");

    let report = run_with(experiment, integrator, estimator, &mut noise, &mut progress)?;
    info!(
        "lumped fit best cost {:.6e} after {} evaluations",
        progress.best(),
        progress.evals()
    );
    Ok(report)
}

/// Runs an experiment with the given noise source and estimator observer.
///
/// # Errors
///
/// See [`run`].
pub fn run_with<S, Obs>(
    experiment: &LumpedExperiment,
    integrator: &dopri5::Config,
    estimator: &levenberg_marquardt::Config,
    noise: &mut S,
    observer: Obs,
) -> Result<LumpedReport, Error>
where
    S: NoiseSource + ?Sized,
    Obs: for<'a> Observer<Event<'a, LumpedContext, LumpedFit, 5>, Action>,
{
    let calibration = Calibration::from_parameters(
        &experiment.guess,
        &experiment.lower,
        &experiment.upper,
        *estimator,
    )?;

    let truth = simulate(
        &experiment.truth,
        experiment.initial,
        &experiment.times,
        integrator,
    )?;
    info!("simulated lumped truth at {} times", truth.len());

    let observations = sample(&truth, noise);

    let context = LumpedContext::new(experiment.initial, experiment.times.clone(), *integrator)?;
    let problem = LumpedFit::new(&context, observations.clone())?;
    let fit = estimate(&context, &problem, &calibration, observer)?;
    info!("lumped estimate {:?}", fit.parameters);

    let fitted = simulate(
        &fit.parameters,
        experiment.initial,
        &experiment.times,
        integrator,
    )?;

    Ok(LumpedReport {
        truth,
        observations,
        fit,
        fitted,
    })
}

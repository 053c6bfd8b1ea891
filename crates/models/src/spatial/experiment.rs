//! End-to-end synthetic calibration of the spatial model.

use log::info;
use phagefit_core::Observer;
use phagefit_observers::LogProgress;
use phagefit_solvers::least_squares::levenberg_marquardt::{self, Action, Event};
#[cfg(feature = "serde-derive")]
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    calibration::{Calibration, FitResult, estimate},
    grid::{Grid, TimeGrid, evenly_spaced},
    noise::{GaussianNoise, NoiseSource},
    observation::ObservationSet,
};

use super::{
    SpatialConstants, SpatialContext, SpatialFit, SpatialParameters, SpatialTrajectory, sample,
    scenarios::seeded_profile, simulate,
};

/// The setup of a synthetic spatial calibration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub struct SpatialExperiment {
    /// Parameters used to generate the observations.
    pub truth: SpatialParameters,
    pub constants: SpatialConstants,
    pub nodes: usize,
    pub length: f64,
    pub dt: f64,
    pub horizon: f64,
    /// Initial bacterial density at each node.
    pub n0: Vec<f64>,
    /// Initial phage density at each node.
    pub p0: Vec<f64>,
    /// Wall-clock times at which the totals are observed.
    pub sample_times: Vec<f64>,
    /// Standard deviation of the additive measurement noise.
    pub noise_std: f64,
    /// Seed for the noise generator.
    pub seed: u64,
    /// Starting point of the estimation.
    pub guess: SpatialParameters,
    pub lower: SpatialParameters,
    pub upper: SpatialParameters,
}

impl SpatialExperiment {
    /// Returns the reference setup: 50 nodes on a unit domain stepped to
    /// `t = 2` with `dt = 0.01`, bacteria at 0.5 everywhere, phage at 0.2 on
    /// the first five nodes, and totals observed 20 times with noise of
    /// σ = 0.5.
    #[must_use]
    pub fn reference() -> Self {
        let nodes = 50;
        Self {
            truth: SpatialParameters {
                k: 2.0,
                beta: 20.0,
                m: 0.3,
            },
            constants: SpatialConstants::default(),
            nodes,
            length: 1.0,
            dt: 0.01,
            horizon: 2.0,
            n0: vec![0.5; nodes],
            p0: seeded_profile(nodes, 5, 0.2),
            sample_times: evenly_spaced(0.0, 2.0, 20),
            noise_std: 0.5,
            seed: 42,
            guess: SpatialParameters {
                k: 1.0,
                beta: 10.0,
                m: 0.1,
            },
            lower: SpatialParameters {
                k: 0.0,
                beta: 0.0,
                m: 0.0,
            },
            upper: SpatialParameters {
                k: 5.0,
                beta: 50.0,
                m: 2.0,
            },
        }
    }

    /// Builds the prediction context this experiment fits against.
    ///
    /// # Errors
    ///
    /// Returns an error if the grid, time grid, constants, initial profiles, or
    /// sample times are invalid.
    pub fn context(&self) -> Result<SpatialContext, Error> {
        let grid = Grid::new(self.nodes, self.length)?;
        let time_grid = TimeGrid::from_horizon(self.dt, self.horizon)?;
        Ok(SpatialContext::new(
            self.constants,
            grid,
            time_grid,
            self.n0.clone(),
            self.p0.clone(),
            self.sample_times.clone(),
        )?)
    }
}

/// Everything an experiment produced.
#[derive(Debug, Clone)]
pub struct SpatialReport {
    pub truth: SpatialTrajectory,
    pub observations: ObservationSet<2>,
    pub fit: FitResult<SpatialParameters>,
    pub fitted: SpatialTrajectory,
}

/// Runs an experiment with seeded Gaussian noise, logging estimator progress.
///
/// # Errors
///
/// Returns an error if any part of the setup is invalid or if the estimator
/// fails.
pub fn run(
    experiment: &SpatialExperiment,
    estimator: &levenberg_marquardt::Config,
) -> Result<SpatialReport, Error> {
    let mut noise = GaussianNoise::seeded(experiment.noise_std, experiment.seed)?;
    let mut progress = LogProgress::new("spatial fit");

    let report = run_with(experiment, estimator, &mut noise, &mut progress)?;
    info!(
        "spatial fit best cost {:.6e} after {} evaluations",
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
    experiment: &SpatialExperiment,
    estimator: &levenberg_marquardt::Config,
    noise: &mut S,
    observer: Obs,
) -> Result<SpatialReport, Error>
where
    S: NoiseSource + ?Sized,
    Obs: for<'a> Observer<Event<'a, SpatialContext, SpatialFit, 3>, Action>,
{
    let calibration = Calibration::from_parameters(
        &experiment.guess,
        &experiment.lower,
        &experiment.upper,
        *estimator,
    )?;
    let context = experiment.context()?;

    let truth = simulate_with(&experiment.truth, &context)?;
    info!(
        "simulated spatial truth over {} steps on {} nodes",
        context.time_grid().steps(),
        context.grid().nodes()
    );

    let observations = sample(&truth, context.time_grid(), context.sample_times(), noise)?;

    let problem = SpatialFit::new(&context, observations.clone())?;
    let fit = estimate(&context, &problem, &calibration, observer)?;
    info!("spatial estimate {:?}", fit.parameters);

    let fitted = simulate_with(&fit.parameters, &context)?;

    Ok(SpatialReport {
        truth,
        observations,
        fit,
        fitted,
    })
}

fn simulate_with(
    params: &SpatialParameters,
    context: &SpatialContext,
) -> Result<SpatialTrajectory, Error> {
    simulate(
        params,
        context.constants(),
        context.grid(),
        context.time_grid(),
        context.initial_bacteria(),
        context.initial_phage(),
    )
}

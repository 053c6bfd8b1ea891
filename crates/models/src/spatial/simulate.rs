use log::debug;
use phagefit_solvers::transient::euler;

use crate::{
    ConfigError, Error,
    grid::{Grid, TimeGrid},
    noise::NoiseSource,
    observation::ObservationSet,
};

use super::{Fields, LAYOUT, ReactionDiffusion, SpatialConstants, SpatialParameters, SpatialProblem};

/// Field profiles at every step of a spatial simulation.
///
/// Holds `steps + 1` snapshots, the initial condition first.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialTrajectory {
    times: Vec<f64>,
    bacteria: Vec<Vec<f64>>,
    phage: Vec<Vec<f64>>,
}

impl SpatialTrajectory {
    #[must_use]
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Bacterial profile at each snapshot.
    #[must_use]
    pub fn bacteria(&self) -> &[Vec<f64>] {
        &self.bacteria
    }

    /// Phage profile at each snapshot.
    #[must_use]
    pub fn phage(&self) -> &[Vec<f64>] {
        &self.phage
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Returns `ΣN` at each snapshot.
    #[must_use]
    pub fn total_bacteria(&self) -> Vec<f64> {
        self.bacteria.iter().map(|profile| profile.iter().sum()).collect()
    }

    /// Returns `ΣP` at each snapshot.
    #[must_use]
    pub fn total_phage(&self) -> Vec<f64> {
        self.phage.iter().map(|profile| profile.iter().sum()).collect()
    }

    /// Returns the bacterial profile at the last snapshot.
    #[must_use]
    pub fn final_bacteria(&self) -> &[f64] {
        self.bacteria.last().map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns the phage profile at the last snapshot.
    #[must_use]
    pub fn final_phage(&self) -> &[f64] {
        self.phage.last().map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns `[ΣN, ΣP]` at the given snapshot indices.
    pub(crate) fn totals_at(&self, indices: &[usize], times: &[f64]) -> ObservationSet<2> {
        let values = indices
            .iter()
            .map(|&i| {
                [
                    self.bacteria[i].iter().sum::<f64>(),
                    self.phage[i].iter().sum::<f64>(),
                ]
            })
            .collect();
        ObservationSet::from_rows(times.to_vec(), values)
    }
}

/// Steps the spatial model forward from `n0` and `p0`.
///
/// Every snapshot is clamped nonnegative. An unstable `dt` is not detected and
/// simply produces a diverging (though still nonnegative) history.
///
/// # Errors
///
/// Returns [`Error::InvalidConfiguration`] if `n0` or `p0` does not have one
/// entry per grid node or if `constants` are invalid.
pub fn simulate(
    params: &SpatialParameters,
    constants: &SpatialConstants,
    grid: &Grid,
    time_grid: &TimeGrid,
    n0: &[f64],
    p0: &[f64],
) -> Result<SpatialTrajectory, Error> {
    let (model, initial) = prepare(params, constants, grid, n0, p0)?;

    let solution = euler::solve_unobserved(
        &model,
        &SpatialProblem,
        initial,
        time_grid.dt(),
        time_grid.steps(),
    )?;
    debug!(
        "spatial simulation took {} steps of {} on {} nodes",
        solution.steps,
        time_grid.dt(),
        grid.nodes()
    );

    let (bacteria, phage): (Vec<_>, Vec<_>) = solution
        .history
        .into_iter()
        .map(|snapshot| (snapshot.input.bacteria, snapshot.input.phage))
        .unzip();

    Ok(SpatialTrajectory {
        times: time_grid.times(),
        bacteria,
        phage,
    })
}

/// Steps the spatial model forward like [`simulate`] but returns only the
/// final fields.
///
/// Intermediate profiles are discarded as the run proceeds.
///
/// # Errors
///
/// See [`simulate`].
pub fn simulate_final(
    params: &SpatialParameters,
    constants: &SpatialConstants,
    grid: &Grid,
    time_grid: &TimeGrid,
    n0: &[f64],
    p0: &[f64],
) -> Result<Fields, Error> {
    let (model, initial) = prepare(params, constants, grid, n0, p0)?;

    let end = euler::solve_to_end(
        &model,
        &SpatialProblem,
        initial,
        time_grid.dt(),
        time_grid.steps(),
        (),
    )?;

    Ok(end.snapshot.input)
}

fn prepare(
    params: &SpatialParameters,
    constants: &SpatialConstants,
    grid: &Grid,
    n0: &[f64],
    p0: &[f64],
) -> Result<(ReactionDiffusion, Fields), ConfigError> {
    check_profile("initial bacteria", grid, n0)?;
    check_profile("initial phage", grid, p0)?;
    constants.validate()?;

    let model = ReactionDiffusion::new(*params, *constants, grid.dx());
    let initial = Fields {
        bacteria: n0.to_vec(),
        phage: p0.to_vec(),
    };
    Ok((model, initial))
}

/// Samples `[ΣN, ΣP]` at wall-clock `sample_times` with additive noise.
///
/// Each time maps to the step `round_ties_even(t / dt)`. Draws are
/// channel-major: every `ΣN` first, then every `ΣP`.
///
/// # Errors
///
/// Returns an error if a sample time is negative, not finite, or maps past
/// the last step of `time_grid`.
pub fn sample<S: NoiseSource + ?Sized>(
    trajectory: &SpatialTrajectory,
    time_grid: &TimeGrid,
    sample_times: &[f64],
    noise: &mut S,
) -> Result<ObservationSet<2>, ConfigError> {
    let indices = sample_indices(time_grid, sample_times)?;
    Ok(trajectory
        .totals_at(&indices, sample_times)
        .perturbed(LAYOUT, noise))
}

pub(super) fn sample_indices(
    time_grid: &TimeGrid,
    sample_times: &[f64],
) -> Result<Vec<usize>, ConfigError> {
    sample_times
        .iter()
        .map(|&t| time_grid.step_index(t))
        .collect()
}

pub(super) fn check_profile(
    name: &'static str,
    grid: &Grid,
    profile: &[f64],
) -> Result<(), ConfigError> {
    if profile.len() == grid.nodes() {
        Ok(())
    } else {
        Err(ConfigError::Length {
            name,
            expected: grid.nodes(),
            actual: profile.len(),
        })
    }
}

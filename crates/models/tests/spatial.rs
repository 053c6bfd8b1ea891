use approx::assert_relative_eq;

use phagefit_models::{
    ConfigError, Error, GaussianNoise, Grid, NoNoise, ParameterVector, TimeGrid,
    spatial::{
        self, SpatialConstants, SpatialContext, SpatialParameters,
        experiment::{self, SpatialExperiment},
        scenarios::seeded_profile,
    },
};
use phagefit_solvers::least_squares::levenberg_marquardt::{self, Status};

fn reference_context() -> SpatialContext {
    SpatialExperiment::reference().context().unwrap()
}

#[test]
fn densities_stay_nonnegative_even_when_unstable() {
    let grid = Grid::new(20, 1.0).unwrap();
    // D·dt/dx² is far above the explicit stability limit of 1/2.
    let time_grid = TimeGrid::new(0.05, 100).unwrap();
    let constants = SpatialConstants {
        diffusivity: 1.0,
        ..SpatialConstants::default()
    };
    let params = SpatialParameters {
        k: 2.0,
        beta: 20.0,
        m: 0.3,
    };

    let trajectory = spatial::simulate(
        &params,
        &constants,
        &grid,
        &time_grid,
        &vec![0.5; 20],
        &seeded_profile(20, 5, 0.2),
    )
    .unwrap();

    assert_eq!(trajectory.len(), 101);
    for profile in trajectory.bacteria().iter().chain(trajectory.phage()) {
        assert!(profile.iter().all(|&v| v >= 0.0));
    }
}

#[test]
fn without_phage_coupling_bacteria_grow_logistically() {
    let grid = Grid::new(10, 1.0).unwrap();
    let time_grid = TimeGrid::new(0.1, 30).unwrap();
    let constants = SpatialConstants {
        diffusivity: 0.0,
        ..SpatialConstants::default()
    };
    let params = SpatialParameters {
        k: 0.0,
        beta: 20.0,
        m: 0.3,
    };
    let n0: Vec<f64> = (0..10u32).map(|i| 0.05 + 0.1 * f64::from(i)).collect();

    let trajectory = spatial::simulate(
        &params,
        &constants,
        &grid,
        &time_grid,
        &n0,
        &seeded_profile(10, 3, 0.2),
    )
    .unwrap();

    let mut expected = n0;
    for profile in trajectory.bacteria() {
        for (&actual, &n) in profile.iter().zip(&expected) {
            assert_relative_eq!(actual, n, max_relative = 1e-14);
        }
        for n in &mut expected {
            *n = (*n + 0.1 * (0.5 * *n * (1.0 - *n / 1.0))).max(0.0);
        }
    }
}

#[test]
fn simulation_is_deterministic() {
    let experiment = SpatialExperiment::reference();
    let context = reference_context();

    let run = || {
        spatial::simulate(
            &experiment.truth,
            context.constants(),
            context.grid(),
            context.time_grid(),
            &experiment.n0,
            &experiment.p0,
        )
        .unwrap()
    };

    assert_eq!(run(), run());
}

#[test]
fn reference_totals_start_from_the_initial_profiles() {
    let experiment = SpatialExperiment::reference();
    let context = reference_context();

    let clean = context.predict(&experiment.truth);

    assert_eq!(context.time_grid().steps(), 200);
    assert_eq!(context.sample_steps().first(), Some(&0));
    assert_eq!(context.sample_steps().last(), Some(&200));
    assert_relative_eq!(clean.values()[0][0], 25.0, epsilon = 1e-12);
    assert_relative_eq!(clean.values()[0][1], 1.0, epsilon = 1e-12);
    // Infection bursts release far more phage than they consume bacteria.
    assert!(clean.values()[19][1] > clean.values()[0][1]);
}

#[test]
fn sampling_is_channel_major_and_reproducible() {
    let experiment = SpatialExperiment::reference();
    let context = reference_context();
    let truth = spatial::simulate(
        &experiment.truth,
        context.constants(),
        context.grid(),
        context.time_grid(),
        &experiment.n0,
        &experiment.p0,
    )
    .unwrap();

    let draw = |seed| {
        let mut noise = GaussianNoise::seeded(0.5, seed).unwrap();
        spatial::sample(&truth, context.time_grid(), context.sample_times(), &mut noise).unwrap()
    };

    let first = draw(42);
    assert_eq!(first, draw(42));
    assert_ne!(first, draw(43));

    // Channel-major draws perturb every ΣN before any ΣP, so the first draw
    // lands on ΣN at t = 0.
    let clean = spatial::sample(
        &truth,
        context.time_grid(),
        context.sample_times(),
        &mut NoNoise,
    )
    .unwrap();
    let mut noise = GaussianNoise::seeded(0.5, 42).unwrap();
    let first_draw = phagefit_models::NoiseSource::sample(&mut noise);
    assert_eq!(first.values()[0][0], clean.values()[0][0] + first_draw);
}

#[test]
fn residuals_are_channel_major() {
    let experiment = SpatialExperiment::reference();
    let context = reference_context();
    let observations = context.predict(&experiment.truth);

    let mut shifted = experiment.truth;
    shifted.beta = 25.0;
    let residuals = spatial::residuals(&shifted.to_array(), &context, &observations).unwrap();

    assert_eq!(residuals.len(), 40);
    // ΣN at t = 0 comes first and ΣP at t = 0 starts the second half.
    assert_eq!(residuals[0], 0.0);
    assert_eq!(residuals[20], 0.0);
    // A larger burst size releases more phage early on.
    assert!(residuals[21] > 0.0);
}

#[test]
fn invalid_configuration_is_rejected_before_simulation() {
    let params = SpatialExperiment::reference().truth;
    let constants = SpatialConstants::default();
    let grid = Grid::new(10, 1.0).unwrap();
    let time_grid = TimeGrid::new(0.01, 10).unwrap();

    let short = spatial::simulate(&params, &constants, &grid, &time_grid, &[0.5; 9], &[0.0; 10]);
    assert!(matches!(
        short,
        Err(Error::InvalidConfiguration(ConfigError::Length {
            expected: 10,
            actual: 9,
            ..
        }))
    ));

    assert!(matches!(
        TimeGrid::new(0.0, 10),
        Err(ConfigError::TimeStep(_))
    ));
    assert!(matches!(Grid::new(1, 1.0), Err(ConfigError::TooFewNodes(1))));

    let late_sample = SpatialExperiment {
        sample_times: vec![0.0, 2.5],
        ..SpatialExperiment::reference()
    };
    assert!(matches!(
        late_sample.context(),
        Err(Error::InvalidConfiguration(ConfigError::SampleBeyondHorizon { .. }))
    ));

    let no_capacity = SpatialConstants {
        carrying_capacity: 0.0,
        ..constants
    };
    assert!(matches!(
        spatial::simulate(&params, &no_capacity, &grid, &time_grid, &[0.5; 10], &[0.0; 10]),
        Err(Error::InvalidConfiguration(ConfigError::NonPositive { .. }))
    ));
}

#[test]
fn noisy_reference_fit_lands_near_the_truth() {
    let experiment = SpatialExperiment::reference();
    let mut noise = GaussianNoise::seeded(experiment.noise_std, experiment.seed).unwrap();

    let report = experiment::run_with(
        &experiment,
        &levenberg_marquardt::Config::default(),
        &mut noise,
        (),
    )
    .unwrap();

    assert_eq!(report.fit.status, Status::Converged);
    let fitted = report.fit.parameters;
    assert_relative_eq!(fitted.k, experiment.truth.k, max_relative = 0.05);
    assert_relative_eq!(fitted.beta, experiment.truth.beta, max_relative = 0.05);
    assert_relative_eq!(fitted.m, experiment.truth.m, max_relative = 0.05);

    assert_eq!(report.observations.len(), 20);
    assert_eq!(report.fit.residuals.len(), 40);
    assert_eq!(report.fitted.len(), 201);
}

#[test]
fn reference_run_is_reproducible() {
    let experiment = SpatialExperiment::reference();
    let estimator = levenberg_marquardt::Config::new(2, 1e-10, 1e-10, 1e-10, 1e-7).unwrap();

    let first = experiment::run(&experiment, &estimator).unwrap();
    let second = experiment::run(&experiment, &estimator).unwrap();

    assert_eq!(first.truth, second.truth);
    assert_eq!(first.observations, second.observations);
    assert_eq!(first.fit, second.fit);
}

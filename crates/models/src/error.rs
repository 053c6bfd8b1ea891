use phagefit_solvers::{
    least_squares::levenberg_marquardt,
    transient::{dopri5, euler},
};
use thiserror::Error;

/// Errors that can occur while simulating or calibrating a model.
#[derive(Debug, Error)]
pub enum Error {
    /// An input was rejected before any simulation ran.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),

    /// The adaptive integrator failed on the lumped model.
    #[error("integration failed: {0}")]
    IntegrationFailure(#[from] dopri5::Error),

    /// The explicit stepper failed on the spatial model.
    #[error("simulation failed: {0}")]
    Simulation(#[from] euler::Error),

    /// The least-squares solver failed.
    #[error("estimation failed: {0}")]
    Estimation(#[from] levenberg_marquardt::Error),
}

/// Describes a configuration value that cannot be used.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("a grid needs at least 2 nodes, got {0}")]
    TooFewNodes(usize),

    #[error("domain length must be finite and positive, got {0}")]
    DomainLength(f64),

    #[error("time step must be finite and positive, got {0}")]
    TimeStep(f64),

    #[error("time horizon must be finite and non-negative, got {0}")]
    Horizon(f64),

    #[error("{name} has {actual} entries, expected {expected}")]
    Length {
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("no output times were requested")]
    NoTimes,

    #[error("output time {index} ({time}) must be finite, non-negative, and not before its predecessor")]
    OutputTime { index: usize, time: f64 },

    #[error("sample time {time} must be finite and non-negative")]
    SampleTime { time: f64 },

    #[error("sample time {time} maps to step {step}, past the last step {last}")]
    SampleBeyondHorizon { time: f64, step: f64, last: usize },

    #[error("noise standard deviation must be finite and non-negative, got {0}")]
    NoiseStd(f64),

    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },

    #[error("{name} must be finite and positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("initial guess for {name} ({value}) lies outside [{lower}, {upper}]")]
    GuessOutOfBounds {
        name: &'static str,
        value: f64,
        lower: f64,
        upper: f64,
    },

    #[error("invalid bounds: {0}")]
    Bounds(#[from] levenberg_marquardt::BoundsError),

    #[error("invalid integrator config: {0}")]
    Integrator(#[from] dopri5::ConfigError),

    #[error("invalid estimator config: {0}")]
    Estimator(#[from] levenberg_marquardt::ConfigError),
}

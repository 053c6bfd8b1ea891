use std::error::Error as StdError;

use ode_solvers::dop_shared::IntegrationError;

/// Errors that can occur during Dormand–Prince integration.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no output times were requested")]
    NoTimes,

    #[error("output time {index} ({time}) is not finite or precedes the previous time")]
    InvalidTime { index: usize, time: f64 },

    #[error("integration from {start} to {end} failed: {source}")]
    Integration {
        start: f64,
        end: f64,
        #[source]
        source: IntegrationError,
    },

    #[error("integration from {start} to {end} produced no output")]
    NoOutput { start: f64, end: f64 },

    #[error("model error: {0}")]
    Model(#[source] Box<dyn StdError + Send + Sync>),

    #[error("problem error: {0}")]
    Problem(#[source] Box<dyn StdError + Send + Sync>),
}

impl Error {
    pub(super) fn model<E: StdError + Send + Sync + 'static>(err: E) -> Self {
        Self::Model(Box::new(err))
    }

    pub(super) fn problem<E: StdError + Send + Sync + 'static>(err: E) -> Self {
        Self::Problem(Box::new(err))
    }
}

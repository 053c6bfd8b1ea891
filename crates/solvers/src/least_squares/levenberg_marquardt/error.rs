use std::error::Error as StdError;

use crate::least_squares::EvalError;

/// Errors that can occur during a Levenberg–Marquardt search.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("initial guess component {index} ({value}) lies outside [{lower}, {upper}]")]
    GuessOutOfBounds {
        index: usize,
        value: f64,
        lower: f64,
        upper: f64,
    },

    #[error("residual vector is empty")]
    EmptyResiduals,

    #[error("residual count changed from {expected} to {actual}")]
    ResidualCountChanged { expected: usize, actual: usize },

    #[error("initial evaluation failed and no point was accepted")]
    NoSuccessfulEvaluation,

    #[error("model error: {0}")]
    Model(#[source] Box<dyn StdError + Send + Sync>),

    #[error("problem error: {0}")]
    Problem(#[source] Box<dyn StdError + Send + Sync>),
}

impl<ME, PE> From<EvalError<ME, PE>> for Error
where
    ME: StdError + Send + Sync + 'static,
    PE: StdError + Send + Sync + 'static,
{
    fn from(err: EvalError<ME, PE>) -> Self {
        match err {
            EvalError::Model(e) => Error::Model(Box::new(e)),
            EvalError::Problem(e) => Error::Problem(Box::new(e)),
        }
    }
}

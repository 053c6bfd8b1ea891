use std::error::Error as StdError;

type BoxedError = Box<dyn StdError + Send + Sync>;

/// Errors that can occur during Euler integration.
///
/// `step` is the index of the snapshot being produced when the failure
/// occurred (0 for the initial model call).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("model error at step {step}: {source}")]
    Model {
        step: usize,
        #[source]
        source: BoxedError,
    },

    #[error("problem error at step {step}: {source}")]
    Problem {
        step: usize,
        #[source]
        source: BoxedError,
    },
}

impl Error {
    pub(super) fn model<E: StdError + Send + Sync + 'static>(step: usize, err: E) -> Self {
        Self::Model {
            step,
            source: Box::new(err),
        }
    }

    /// Returns the step at which integration failed.
    #[must_use]
    pub fn step(&self) -> usize {
        match self {
            Self::Model { step, .. } | Self::Problem { step, .. } => *step,
        }
    }
}

/// A failure within one step, before the step index is attached.
pub(super) enum Failure {
    Model(BoxedError),
    Problem(BoxedError),
}

impl Failure {
    pub(super) fn model<E: StdError + Send + Sync + 'static>(err: E) -> Self {
        Self::Model(Box::new(err))
    }

    pub(super) fn problem<E: StdError + Send + Sync + 'static>(err: E) -> Self {
        Self::Problem(Box::new(err))
    }

    pub(super) fn at_step(self, step: usize) -> Error {
        match self {
            Self::Model(source) => Error::Model { step, source },
            Self::Problem(source) => Error::Problem { step, source },
        }
    }
}

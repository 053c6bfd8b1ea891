use thiserror::Error;

/// Configuration for the Dormand–Prince integrator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    rel_tol: f64,
    abs_tol: f64,
    max_steps: u32,
    stiffness_checks: u32,
}

/// Errors that can occur when validating an integrator config.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("rel_tol must be finite and positive")]
    RelTol,

    #[error("abs_tol must be finite and positive")]
    AbsTol,

    #[error("max_steps must be positive")]
    MaxSteps,

    #[error("stiffness_checks must be positive")]
    StiffnessChecks,
}

impl Default for Config {
    fn default() -> Self {
        // Known-good values, unwrap is safe
        Self::new(1e-10, 1e-10, 100_000, 1000).unwrap()
    }
}

impl Config {
    /// Creates a new config with validated tolerances.
    ///
    /// `max_steps` bounds the steps taken between two consecutive output
    /// times. `stiffness_checks` is the number of accepted steps between
    /// stiffness tests.
    ///
    /// # Errors
    ///
    /// Returns an error if a tolerance is non-finite or not positive, or if
    /// either step count is zero.
    pub fn new(
        rel_tol: f64,
        abs_tol: f64,
        max_steps: u32,
        stiffness_checks: u32,
    ) -> Result<Self, ConfigError> {
        if !rel_tol.is_finite() || rel_tol <= 0.0 {
            return Err(ConfigError::RelTol);
        }
        if !abs_tol.is_finite() || abs_tol <= 0.0 {
            return Err(ConfigError::AbsTol);
        }
        if max_steps == 0 {
            return Err(ConfigError::MaxSteps);
        }
        if stiffness_checks == 0 {
            return Err(ConfigError::StiffnessChecks);
        }

        Ok(Self {
            rel_tol,
            abs_tol,
            max_steps,
            stiffness_checks,
        })
    }

    /// Returns the relative error tolerance.
    #[must_use]
    pub fn rel_tol(&self) -> f64 {
        self.rel_tol
    }

    /// Returns the absolute error tolerance.
    #[must_use]
    pub fn abs_tol(&self) -> f64 {
        self.abs_tol
    }

    /// Returns the step budget per output interval.
    #[must_use]
    pub fn max_steps(&self) -> u32 {
        self.max_steps
    }

    /// Returns the stiffness test interval.
    #[must_use]
    pub fn stiffness_checks(&self) -> u32 {
        self.stiffness_checks
    }
}

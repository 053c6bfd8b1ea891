use thiserror::Error;

/// Configuration for the Levenberg–Marquardt solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    max_iters: usize,
    x_tol: f64,
    f_tol: f64,
    g_tol: f64,
    diff_step: f64,
}

/// Errors that can occur when validating a Levenberg–Marquardt config.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("x_tol must be finite and non-negative")]
    XTol,

    #[error("f_tol must be finite and non-negative")]
    FTol,

    #[error("g_tol must be finite and non-negative")]
    GTol,

    #[error("diff_step must be finite and positive")]
    DiffStep,
}

impl Default for Config {
    fn default() -> Self {
        // Known-good values, unwrap is safe
        Self::new(200, 1e-10, 1e-10, 1e-10, 1e-7).unwrap()
    }
}

impl Config {
    /// Creates a new config with validated tolerances.
    ///
    /// `diff_step` is the relative forward-difference step: component `i` is
    /// perturbed by `diff_step * max(|x[i]|, 1)`.
    ///
    /// # Errors
    ///
    /// Returns an error if any tolerance is negative or non-finite, or if
    /// `diff_step` is not positive.
    pub fn new(
        max_iters: usize,
        x_tol: f64,
        f_tol: f64,
        g_tol: f64,
        diff_step: f64,
    ) -> Result<Self, ConfigError> {
        if !x_tol.is_finite() || x_tol < 0.0 {
            return Err(ConfigError::XTol);
        }
        if !f_tol.is_finite() || f_tol < 0.0 {
            return Err(ConfigError::FTol);
        }
        if !g_tol.is_finite() || g_tol < 0.0 {
            return Err(ConfigError::GTol);
        }
        if !diff_step.is_finite() || diff_step <= 0.0 {
            return Err(ConfigError::DiffStep);
        }

        Ok(Self {
            max_iters,
            x_tol,
            f_tol,
            g_tol,
            diff_step,
        })
    }

    /// Returns the maximum number of iterations (Jacobian evaluations).
    #[must_use]
    pub fn max_iters(&self) -> usize {
        self.max_iters
    }

    /// Returns the step-size tolerance.
    #[must_use]
    pub fn x_tol(&self) -> f64 {
        self.x_tol
    }

    /// Returns the relative cost-reduction tolerance.
    #[must_use]
    pub fn f_tol(&self) -> f64 {
        self.f_tol
    }

    /// Returns the gradient infinity-norm tolerance.
    #[must_use]
    pub fn g_tol(&self) -> f64 {
        self.g_tol
    }

    /// Returns the relative finite-difference step.
    #[must_use]
    pub fn diff_step(&self) -> f64 {
        self.diff_step
    }
}

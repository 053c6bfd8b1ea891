//! Bounded parameter estimation for the population models.
//!
//! A [`Calibration`] bundles everything the optimizer needs besides the model
//! itself: the initial guess, the box bounds, and the solver configuration.
//! [`estimate`] runs the bounded Levenberg–Marquardt search and unpacks the
//! best point back into the typed parameter struct.

use log::info;
use phagefit_core::{LeastSquaresProblem, Model, Observer};
use phagefit_solvers::least_squares::levenberg_marquardt::{
    self, Action, Bounds, Config, Event, Status,
};

use crate::{ConfigError, Error, ParameterVector};

/// Initial guess, bounds, and solver settings for one estimation run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration<const N: usize> {
    guess: [f64; N],
    bounds: Bounds<N>,
    config: Config,
}

impl<const N: usize> Calibration<N> {
    /// Creates a calibration from flat arrays.
    ///
    /// `names` labels each component in error messages.
    ///
    /// # Errors
    ///
    /// Returns an error if the bounds are inverted or NaN, or if the guess is
    /// not finite or lies outside the bounds.
    pub fn new(
        names: [&'static str; N],
        guess: [f64; N],
        lower: [f64; N],
        upper: [f64; N],
        config: Config,
    ) -> Result<Self, ConfigError> {
        let bounds = Bounds::new(lower, upper)?;

        for (i, &value) in guess.iter().enumerate() {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite {
                    name: names[i],
                    value,
                });
            }
        }

        if let Some(i) = bounds.first_violation(&guess) {
            return Err(ConfigError::GuessOutOfBounds {
                name: names[i],
                value: guess[i],
                lower: lower[i],
                upper: upper[i],
            });
        }

        Ok(Self {
            guess,
            bounds,
            config,
        })
    }

    /// Creates a calibration from typed parameter structs.
    ///
    /// # Errors
    ///
    /// See [`Calibration::new`].
    pub fn from_parameters<P: ParameterVector<N>>(
        guess: &P,
        lower: &P,
        upper: &P,
        config: Config,
    ) -> Result<Self, ConfigError> {
        Self::new(
            P::NAMES,
            guess.to_array(),
            lower.to_array(),
            upper.to_array(),
            config,
        )
    }

    /// Creates a calibration from plain slices in `P`'s flat order.
    ///
    /// # Errors
    ///
    /// Returns an error if any slice does not hold exactly `N` values, and
    /// otherwise as [`Calibration::new`].
    pub fn from_slices<P: ParameterVector<N>>(
        guess: &[f64],
        lower: &[f64],
        upper: &[f64],
        config: Config,
    ) -> Result<Self, ConfigError> {
        Self::new(
            P::NAMES,
            exact("initial guess", guess)?,
            exact("lower bounds", lower)?,
            exact("upper bounds", upper)?,
            config,
        )
    }

    #[must_use]
    pub fn guess(&self) -> &[f64; N] {
        &self.guess
    }

    #[must_use]
    pub fn bounds(&self) -> &Bounds<N> {
        &self.bounds
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the same calibration with a different solver config.
    #[must_use]
    pub fn with_config(self, config: Config) -> Self {
        Self { config, ..self }
    }
}

fn exact<const N: usize>(name: &'static str, values: &[f64]) -> Result<[f64; N], ConfigError> {
    values.try_into().map_err(|_| ConfigError::Length {
        name,
        expected: N,
        actual: values.len(),
    })
}

/// The outcome of an estimation run.
///
/// Every field describes the best point found, whatever the status.
#[derive(Debug, Clone, PartialEq)]
pub struct FitResult<P> {
    /// The fitted parameters.
    pub parameters: P,

    /// The fitted parameters in flat order.
    pub x: Vec<f64>,

    /// How the search ended.
    pub status: Status,

    /// Residuals at the fitted parameters.
    pub residuals: Vec<f64>,

    /// Sum of squared residuals at the fitted parameters.
    pub cost: f64,

    /// Completed iterations.
    pub iters: usize,

    /// Model evaluations, including Jacobian probes.
    pub evals: usize,
}

/// Estimates the parameters that minimize `problem`'s residuals.
///
/// # Errors
///
/// Returns [`Error::Estimation`] if the residual vector is empty or changes
/// length, or if the model or problem fails without the observer handling it.
pub fn estimate<M, Pr, Obs, P, const N: usize>(
    model: &M,
    problem: &Pr,
    calibration: &Calibration<N>,
    observer: Obs,
) -> Result<FitResult<P>, Error>
where
    M: Model<Input = P>,
    Pr: LeastSquaresProblem<N, Input = P, Output = M::Output>,
    Obs: for<'a> Observer<Event<'a, M, Pr, N>, Action>,
    P: ParameterVector<N>,
{
    info!("estimating {N} parameters from {:?}", calibration.guess);

    let solution = levenberg_marquardt::minimize(
        model,
        problem,
        calibration.guess,
        &calibration.bounds,
        &calibration.config,
        observer,
    )?;

    info!(
        "estimation finished ({:?}) after {} iterations and {} evaluations, cost {:.6e}",
        solution.status, solution.iters, solution.evals, solution.cost
    );

    Ok(FitResult {
        parameters: P::from_array(solution.x),
        x: solution.x.to_vec(),
        status: solution.status,
        residuals: solution.residuals,
        cost: solution.cost,
        iters: solution.iters,
        evals: solution.evals,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::convert::Infallible;

    use approx::assert_relative_eq;

    /// A line `slope·t + offset`.
    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Line {
        slope: f64,
        offset: f64,
    }

    impl ParameterVector<2> for Line {
        const NAMES: [&'static str; 2] = ["slope", "offset"];

        fn to_array(&self) -> [f64; 2] {
            [self.slope, self.offset]
        }

        fn from_array([slope, offset]: [f64; 2]) -> Self {
            Self { slope, offset }
        }
    }

    struct Sampler {
        times: Vec<f64>,
    }

    impl Model for Sampler {
        type Input = Line;
        type Output = Vec<f64>;
        type Error = Infallible;

        fn call(&self, line: &Line) -> Result<Vec<f64>, Infallible> {
            Ok(self.times.iter().map(|t| line.slope * t + line.offset).collect())
        }
    }

    struct LineFit {
        observed: Vec<f64>,
    }

    impl LeastSquaresProblem<2> for LineFit {
        type Input = Line;
        type Output = Vec<f64>;
        type Error = Infallible;

        fn input(&self, x: &[f64; 2]) -> Result<Line, Infallible> {
            Ok(Line::from_array(*x))
        }

        fn residuals(&self, _line: &Line, predicted: &Vec<f64>) -> Result<Vec<f64>, Infallible> {
            Ok(predicted.iter().zip(&self.observed).map(|(p, o)| p - o).collect())
        }
    }

    fn wide_bounds() -> (Line, Line) {
        (
            Line {
                slope: -10.0,
                offset: -10.0,
            },
            Line {
                slope: 10.0,
                offset: 10.0,
            },
        )
    }

    #[test]
    fn estimate_unpacks_the_fitted_struct() {
        let sampler = Sampler {
            times: vec![0.0, 1.0, 2.0, 3.0],
        };
        let truth = Line {
            slope: 1.5,
            offset: -0.5,
        };
        let problem = LineFit {
            observed: sampler.call(&truth).unwrap(),
        };

        let (lower, upper) = wide_bounds();
        let calibration = Calibration::from_parameters(
            &Line {
                slope: 0.0,
                offset: 0.0,
            },
            &lower,
            &upper,
            Config::default(),
        )
        .unwrap();

        let fit: FitResult<Line> = estimate(&sampler, &problem, &calibration, ()).unwrap();

        assert_eq!(fit.status, Status::Converged);
        assert_relative_eq!(fit.parameters.slope, 1.5, epsilon = 1e-8);
        assert_relative_eq!(fit.parameters.offset, -0.5, epsilon = 1e-8);
        assert_eq!(fit.x, fit.parameters.to_array().to_vec());
        assert_eq!(fit.residuals.len(), 4);
    }

    #[test]
    fn guess_outside_bounds_names_the_component() {
        let (lower, upper) = wide_bounds();
        let guess = Line {
            slope: 0.0,
            offset: 20.0,
        };

        let result = Calibration::from_parameters(&guess, &lower, &upper, Config::default());

        assert_eq!(
            result,
            Err(ConfigError::GuessOutOfBounds {
                name: "offset",
                value: 20.0,
                lower: -10.0,
                upper: 10.0,
            })
        );
    }

    #[test]
    fn slices_must_match_the_parameter_count() {
        let result =
            Calibration::from_slices::<Line>(&[0.0, 0.0, 0.0], &[-1.0, -1.0], &[1.0, 1.0], Config::default());

        assert_eq!(
            result,
            Err(ConfigError::Length {
                name: "initial guess",
                expected: 2,
                actual: 3,
            })
        );
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let result = Calibration::new(["a"], [0.0], [1.0], [-1.0], Config::default());
        assert!(matches!(result, Err(ConfigError::Bounds(_))));
    }
}

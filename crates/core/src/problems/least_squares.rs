/// Defines a nonlinear least-squares problem to be solved.
///
/// A least-squares problem maps solver variables to a model input, then
/// computes a residual vector from the model input and output. Solvers search
/// for the `x` that minimizes the sum of squared residuals.
///
/// The const generic `N` is the number of solver variables. The residual
/// vector may have any nonzero length, but that length must not change
/// between calls for a given problem.
pub trait LeastSquaresProblem<const N: usize> {
    type Input;
    type Output;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Maps solver variables (`x`) into a model input.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the input cannot be constructed from `x`.
    fn input(&self, x: &[f64; N]) -> Result<Self::Input, Self::Error>;

    /// Computes the residual vector from a model input and output.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the residuals cannot be computed.
    fn residuals(&self, input: &Self::Input, output: &Self::Output)
    -> Result<Vec<f64>, Self::Error>;
}

/// Sum of squared residuals.
#[must_use]
pub fn sum_of_squares(residuals: &[f64]) -> f64 {
    residuals.iter().map(|r| r * r).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::convert::Infallible;

    use approx::assert_relative_eq;

    /// Fits a decay rate to two observed phage counts.
    struct DecayFit {
        observed: [f64; 2],
    }

    impl LeastSquaresProblem<1> for DecayFit {
        type Input = f64;
        type Output = [f64; 2];
        type Error = Infallible;

        fn input(&self, x: &[f64; 1]) -> Result<f64, Self::Error> {
            Ok(x[0])
        }

        fn residuals(&self, _rate: &f64, predicted: &[f64; 2]) -> Result<Vec<f64>, Self::Error> {
            Ok(predicted
                .iter()
                .zip(&self.observed)
                .map(|(p, o)| p - o)
                .collect())
        }
    }

    #[test]
    fn residuals_are_predicted_minus_observed() {
        let problem = DecayFit {
            observed: [1.0, 0.5],
        };
        let rate = problem.input(&[0.7]).unwrap();
        let residuals = problem.residuals(&rate, &[1.0, 0.75]).unwrap();

        assert_eq!(residuals, vec![0.0, 0.25]);
        assert_relative_eq!(sum_of_squares(&residuals), 0.0625);
    }
}

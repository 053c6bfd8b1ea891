use phagefit_core::Observer;

use crate::traits::{CanAssumeWorse, HasCost};

/// Treats every failed evaluation as worse instead of ending the search.
///
/// Failures are recognised by a NaN cost, which [`HasCost`] reports for
/// events that carry an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkipFailures {
    skipped: usize,
}

impl SkipFailures {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of failed evaluations skipped so far.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl<E: HasCost, A: CanAssumeWorse> Observer<E, A> for SkipFailures {
    fn observe(&mut self, event: &E) -> Option<A> {
        if event.cost().is_nan() {
            self.skipped += 1;
            Some(A::assume_worse())
        } else {
            None
        }
    }
}

impl<E: HasCost, A: CanAssumeWorse> Observer<E, A> for &mut SkipFailures {
    fn observe(&mut self, event: &E) -> Option<A> {
        (**self).observe(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::convert::Infallible;

    use phagefit_core::{LeastSquaresProblem, Model};
    use phagefit_solvers::least_squares::levenberg_marquardt::{
        self, Bounds, Config, minimize, minimize_unobserved,
    };
    use thiserror::Error;

    #[derive(Debug, Error)]
    #[error("{0} is past the edge")]
    struct PastEdge(f64);

    /// Returns `x`, refusing anything above 2.
    struct Ledge;

    impl Model for Ledge {
        type Input = [f64; 1];
        type Output = f64;
        type Error = PastEdge;

        fn call(&self, x: &[f64; 1]) -> Result<f64, PastEdge> {
            if x[0] > 2.0 {
                Err(PastEdge(x[0]))
            } else {
                Ok(x[0])
            }
        }
    }

    /// Pulls `x` toward 3, beyond where [`Ledge`] can go.
    struct TowardThree;

    impl LeastSquaresProblem<1> for TowardThree {
        type Input = [f64; 1];
        type Output = f64;
        type Error = Infallible;

        fn input(&self, x: &[f64; 1]) -> Result<[f64; 1], Infallible> {
            Ok(*x)
        }

        fn residuals(&self, _input: &[f64; 1], output: &f64) -> Result<Vec<f64>, Infallible> {
            Ok(vec![output - 3.0])
        }
    }

    #[test]
    fn failed_trials_are_skipped_instead_of_fatal() {
        let bounds = Bounds::unbounded();
        let config = Config::default();

        // The first damped step from 0 lands near 3, where the model fails.
        let unobserved = minimize_unobserved(&Ledge, &TowardThree, [0.0], &bounds, &config);
        assert!(matches!(unobserved, Err(levenberg_marquardt::Error::Model(_))));

        let mut skip = SkipFailures::new();
        let solution = minimize(&Ledge, &TowardThree, [0.0], &bounds, &config, &mut skip)
            .expect("failures are skipped");

        assert!(skip.skipped() > 0);
        assert!(solution.x[0] <= 2.0);
        assert!(solution.cost < 9.0);
    }

    struct Cost(f64);

    impl HasCost for Cost {
        fn cost(&self) -> f64 {
            self.0
        }
    }

    #[derive(Debug, PartialEq)]
    struct Worse;

    impl CanAssumeWorse for Worse {
        fn assume_worse() -> Self {
            Worse
        }
    }

    #[test]
    fn only_failures_are_marked_worse() {
        let mut skip = SkipFailures::new();

        assert_eq!(skip.observe(&Cost(4.0)), None::<Worse>);
        assert_eq!(skip.observe(&Cost(f64::INFINITY)), None::<Worse>);
        assert_eq!(skip.observe(&Cost(f64::NAN)), Some(Worse));
        assert_eq!(skip.skipped(), 1);
    }
}

/// A state that can be advanced by one explicit step of its derivative.
///
/// Implementing this trait lets generic solvers move a state forward via
/// `state + derivative * delta`, where the derivative is taken with respect to
/// `Delta`. For population models `Delta` is a time increment and the
/// derivative is a set of growth, decay, and transfer rates.
pub trait StepIntegrable<Delta> {
    /// The derivative of the type with respect to `Delta`.
    type Derivative;

    /// Returns the value after stepping with a derivative and step size.
    #[must_use]
    fn step(&self, derivative: Self::Derivative, delta: Delta) -> Self;
}

/// Shorthand for the [`StepIntegrable::Derivative`] of `T`.
pub type DerivativeOf<T, Delta> = <T as StepIntegrable<Delta>>::Derivative;

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    /// Free phage count and its net production rate.
    #[derive(Debug, PartialEq)]
    struct Phage(f64);
    struct PhageRate(f64);

    impl StepIntegrable<f64> for Phage {
        type Derivative = PhageRate;

        fn step(&self, rate: PhageRate, dt: f64) -> Self {
            Phage(self.0 + dt * rate.0)
        }
    }

    /// Bacterial density at each mesh node.
    #[derive(Debug, PartialEq)]
    struct Density(Vec<f64>);
    struct DensityRate(Vec<f64>);

    impl StepIntegrable<f64> for Density {
        type Derivative = DensityRate;

        fn step(&self, rate: DensityRate, dt: f64) -> Self {
            Density(
                self.0
                    .iter()
                    .zip(&rate.0)
                    .map(|(n, dn)| n + dt * dn)
                    .collect(),
            )
        }
    }

    #[test]
    fn scalar_population_steps() {
        let next = Phage(10.0).step(PhageRate(-2.0), 0.5);
        assert_eq!(next, Phage(9.0));
    }

    #[test]
    fn profile_steps_node_by_node() {
        let profile = Density(vec![0.5, 0.25, 0.0]);
        let rate = DensityRate(vec![0.1, -0.5, 0.0]);

        let Density(next) = profile.step(rate, 0.1);

        assert_relative_eq!(next[0], 0.51);
        assert_relative_eq!(next[1], 0.2);
        assert_relative_eq!(next[2], 0.0);
    }
}

use std::convert::Infallible;

use phagefit_core::{DerivativeOf, Model, OdeProblem};

use super::{FieldRates, Fields, SpatialConstants, SpatialParameters};

/// Evaluates the reaction–diffusion right-hand side on a uniform grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReactionDiffusion {
    params: SpatialParameters,
    constants: SpatialConstants,
    dx: f64,
}

impl ReactionDiffusion {
    #[must_use]
    pub fn new(params: SpatialParameters, constants: SpatialConstants, dx: f64) -> Self {
        Self {
            params,
            constants,
            dx,
        }
    }

    /// Returns the node-by-node derivatives of `fields`.
    #[must_use]
    pub fn rates(&self, fields: &Fields) -> FieldRates {
        let SpatialParameters { k, beta, m } = self.params;
        let SpatialConstants {
            growth_rate,
            carrying_capacity,
            diffusivity,
            infection,
        } = self.constants;

        let n = &fields.bacteria;
        let p = &fields.phage;
        let nodes = n.len();
        let dx2 = self.dx * self.dx;

        let mut rates = FieldRates {
            bacteria: Vec::with_capacity(nodes),
            phage: Vec::with_capacity(nodes),
        };

        for i in 0..nodes {
            let infected = infection.rate(k, n[i], p[i]);
            let growth = growth_rate * n[i] * (1.0 - n[i] / carrying_capacity);

            // Boundary nodes get no diffusive flux.
            let laplacian = if i == 0 || i + 1 == nodes {
                0.0
            } else {
                (p[i + 1] - 2.0 * p[i] + p[i - 1]) / dx2
            };

            rates.bacteria.push(growth - infected);
            rates
                .phage
                .push(diffusivity * laplacian + (beta * infected - m * p[i]));
        }

        rates
    }
}

impl Model for ReactionDiffusion {
    type Input = Fields;
    type Output = FieldRates;
    type Error = Infallible;

    fn call(&self, fields: &Fields) -> Result<FieldRates, Infallible> {
        Ok(self.rates(fields))
    }
}

/// Adapts [`ReactionDiffusion`] to explicit stepping.
///
/// Every step is clamped so no density goes negative.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpatialProblem;

impl OdeProblem for SpatialProblem {
    type Input = Fields;
    type Output = FieldRates;
    type Delta = f64;
    type State = Fields;
    type Error = Infallible;

    fn state(&self, fields: &Fields) -> Result<Fields, Infallible> {
        Ok(fields.clone())
    }

    fn derivative(
        &self,
        _fields: &Fields,
        rates: &FieldRates,
    ) -> Result<DerivativeOf<Fields, f64>, Infallible> {
        Ok(rates.clone())
    }

    fn build_input(
        &self,
        _base: &Fields,
        state: &Fields,
        _dt: &f64,
    ) -> Result<Fields, Infallible> {
        Ok(state.clone())
    }

    fn finalize_step(
        &self,
        mut next: Fields,
        _prev_fields: &Fields,
        _prev_rates: &FieldRates,
        _dt: &f64,
    ) -> Result<Fields, Infallible> {
        next.clamp_nonnegative();
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::spatial::InfectionKinetics;

    fn constants(diffusivity: f64) -> SpatialConstants {
        SpatialConstants {
            growth_rate: 0.5,
            carrying_capacity: 1.0,
            diffusivity,
            infection: InfectionKinetics::MassAction,
        }
    }

    #[test]
    fn boundaries_have_no_diffusion() {
        let model = ReactionDiffusion::new(
            SpatialParameters {
                k: 0.0,
                beta: 0.0,
                m: 0.0,
            },
            constants(1.0),
            0.5,
        );
        let fields = Fields {
            bacteria: vec![0.0; 3],
            phage: vec![1.0, 0.0, 1.0],
        };

        let rates = model.rates(&fields);

        assert_eq!(rates.phage[0], 0.0);
        assert_eq!(rates.phage[2], 0.0);
        assert_relative_eq!(rates.phage[1], 2.0 / 0.25);
    }

    #[test]
    fn infection_moves_bacteria_into_phage() {
        let model = ReactionDiffusion::new(
            SpatialParameters {
                k: 2.0,
                beta: 20.0,
                m: 0.3,
            },
            constants(0.0),
            0.1,
        );
        let fields = Fields {
            bacteria: vec![0.5, 0.5],
            phage: vec![0.2, 0.0],
        };

        let rates = model.rates(&fields);

        let infected = 2.0 * 0.5 * 0.2;
        assert_relative_eq!(rates.bacteria[0], 0.5 * 0.5 * 0.5 - infected);
        assert_relative_eq!(rates.phage[0], 20.0 * infected - 0.3 * 0.2);
        assert_relative_eq!(rates.bacteria[1], 0.5 * 0.5 * 0.5);
        assert_eq!(rates.phage[1], 0.0);
    }
}

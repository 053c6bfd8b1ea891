use std::convert::Infallible;

use phagefit_core::{DerivativeOf, Model, OdeProblem};

use super::{LumpedParameters, LumpedRates, LumpedState};

/// The lumped state at a point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LumpedInput {
    pub time: f64,
    pub state: LumpedState,
}

/// Evaluates the lumped right-hand side for fixed parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LumpedModel {
    params: LumpedParameters,
}

impl LumpedModel {
    #[must_use]
    pub fn new(params: LumpedParameters) -> Self {
        Self { params }
    }

    #[must_use]
    pub fn params(&self) -> &LumpedParameters {
        &self.params
    }

    /// Returns the compartment derivatives at `state`.
    #[must_use]
    pub fn rates(&self, state: &LumpedState) -> LumpedRates {
        let LumpedParameters { k, s, d, a, r } = self.params;
        let LumpedState {
            phage,
            complex,
            bacteria,
        } = *state;

        LumpedRates {
            phage: k * s * complex - d * phage,
            complex: a * bacteria - r * phage - s * complex,
            bacteria: -a * bacteria - r * phage,
        }
    }
}

impl Model for LumpedModel {
    type Input = LumpedInput;
    type Output = LumpedRates;
    type Error = Infallible;

    fn call(&self, input: &LumpedInput) -> Result<LumpedRates, Infallible> {
        Ok(self.rates(&input.state))
    }
}

/// Adapts [`LumpedModel`] to time integration.
#[derive(Debug, Clone, Copy, Default)]
pub struct LumpedProblem;

impl OdeProblem for LumpedProblem {
    type Input = LumpedInput;
    type Output = LumpedRates;
    type Delta = f64;
    type State = LumpedState;
    type Error = Infallible;

    fn state(&self, input: &LumpedInput) -> Result<LumpedState, Infallible> {
        Ok(input.state)
    }

    fn derivative(
        &self,
        _input: &LumpedInput,
        rates: &LumpedRates,
    ) -> Result<DerivativeOf<LumpedState, f64>, Infallible> {
        Ok(*rates)
    }

    fn build_input(
        &self,
        base: &LumpedInput,
        state: &LumpedState,
        delta: &f64,
    ) -> Result<LumpedInput, Infallible> {
        Ok(LumpedInput {
            time: base.time + delta,
            state: *state,
        })
    }
}

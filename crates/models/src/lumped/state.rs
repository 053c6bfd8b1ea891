use phagefit_core::StepIntegrable;
#[cfg(feature = "serde-derive")]
use serde::{Deserialize, Serialize};

/// Populations of the three lumped compartments.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub struct LumpedState {
    pub phage: f64,
    pub complex: f64,
    pub bacteria: f64,
}

/// Time derivatives of the three lumped compartments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LumpedRates {
    pub phage: f64,
    pub complex: f64,
    pub bacteria: f64,
}

impl StepIntegrable<f64> for LumpedState {
    type Derivative = LumpedRates;

    fn step(&self, rates: LumpedRates, dt: f64) -> Self {
        Self {
            phage: self.phage + dt * rates.phage,
            complex: self.complex + dt * rates.complex,
            bacteria: self.bacteria + dt * rates.bacteria,
        }
    }
}

impl From<[f64; 3]> for LumpedState {
    fn from([phage, complex, bacteria]: [f64; 3]) -> Self {
        Self {
            phage,
            complex,
            bacteria,
        }
    }
}

impl From<LumpedState> for [f64; 3] {
    fn from(state: LumpedState) -> Self {
        [state.phage, state.complex, state.bacteria]
    }
}

impl From<LumpedRates> for [f64; 3] {
    fn from(rates: LumpedRates) -> Self {
        [rates.phage, rates.complex, rates.bacteria]
    }
}

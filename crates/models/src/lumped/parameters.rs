#[cfg(feature = "serde-derive")]
use serde::{Deserialize, Serialize};

use crate::ParameterVector;

/// Rate constants of the lumped model.
///
/// The flat order is `[k, s, d, a, r]`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub struct LumpedParameters {
    /// Phage released per complex turnover.
    pub k: f64,
    /// Complex turnover rate.
    pub s: f64,
    /// Free phage decay rate.
    pub d: f64,
    /// Rate at which bacteria enter complexes.
    pub a: f64,
    /// Coupling between free phage and complex loss.
    pub r: f64,
}

impl ParameterVector<5> for LumpedParameters {
    const NAMES: [&'static str; 5] = ["k", "s", "d", "a", "r"];

    fn to_array(&self) -> [f64; 5] {
        [self.k, self.s, self.d, self.a, self.r]
    }

    fn from_array([k, s, d, a, r]: [f64; 5]) -> Self {
        Self { k, s, d, a, r }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::ConfigError;

    #[test]
    fn flat_order_round_trips() {
        let params = LumpedParameters {
            k: 50.0,
            s: 1.0,
            d: 0.1,
            a: 0.01,
            r: 0.02,
        };

        assert_eq!(params.to_array(), [50.0, 1.0, 0.1, 0.01, 0.02]);
        assert_eq!(LumpedParameters::from_array(params.to_array()), params);
    }

    #[test]
    fn slice_of_wrong_length_is_rejected() {
        assert!(matches!(
            LumpedParameters::from_slice(&[1.0, 2.0]),
            Err(ConfigError::Length {
                expected: 5,
                actual: 2,
                ..
            })
        ));
    }
}

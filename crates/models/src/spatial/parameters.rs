#[cfg(feature = "serde-derive")]
use serde::{Deserialize, Serialize};

use crate::{ConfigError, ParameterVector};

/// The fitted rates of the spatial model.
///
/// The flat order is `[k, beta, m]`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub struct SpatialParameters {
    /// Infection rate.
    pub k: f64,
    /// Burst size: phage released per infection.
    pub beta: f64,
    /// Phage decay rate.
    pub m: f64,
}

impl ParameterVector<3> for SpatialParameters {
    const NAMES: [&'static str; 3] = ["k", "beta", "m"];

    fn to_array(&self) -> [f64; 3] {
        [self.k, self.beta, self.m]
    }

    fn from_array([k, beta, m]: [f64; 3]) -> Self {
        Self { k, beta, m }
    }
}

/// How the infection rate depends on the local populations.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub enum InfectionKinetics {
    /// `k·N·P`.
    #[default]
    MassAction,
    /// `k·N·P / (Ks + N)`, saturating in the bacterial density.
    Saturating { half_saturation: f64 },
}

impl InfectionKinetics {
    /// Returns the infection rate at one node.
    #[must_use]
    pub fn rate(&self, k: f64, bacteria: f64, phage: f64) -> f64 {
        match *self {
            Self::MassAction => k * bacteria * phage,
            Self::Saturating { half_saturation } => {
                k * bacteria * phage / (half_saturation + bacteria)
            }
        }
    }
}

/// Fixed environment of the spatial model, never a fit target.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub struct SpatialConstants {
    /// Logistic growth rate `r` of the bacteria.
    pub growth_rate: f64,
    /// Carrying capacity `K` of the bacteria.
    pub carrying_capacity: f64,
    /// Phage diffusion coefficient `D_p`.
    pub diffusivity: f64,
    pub infection: InfectionKinetics,
}

impl SpatialConstants {
    /// Checks that every constant can be used in a simulation.
    ///
    /// # Errors
    ///
    /// Returns an error if the growth rate or diffusivity is not finite, or if
    /// the carrying capacity or a half-saturation constant is not finite and
    /// positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.growth_rate.is_finite() {
            return Err(ConfigError::NonFinite {
                name: "growth rate",
                value: self.growth_rate,
            });
        }
        if !self.diffusivity.is_finite() {
            return Err(ConfigError::NonFinite {
                name: "diffusivity",
                value: self.diffusivity,
            });
        }
        positive("carrying capacity", self.carrying_capacity)?;
        if let InfectionKinetics::Saturating { half_saturation } = self.infection {
            positive("half-saturation constant", half_saturation)?;
        }
        Ok(())
    }

    /// Returns the same constants with a different diffusivity.
    #[must_use]
    pub fn with_diffusivity(self, diffusivity: f64) -> Self {
        Self {
            diffusivity,
            ..self
        }
    }
}

/// Growth 0.5, capacity 1, diffusivity 0.01, mass-action infection.
impl Default for SpatialConstants {
    fn default() -> Self {
        Self {
            growth_rate: 0.5,
            carrying_capacity: 1.0,
            diffusivity: 0.01,
            infection: InfectionKinetics::MassAction,
        }
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn saturating_kinetics_halve_at_the_half_saturation_density() {
        let kinetics = InfectionKinetics::Saturating {
            half_saturation: 0.1,
        };

        assert_relative_eq!(kinetics.rate(1.0, 0.1, 2.0), 1.0);
        assert_relative_eq!(InfectionKinetics::MassAction.rate(1.0, 0.1, 2.0), 0.2);
    }

    #[test]
    fn constants_are_validated() {
        assert_eq!(SpatialConstants::default().validate(), Ok(()));

        let no_capacity = SpatialConstants {
            carrying_capacity: 0.0,
            ..SpatialConstants::default()
        };
        assert!(matches!(
            no_capacity.validate(),
            Err(ConfigError::NonPositive {
                name: "carrying capacity",
                ..
            })
        ));

        let bad_saturation = SpatialConstants {
            infection: InfectionKinetics::Saturating {
                half_saturation: -1.0,
            },
            ..SpatialConstants::default()
        };
        assert!(bad_saturation.validate().is_err());
    }
}

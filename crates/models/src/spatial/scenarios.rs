//! Diffusion-coefficient sweeps.
//!
//! A sweep runs the spatial model once per scenario, changing only the phage
//! diffusivity, and keeps each run's final profiles so they can be compared
//! side by side.

use log::info;
#[cfg(feature = "serde-derive")]
use serde::{Deserialize, Serialize};

use crate::{
    ConfigError, Error,
    grid::{Grid, TimeGrid},
};

use super::{InfectionKinetics, SpatialConstants, SpatialParameters, simulate_final};

/// A labelled diffusion coefficient.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub struct DiffusionScenario {
    pub label: String,
    pub diffusivity: f64,
}

impl DiffusionScenario {
    pub fn new(label: impl Into<String>, diffusivity: f64) -> Self {
        Self {
            label: label.into(),
            diffusivity,
        }
    }
}

/// The setup shared by every scenario in a sweep.
///
/// The diffusivity in `constants` is replaced by each scenario's own.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepSetup {
    pub params: SpatialParameters,
    pub constants: SpatialConstants,
    pub grid: Grid,
    pub time_grid: TimeGrid,
    pub n0: Vec<f64>,
    pub p0: Vec<f64>,
}

impl SweepSetup {
    /// Returns the biofilm setup: 100 nodes on a unit domain, one time unit in
    /// steps of `1e-4`, saturating infection with `Ks = 0.1`, bacteria at 0.2
    /// everywhere, and phage at 0.5 on the first five nodes.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the grids are validated like any other.
    pub fn biofilm() -> Result<Self, ConfigError> {
        let grid = Grid::new(100, 1.0)?;
        let time_grid = TimeGrid::from_horizon(1e-4, 1.0)?;

        Ok(Self {
            params: SpatialParameters {
                k: 1.0,
                beta: 5.0,
                m: 0.1,
            },
            constants: SpatialConstants {
                growth_rate: 0.5,
                carrying_capacity: 1.0,
                diffusivity: 0.01,
                infection: InfectionKinetics::Saturating {
                    half_saturation: 0.1,
                },
            },
            n0: vec![0.2; grid.nodes()],
            p0: seeded_profile(grid.nodes(), 5, 0.5),
            grid,
            time_grid,
        })
    }
}

/// Low, medium, and high phage diffusivity.
#[must_use]
pub fn biofilm_scenarios() -> Vec<DiffusionScenario> {
    vec![
        DiffusionScenario::new("Low Diffusion", 0.001),
        DiffusionScenario::new("Medium Diffusion", 0.01),
        DiffusionScenario::new("High Diffusion", 0.1),
    ]
}

/// Final profiles from one scenario.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub struct ScenarioOutcome {
    pub label: String,
    pub diffusivity: f64,
    /// Node positions shared by both profiles.
    pub positions: Vec<f64>,
    pub bacteria: Vec<f64>,
    pub phage: Vec<f64>,
}

/// Runs one simulation per scenario and returns the final profiles in order.
///
/// # Errors
///
/// Returns an error if the setup is invalid or a scenario's diffusivity is not
/// finite.
pub fn sweep_diffusion(
    setup: &SweepSetup,
    scenarios: &[DiffusionScenario],
) -> Result<Vec<ScenarioOutcome>, Error> {
    let positions = setup.grid.positions();

    scenarios
        .iter()
        .map(|scenario| {
            let constants = setup.constants.with_diffusivity(scenario.diffusivity);
            let fields = simulate_final(
                &setup.params,
                &constants,
                &setup.grid,
                &setup.time_grid,
                &setup.n0,
                &setup.p0,
            )?;
            let [total_bacteria, total_phage] = fields.totals();
            info!(
                "{}: D_p = {} ends with ΣN = {total_bacteria:.6}, ΣP = {total_phage:.6}",
                scenario.label, scenario.diffusivity,
            );

            Ok(ScenarioOutcome {
                label: scenario.label.clone(),
                diffusivity: scenario.diffusivity,
                positions: positions.clone(),
                bacteria: fields.bacteria,
                phage: fields.phage,
            })
        })
        .collect()
}

/// Returns a profile of `value` on the first `seeded` nodes and zero elsewhere.
#[must_use]
pub fn seeded_profile(nodes: usize, seeded: usize, value: f64) -> Vec<f64> {
    (0..nodes)
        .map(|i| if i < seeded { value } else { 0.0 })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::spatial::simulate;

    fn small_setup() -> SweepSetup {
        let grid = Grid::new(20, 1.0).unwrap();
        SweepSetup {
            params: SpatialParameters {
                k: 1.0,
                beta: 5.0,
                m: 0.1,
            },
            constants: SpatialConstants::default(),
            n0: vec![0.2; grid.nodes()],
            p0: seeded_profile(grid.nodes(), 3, 0.5),
            grid,
            time_grid: TimeGrid::new(1e-3, 200).unwrap(),
        }
    }

    #[test]
    fn seeded_profile_fills_leading_nodes() {
        assert_eq!(seeded_profile(4, 2, 0.5), vec![0.5, 0.5, 0.0, 0.0]);
    }

    #[test]
    fn faster_diffusion_spreads_phage_further() {
        let scenarios = [
            DiffusionScenario::new("slow", 0.0),
            DiffusionScenario::new("fast", 0.05),
        ];

        let outcomes = sweep_diffusion(&small_setup(), &scenarios).unwrap();

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].label, "slow");
        assert_eq!(outcomes[0].positions.len(), 20);
        assert_eq!(outcomes[1].phage.len(), 20);

        // Without diffusion, phage never reach nodes that started empty.
        assert!(outcomes[0].phage[3..].iter().all(|&p| p == 0.0));
        assert!(outcomes[1].phage[3] > 0.0);
    }

    #[test]
    fn sweep_ends_where_the_full_simulation_ends() {
        let setup = small_setup();
        let scenario = DiffusionScenario::new("medium", 0.01);

        let outcomes = sweep_diffusion(&setup, std::slice::from_ref(&scenario)).unwrap();
        let trajectory = simulate(
            &setup.params,
            &setup.constants.with_diffusivity(scenario.diffusivity),
            &setup.grid,
            &setup.time_grid,
            &setup.n0,
            &setup.p0,
        )
        .unwrap();

        assert_eq!(outcomes[0].bacteria, trajectory.final_bacteria());
        assert_eq!(outcomes[0].phage, trajectory.final_phage());
    }

    #[test]
    fn biofilm_setup_matches_its_description() {
        let setup = SweepSetup::biofilm().unwrap();

        assert_eq!(setup.grid.nodes(), 100);
        assert_eq!(setup.time_grid.steps(), 10_000);
        assert_eq!(setup.p0.iter().filter(|&&p| p > 0.0).count(), 5);
        assert_eq!(biofilm_scenarios().len(), 3);
    }
}

//! The lumped phage–bacteria model.
//!
//! Three well-mixed compartments, free phage `P`, phage–bacteria complexes `C`,
//! and uninfected bacteria `N`, evolve as
//!
//! ```text
//! dP/dt = k·s·C − d·P
//! dC/dt = a·N − r·P − s·C
//! dN/dt = −a·N − r·P
//! ```
//!
//! The system is integrated with adaptive Dormand–Prince 5(4) and reported
//! exactly at the requested output times. No floor is applied to any
//! compartment, and `N` has no growth term.

pub mod experiment;

mod fit;
mod model;
mod parameters;
mod simulate;
mod state;

pub use fit::{LAYOUT, LumpedContext, LumpedFit, residuals};
pub use model::{LumpedInput, LumpedModel, LumpedProblem};
pub use parameters::LumpedParameters;
pub use simulate::{LumpedTrajectory, sample, simulate};
pub use state::{LumpedRates, LumpedState};

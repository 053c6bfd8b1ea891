//! The spatial phage–bacteria model.
//!
//! Bacteria `N` grow logistically and stay put; phage `P` diffuse along a
//! one-dimensional domain. At every node `i`:
//!
//! ```text
//! infection = k·N·P                       (mass action)
//! dN/dt     = r·N·(1 − N/K) − infection
//! dP/dt     = D_p·∂²P/∂x² + beta·infection − m·P
//! ```
//!
//! The Laplacian uses the three-point stencil at interior nodes and is zero at
//! both boundary nodes. Fields are stepped with explicit Euler and clamped to
//! be nonnegative after every step. No stability limit is enforced on `dt`.

pub mod experiment;
pub mod scenarios;

mod fields;
mod fit;
mod model;
mod parameters;
mod simulate;

pub use fields::{FieldRates, Fields};
pub use fit::{LAYOUT, SpatialContext, SpatialFit, residuals};
pub use model::{ReactionDiffusion, SpatialProblem};
pub use parameters::{InfectionKinetics, SpatialConstants, SpatialParameters};
pub use simulate::{SpatialTrajectory, sample, simulate, simulate_final};

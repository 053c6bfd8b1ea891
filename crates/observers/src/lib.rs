//! Reusable observers for phagefit solvers.
//!
//! This crate provides [`Observer`] implementations and capability traits that
//! work across solvers.
//!
//! # Modules
//!
//! - [`traits`] — capability traits for cross-solver observers
//!   ([`HasCost`], [`CanStopEarly`], [`CanAssumeWorse`])
//!
//! # Observers
//!
//! - [`LogProgress`] — emits a `log` record per evaluation with the running best
//! - [`CostTrace`] — records costs for later inspection or plotting
//! - [`CostThreshold`] — stops a search once the cost is low enough
//! - [`SkipFailures`] — treats failed evaluations as worse instead of fatal
//!
//! [`Observer`]: phagefit_core::Observer
//! [`HasCost`]: traits::HasCost
//! [`CanStopEarly`]: traits::CanStopEarly
//! [`CanAssumeWorse`]: traits::CanAssumeWorse

pub mod traits;

mod progress;
mod skip;
mod threshold;
mod trace;

pub use progress::LogProgress;
pub use skip::SkipFailures;
pub use threshold::CostThreshold;
pub use trace::CostTrace;

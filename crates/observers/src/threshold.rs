use phagefit_core::Observer;

use crate::traits::{CanStopEarly, HasCost};

/// Stops a search as soon as an evaluation's cost falls to `threshold` or below.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostThreshold {
    threshold: f64,
}

impl CostThreshold {
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl<E: HasCost, A: CanStopEarly> Observer<E, A> for CostThreshold {
    fn observe(&mut self, event: &E) -> Option<A> {
        (event.cost() <= self.threshold).then(A::stop_early)
    }
}

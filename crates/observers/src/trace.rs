use phagefit_core::Observer;

use crate::traits::HasCost;

/// Records the cost of every evaluation, and the best cost after each one.
///
/// Pass `&mut CostTrace` as the observer and read the series afterwards, for
/// example to plot convergence. Failed evaluations are recorded as NaN costs
/// and leave the best unchanged.
#[derive(Debug, Clone, Default)]
pub struct CostTrace {
    costs: Vec<f64>,
    best: Vec<f64>,
}

impl CostTrace {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one evaluation's cost.
    pub fn record(&mut self, cost: f64) {
        let previous = self.best.last().copied().unwrap_or(f64::INFINITY);
        let best = if cost < previous { cost } else { previous };

        self.costs.push(cost);
        self.best.push(best);
    }

    /// Cost of each evaluation, in order.
    #[must_use]
    pub fn costs(&self) -> &[f64] {
        &self.costs
    }

    /// Best cost after each evaluation.
    #[must_use]
    pub fn best_costs(&self) -> &[f64] {
        &self.best
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.costs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }
}

impl<E: HasCost, A> Observer<E, A> for CostTrace {
    fn observe(&mut self, event: &E) -> Option<A> {
        self.record(event.cost());
        None
    }
}

/// Allows `&mut CostTrace` to be passed to solvers that take an observer by
/// value, so the series can be read after the solve completes.
impl<E: HasCost, A> Observer<E, A> for &mut CostTrace {
    fn observe(&mut self, event: &E) -> Option<A> {
        self.record(event.cost());
        None
    }
}

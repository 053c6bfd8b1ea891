use phagefit_core::Observer;

use crate::traits::HasCost;

/// Logs each evaluation of a cost-reporting solver through the `log` crate.
///
/// Successful evaluations are logged at `debug` level together with the best
/// cost seen so far; failed evaluations are logged at `warn` level. The
/// observer never intervenes in the search.
///
/// ```ignore
/// let mut progress = LogProgress::new("lumped fit");
/// levenberg_marquardt::minimize(&model, &problem, x0, &bounds, &config, &mut progress)?;
/// log::info!("best cost {:.3e} after {} evaluations", progress.best(), progress.evals());
/// ```
#[derive(Debug, Clone)]
pub struct LogProgress {
    label: String,
    evals: usize,
    best: f64,
}

impl LogProgress {
    /// Creates a progress logger whose records are prefixed with `label`.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            evals: 0,
            best: f64::INFINITY,
        }
    }

    /// Returns the number of events observed.
    #[must_use]
    pub fn evals(&self) -> usize {
        self.evals
    }

    /// Returns the lowest cost observed, or infinity if none succeeded.
    #[must_use]
    pub fn best(&self) -> f64 {
        self.best
    }

    fn record(&mut self, cost: f64) {
        self.evals += 1;

        if cost.is_nan() {
            log::warn!("{}: evaluation {} failed", self.label, self.evals);
            return;
        }

        if cost < self.best {
            self.best = cost;
        }
        log::debug!(
            "{}: evaluation {} cost {:.6e} (best {:.6e})",
            self.label,
            self.evals,
            cost,
            self.best
        );
    }
}

impl<E: HasCost, A> Observer<E, A> for LogProgress {
    fn observe(&mut self, event: &E) -> Option<A> {
        self.record(event.cost());
        None
    }
}

/// Allows `&mut LogProgress` to be passed to solvers that take an observer by
/// value, so its totals can be read after the solve completes.
impl<E: HasCost, A> Observer<E, A> for &mut LogProgress {
    fn observe(&mut self, event: &E) -> Option<A> {
        self.record(event.cost());
        None
    }
}

use nalgebra::DMatrix;
use phagefit_core::{LeastSquaresProblem, Model, Observer};

use crate::least_squares::Evaluation;

use super::{
    Action, Bounds, Error, Event, Probe,
    evaluator::{Evaluator, Outcome},
};

/// Builds the residual Jacobian at `best` by one-sided finite differences.
///
/// Each probe stays inside `bounds`, stepping backward where a forward step
/// would leave them. Columns of pinned components, and of probes the observer
/// rejected after a failure, are left at zero.
///
/// Returns `Ok(None)` if the observer asked to stop.
pub(super) fn forward_difference<M, P, Obs, const N: usize>(
    evaluator: &mut Evaluator<'_, M, P, Obs, N>,
    best: &Evaluation<M::Input, M::Output, N>,
    bounds: &Bounds<N>,
    diff_step: f64,
    iter: usize,
) -> Result<Option<DMatrix<f64>>, Error>
where
    M: Model,
    P: LeastSquaresProblem<N, Input = M::Input, Output = M::Output>,
    Obs: for<'e> Observer<Event<'e, M, P, N>, Action>,
{
    let mut jacobian = DMatrix::<f64>::zeros(best.residuals.len(), N);

    for column in 0..N {
        let step = diff_step * best.x[column].abs().max(1.0);
        let Some(probe) = bounds.probe(&best.x, column, step) else {
            continue;
        };
        let delta = probe[column] - best.x[column];

        let probed = match evaluator.eval_and_observe(
            probe,
            Probe::Jacobian { column },
            iter,
            best.cost,
        )? {
            Outcome::Accepted(eval) | Outcome::Rejected(Some(eval)) => eval,
            Outcome::Rejected(None) => continue,
            Outcome::Stop(_) => return Ok(None),
        };

        for (row, (shifted, base)) in probed.residuals.iter().zip(&best.residuals).enumerate() {
            jacobian[(row, column)] = (shifted - base) / delta;
        }
    }

    Ok(Some(jacobian))
}

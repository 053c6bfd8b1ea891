use thiserror::Error;

use phagefit_core::{LeastSquaresProblem, Model, Snapshot, sum_of_squares};

/// The result of evaluating a least-squares problem at a given `x`.
#[derive(Debug, Clone)]
pub struct Evaluation<I, O, const N: usize> {
    pub x: [f64; N],

    pub residuals: Vec<f64>,

    /// Sum of squared residuals, with NaN mapped to infinity so that any
    /// finite cost compares as better.
    pub cost: f64,

    pub snapshot: Snapshot<I, O>,
}

/// Errors that can occur when evaluating a least-squares problem.
#[derive(Debug, Error)]
pub enum EvalError<ME, PE> {
    /// The model call failed.
    #[error("model call failed")]
    Model(#[source] ME),

    /// Failed to construct input or compute residuals.
    #[error("problem error")]
    Problem(#[source] PE),
}

/// Type alias for the result of [`evaluate`].
pub type EvaluateResult<M, P, const N: usize> = Result<
    Evaluation<<M as Model>::Input, <M as Model>::Output, N>,
    EvalError<<M as Model>::Error, <P as LeastSquaresProblem<N>>::Error>,
>;

/// Evaluates the model in the context of a least-squares problem.
///
/// Maps `x` to model input, calls the model, then computes the residuals
/// from the input and output.
///
/// # Errors
///
/// Returns an error if input mapping, model call, or residual computation fails.
pub fn evaluate<M, P, const N: usize>(model: &M, problem: &P, x: [f64; N]) -> EvaluateResult<M, P, N>
where
    M: Model,
    P: LeastSquaresProblem<N, Input = M::Input, Output = M::Output>,
{
    let input = problem.input(&x).map_err(EvalError::Problem)?;
    let output = model.call(&input).map_err(EvalError::Model)?;
    let residuals = problem
        .residuals(&input, &output)
        .map_err(EvalError::Problem)?;

    let cost = sum_of_squares(&residuals);
    let cost = if cost.is_nan() { f64::INFINITY } else { cost };

    Ok(Evaluation {
        x,
        residuals,
        cost,
        snapshot: Snapshot::new(input, output),
    })
}

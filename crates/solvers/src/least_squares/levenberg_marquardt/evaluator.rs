use phagefit_core::{LeastSquaresProblem, Model, Observer};

use crate::least_squares::{Evaluation, evaluate};

use super::{Action, Error, Event, Probe};

/// What the search should do with an evaluated point.
pub(super) enum Outcome<I, O, const N: usize> {
    /// Evaluation succeeded and the observer did not intervene.
    Accepted(Evaluation<I, O, N>),

    /// The observer asked to treat the point as worse.
    Rejected(Option<Evaluation<I, O, N>>),

    /// The observer asked to stop.
    Stop(Option<Evaluation<I, O, N>>),
}

/// Evaluates points, reports them to the observer, and counts evaluations.
pub(super) struct Evaluator<'a, M, P, Obs, const N: usize> {
    model: &'a M,
    problem: &'a P,
    observer: Obs,
    evals: usize,
    residual_count: Option<usize>,
}

impl<'a, M, P, Obs, const N: usize> Evaluator<'a, M, P, Obs, N>
where
    M: Model,
    P: LeastSquaresProblem<N, Input = M::Input, Output = M::Output>,
    Obs: for<'e> Observer<Event<'e, M, P, N>, Action>,
{
    pub(super) fn new(model: &'a M, problem: &'a P, observer: Obs) -> Self {
        Self {
            model,
            problem,
            observer,
            evals: 0,
            residual_count: None,
        }
    }

    pub(super) fn evals(&self) -> usize {
        self.evals
    }

    /// Requires every later evaluation to return `count` residuals.
    pub(super) fn fix_residual_count(&mut self, count: usize) {
        self.residual_count = Some(count);
    }

    /// Evaluates `x`, emits the matching event, and applies the observer's action.
    ///
    /// A failed evaluation is an error unless the observer stops or rejects it.
    pub(super) fn eval_and_observe(
        &mut self,
        x: [f64; N],
        probe: Probe,
        iter: usize,
        best_cost: f64,
    ) -> Result<Outcome<M::Input, M::Output, N>, Error> {
        self.evals += 1;

        match evaluate(self.model, self.problem, x) {
            Ok(eval) => {
                if let Some(expected) = self.residual_count {
                    if eval.residuals.len() != expected {
                        return Err(Error::ResidualCountChanged {
                            expected,
                            actual: eval.residuals.len(),
                        });
                    }
                }

                let event = Event::Evaluated {
                    probe,
                    iter,
                    x,
                    cost: eval.cost,
                    residuals: &eval.residuals,
                    input: &eval.snapshot.input,
                    output: &eval.snapshot.output,
                    best_cost,
                };

                Ok(match self.observer.observe(&event) {
                    None => Outcome::Accepted(eval),
                    Some(Action::AssumeWorse) => Outcome::Rejected(Some(eval)),
                    Some(Action::StopEarly) => Outcome::Stop(Some(eval)),
                })
            }
            Err(err) => {
                let action = Event::<M, P, N>::emit_failure(
                    probe,
                    iter,
                    x,
                    best_cost,
                    &err,
                    &mut self.observer,
                );
                match action {
                    Some(Action::StopEarly) => Ok(Outcome::Stop(None)),
                    Some(Action::AssumeWorse) => Ok(Outcome::Rejected(None)),
                    None => Err(err.into()),
                }
            }
        }
    }
}

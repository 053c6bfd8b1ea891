use std::{cell::RefCell, rc::Rc};

use ode_solvers::{SVector, System};
use phagefit_core::{DerivativeOf, Model, OdeProblem};

use super::Error;

/// Adapts a model and problem to an `ode_solvers` system over one output interval.
///
/// States along the interval are rebuilt from the snapshot input at its start
/// (`base`) with `delta = x - start`. The first model or problem failure is
/// recorded in `failure`, which also stops the integrator at the next step.
pub(super) struct Segment<'a, M: Model, P> {
    pub(super) model: &'a M,
    pub(super) problem: &'a P,
    pub(super) base: &'a M::Input,
    pub(super) start: f64,
    pub(super) failure: Rc<RefCell<Option<Error>>>,
}

impl<M, P> Segment<'_, M, P>
where
    M: Model,
    P: OdeProblem<Input = M::Input, Output = M::Output, Delta = f64>,
{
    fn rate<const N: usize>(&self, x: f64, y: [f64; N]) -> Result<[f64; N], Error>
    where
        P::State: From<[f64; N]>,
        DerivativeOf<P::State, f64>: Into<[f64; N]>,
    {
        let state = P::State::from(y);
        let input = self
            .problem
            .build_input(self.base, &state, &(x - self.start))
            .map_err(Error::problem)?;
        let output = self.model.call(&input).map_err(Error::model)?;
        let derivative = self
            .problem
            .derivative(&input, &output)
            .map_err(Error::problem)?;

        Ok(derivative.into())
    }
}

impl<M, P, const N: usize> System<f64, SVector<f64, N>> for Segment<'_, M, P>
where
    M: Model,
    P: OdeProblem<Input = M::Input, Output = M::Output, Delta = f64>,
    P::State: From<[f64; N]>,
    DerivativeOf<P::State, f64>: Into<[f64; N]>,
{
    fn system(&self, x: f64, y: &SVector<f64, N>, dy: &mut SVector<f64, N>) {
        match self.rate(x, (*y).into()) {
            Ok(rate) => *dy = SVector::from(rate),
            Err(error) => {
                let mut failure = self.failure.borrow_mut();
                if failure.is_none() {
                    *failure = Some(error);
                }
                *dy = SVector::from_element(f64::NAN);
            }
        }
    }

    fn solout(&mut self, _x: f64, _y: &SVector<f64, N>, _dy: &SVector<f64, N>) -> bool {
        self.failure.borrow().is_some()
    }
}

//! Adaptive Dormand–Prince 5(4) integration reported at requested times.
//!
//! The integrator subdivides each interval between consecutive output times
//! into as many adaptive steps as its tolerances require, then records exactly
//! one snapshot per requested time. The first requested time is the time of
//! the initial input, so the first snapshot is the initial state itself.
//! Repeated times repeat the previous snapshot.
//!
//! States are exchanged with `ode_solvers` as fixed-size arrays, so the
//! problem's state must convert to and from `[f64; N]` and its derivative must
//! convert into `[f64; N]`.
//!
//! No constraint is imposed on the state beyond what the problem's
//! [`OdeProblem::finalize_step`] applies at each output time.

mod config;
mod error;
mod segment;
mod solution;


pub use config::{Config, ConfigError};
pub use error::Error;
pub use ode_solvers::dop_shared::IntegrationError;
pub use solution::Solution;

use std::{cell::RefCell, rc::Rc};

use ode_solvers::{Dopri5, SVector, dop_shared::OutputType};
use phagefit_core::{DerivativeOf, Model, OdeProblem, Snapshot};

use segment::Segment;

const SAFETY_FACTOR: f64 = 0.9;
const BETA: f64 = 0.04;
const FAC_MIN: f64 = 0.2;
const FAC_MAX: f64 = 10.0;

/// Integrates an ODE problem and reports the state at each of `times`.
///
/// # Errors
///
/// Returns an error if `times` is empty, not finite, or decreasing, if the
/// integrator fails on any interval (step budget exhausted, step-size
/// underflow, or stiffness detected), or if the model or problem fails.
pub fn solve<M, P, const N: usize>(
    model: &M,
    problem: &P,
    initial: M::Input,
    times: &[f64],
    config: &Config,
) -> Result<Solution<M::Input, M::Output>, Error>
where
    M: Model,
    M::Input: Clone,
    M::Output: Clone,
    P: OdeProblem<Input = M::Input, Output = M::Output, Delta = f64>,
    P::State: From<[f64; N]> + Into<[f64; N]>,
    DerivativeOf<P::State, f64>: Into<[f64; N]>,
{
    validate_times(times)?;

    let initial_output = model.call(&initial).map_err(Error::model)?;

    let mut history = Vec::with_capacity(times.len());
    history.push(Snapshot::new(initial, initial_output));

    let mut work = Work::default();

    for window in times.windows(2) {
        let (start, end) = (window[0], window[1]);
        let current = &history[history.len() - 1];

        let next = if end == start {
            current.clone()
        } else {
            integrate_interval::<M, P, N>(model, problem, current, start, end, config, &mut work)?
        };

        history.push(next);
    }

    Ok(Solution {
        history,
        evaluations: work.evaluations,
        accepted_steps: work.accepted_steps,
        rejected_steps: work.rejected_steps,
    })
}

#[derive(Debug, Default)]
struct Work {
    evaluations: u32,
    accepted_steps: u32,
    rejected_steps: u32,
}

fn validate_times(times: &[f64]) -> Result<(), Error> {
    if times.is_empty() {
        return Err(Error::NoTimes);
    }

    let mut previous = f64::NEG_INFINITY;
    for (index, &time) in times.iter().enumerate() {
        if !time.is_finite() || time < previous {
            return Err(Error::InvalidTime { index, time });
        }
        previous = time;
    }

    Ok(())
}

/// Advances `current` from `start` to `end` and evaluates the model there.
fn integrate_interval<M, P, const N: usize>(
    model: &M,
    problem: &P,
    current: &Snapshot<M::Input, M::Output>,
    start: f64,
    end: f64,
    config: &Config,
    work: &mut Work,
) -> Result<Snapshot<M::Input, M::Output>, Error>
where
    M: Model,
    P: OdeProblem<Input = M::Input, Output = M::Output, Delta = f64>,
    P::State: From<[f64; N]> + Into<[f64; N]>,
    DerivativeOf<P::State, f64>: Into<[f64; N]>,
{
    let y_start: [f64; N] = problem
        .state(&current.input)
        .map_err(Error::problem)?
        .into();

    let failure = Rc::new(RefCell::new(None));
    let segment = Segment {
        model,
        problem,
        base: &current.input,
        start,
        failure: Rc::clone(&failure),
    };

    let span = end - start;
    let mut stepper = Dopri5::from_param(
        segment,
        start,
        end,
        span,
        SVector::from(y_start),
        config.rel_tol(),
        config.abs_tol(),
        SAFETY_FACTOR,
        BETA,
        FAC_MIN,
        FAC_MAX,
        span,
        0.0,
        config.max_steps(),
        config.stiffness_checks(),
        OutputType::Sparse,
    );

    let outcome = stepper.integrate();

    if let Some(error) = failure.borrow_mut().take() {
        return Err(error);
    }

    let stats = outcome.map_err(|source| Error::Integration { start, end, source })?;
    work.evaluations += stats.num_eval;
    work.accepted_steps += stats.accepted_steps;
    work.rejected_steps += stats.rejected_steps;

    let y_end: [f64; N] = stepper
        .y_out()
        .last()
        .copied()
        .ok_or(Error::NoOutput { start, end })?
        .into();
    let state = P::State::from(y_end);

    let input = problem
        .build_input(&current.input, &state, &span)
        .map_err(Error::problem)?;
    let input = problem
        .finalize_step(input, &current.input, &current.output, &span)
        .map_err(Error::problem)?;
    let output = model.call(&input).map_err(Error::model)?;

    Ok(Snapshot::new(input, output))
}

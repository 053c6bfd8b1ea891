//! Forward Euler integration for ODE problems.
//!
//! Each step threads the previous snapshot into the next one:
//!
//! ```text
//! state_{n+1} = finalize(state_n + dt * derivative_n)
//! ```
//!
//! The problem's [`OdeProblem::finalize_step`] hook runs on every step before
//! the model is called at the new state, which is where constraints such as a
//! nonnegativity clamp belong. No stability check is made: an unstable `dt`
//! simply produces a diverging history.
//!
//! # Example
//!
//! ```ignore
//! use phagefit_solvers::transient::euler;
//!
//! let solution = euler::solve_unobserved(&model, &problem, initial_input, dt, steps)?;
//!
//! for snapshot in &solution.history {
//!     println!("{:?} -> {:?}", snapshot.input, snapshot.output);
//! }
//! ```

mod action;
mod error;
mod event;
mod solution;

pub use action::Action;
pub use error::Error;
pub use event::Event;
pub use solution::{Endpoint, Solution, Status};

use phagefit_core::{Model, Observer, OdeProblem, Snapshot, StepIntegrable};

use error::Failure;

/// Integrates an ODE problem using forward Euler.
///
/// The returned history holds `steps + 1` snapshots (initial state included)
/// unless the observer stops the run early.
///
/// # Observer
///
/// The observer receives an [`Event`] for the initial snapshot (step 0) and
/// after each step, and may return [`Action::StopEarly`] to end the run with
/// the history recorded so far.
///
/// # Errors
///
/// Returns an error if the model or problem returns an error at any point.
pub fn solve<M, P, Obs>(
    model: &M,
    problem: &P,
    initial: M::Input,
    dt: P::Delta,
    steps: usize,
    observer: Obs,
) -> Result<Solution<M::Input, M::Output>, Error>
where
    M: Model,
    P: OdeProblem<Input = M::Input, Output = M::Output>,
    P::Delta: Clone,
    Obs: for<'a> Observer<Event<'a, M::Input, M::Output>, Action>,
{
    let mut history = Vec::with_capacity(steps + 1);
    let end = drive(model, problem, initial, dt, steps, observer, |snapshot| {
        history.push(snapshot);
    })?;
    history.push(end.snapshot);

    Ok(Solution {
        status: end.status,
        history,
        steps: end.steps,
    })
}

/// Integrates an ODE problem using forward Euler, keeping only the last
/// snapshot.
///
/// Earlier snapshots are dropped as soon as the observer has seen them, so
/// memory stays constant in `steps`.
///
/// # Errors
///
/// Returns an error if the model or problem returns an error at any point.
pub fn solve_to_end<M, P, Obs>(
    model: &M,
    problem: &P,
    initial: M::Input,
    dt: P::Delta,
    steps: usize,
    observer: Obs,
) -> Result<Endpoint<M::Input, M::Output>, Error>
where
    M: Model,
    P: OdeProblem<Input = M::Input, Output = M::Output>,
    P::Delta: Clone,
    Obs: for<'a> Observer<Event<'a, M::Input, M::Output>, Action>,
{
    drive(model, problem, initial, dt, steps, observer, drop)
}

/// Integrates an ODE problem using forward Euler without observation.
///
/// # Errors
///
/// Returns an error if the model or problem returns an error at any point.
pub fn solve_unobserved<M, P>(
    model: &M,
    problem: &P,
    initial: M::Input,
    dt: P::Delta,
    steps: usize,
) -> Result<Solution<M::Input, M::Output>, Error>
where
    M: Model,
    P: OdeProblem<Input = M::Input, Output = M::Output>,
    P::Delta: Clone,
{
    solve(model, problem, initial, dt, steps, ())
}

/// Runs the step loop, handing each superseded snapshot to `retire`.
fn drive<M, P, Obs>(
    model: &M,
    problem: &P,
    initial: M::Input,
    dt: P::Delta,
    steps: usize,
    mut observer: Obs,
    mut retire: impl FnMut(Snapshot<M::Input, M::Output>),
) -> Result<Endpoint<M::Input, M::Output>, Error>
where
    M: Model,
    P: OdeProblem<Input = M::Input, Output = M::Output>,
    P::Delta: Clone,
    Obs: for<'a> Observer<Event<'a, M::Input, M::Output>, Action>,
{
    let initial_output = model
        .call(&initial)
        .map_err(|err| Error::model(0, err))?;
    let mut current = Snapshot::new(initial, initial_output);

    if stop_requested(&mut observer, 0, &current) {
        return Ok(Endpoint {
            status: Status::StoppedByObserver,
            snapshot: current,
            steps: 0,
        });
    }

    for step in 1..=steps {
        let next = advance(model, problem, &current, &dt)
            .map_err(|failure| failure.at_step(step))?;
        retire(std::mem::replace(&mut current, next));

        if stop_requested(&mut observer, step, &current) {
            return Ok(Endpoint {
                status: Status::StoppedByObserver,
                snapshot: current,
                steps: step,
            });
        }
    }

    Ok(Endpoint {
        status: Status::Complete,
        snapshot: current,
        steps,
    })
}

/// Produces the snapshot one step after `current`.
fn advance<M, P>(
    model: &M,
    problem: &P,
    current: &Snapshot<M::Input, M::Output>,
    dt: &P::Delta,
) -> Result<Snapshot<M::Input, M::Output>, Failure>
where
    M: Model,
    P: OdeProblem<Input = M::Input, Output = M::Output>,
    P::Delta: Clone,
{
    let state = problem.state(&current.input).map_err(Failure::problem)?;
    let derivative = problem
        .derivative(&current.input, &current.output)
        .map_err(Failure::problem)?;

    let next_state = state.step(derivative, dt.clone());

    let next_input = problem
        .build_input(&current.input, &next_state, dt)
        .map_err(Failure::problem)?;
    let next_input = problem
        .finalize_step(next_input, &current.input, &current.output, dt)
        .map_err(Failure::problem)?;

    let next_output = model.call(&next_input).map_err(Failure::model)?;
    Ok(Snapshot::new(next_input, next_output))
}

fn stop_requested<I, O, Obs>(observer: &mut Obs, step: usize, snapshot: &Snapshot<I, O>) -> bool
where
    Obs: for<'a> Observer<Event<'a, I, O>, Action>,
{
    let event = Event { step, snapshot };
    matches!(observer.observe(&event), Some(Action::StopEarly))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::convert::Infallible;

    use approx::assert_relative_eq;
    use phagefit_core::DerivativeOf;

    /// Bacterial density.
    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Density(f64);

    /// Net growth rate of the density.
    #[derive(Debug, Clone, Copy)]
    struct Growth(f64);

    impl StepIntegrable<f64> for Density {
        type Derivative = Growth;

        fn step(&self, growth: Growth, dt: f64) -> Self {
            Density(self.0 + dt * growth.0)
        }
    }

    #[derive(Debug, Clone)]
    struct Culture {
        density: Density,
        time: f64,
    }

    /// Logistic growth with an optional constant harvest: r·N·(1 − N/K) − h.
    struct Logistic {
        rate: f64,
        capacity: f64,
        harvest: f64,
    }

    impl Model for Logistic {
        type Input = Culture;
        type Output = Growth;
        type Error = Infallible;

        fn call(&self, culture: &Culture) -> Result<Growth, Self::Error> {
            let n = culture.density.0;
            Ok(Growth(
                self.rate * n * (1.0 - n / self.capacity) - self.harvest,
            ))
        }
    }

    /// Integrates the culture and keeps the density nonnegative.
    struct ClampedCulture;

    impl OdeProblem for ClampedCulture {
        type Input = Culture;
        type Output = Growth;
        type Delta = f64;
        type State = Density;
        type Error = Infallible;

        fn state(&self, culture: &Culture) -> Result<Density, Self::Error> {
            Ok(culture.density)
        }

        fn derivative(
            &self,
            _culture: &Culture,
            growth: &Growth,
        ) -> Result<DerivativeOf<Density, f64>, Self::Error> {
            Ok(*growth)
        }

        fn build_input(
            &self,
            base: &Culture,
            density: &Density,
            dt: &f64,
        ) -> Result<Culture, Self::Error> {
            Ok(Culture {
                density: *density,
                time: base.time + dt,
            })
        }

        fn finalize_step(
            &self,
            mut next: Culture,
            _prev_input: &Culture,
            _prev_output: &Growth,
            _dt: &f64,
        ) -> Result<Culture, Self::Error> {
            next.density = Density(next.density.0.max(0.0));
            Ok(next)
        }
    }

    fn culture(density: f64) -> Culture {
        Culture {
            density: Density(density),
            time: 0.0,
        }
    }

    #[test]
    fn logistic_growth_matches_explicit_recurrence() {
        let model = Logistic {
            rate: 0.5,
            capacity: 1.0,
            harvest: 0.0,
        };

        let solution =
            solve_unobserved(&model, &ClampedCulture, culture(0.1), 0.1, 10).expect("should solve");

        assert_eq!(solution.status, Status::Complete);
        assert_eq!(solution.steps, 10);
        assert_eq!(solution.history.len(), 11);

        let mut expected = 0.1;
        for snapshot in &solution.history {
            assert_relative_eq!(snapshot.input.density.0, expected, epsilon = 1e-12);
            expected += 0.1 * 0.5 * expected * (1.0 - expected);
        }

        let last = solution.final_snapshot();
        assert_relative_eq!(last.input.time, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn finalize_hook_clamps_every_step() {
        // Harvest far exceeds growth, so the raw update goes negative.
        let model = Logistic {
            rate: 0.5,
            capacity: 1.0,
            harvest: 5.0,
        };

        let solution =
            solve_unobserved(&model, &ClampedCulture, culture(0.2), 0.1, 5).expect("should solve");

        assert!(solution.history.iter().all(|s| s.input.density.0 >= 0.0));
        assert_eq!(solution.history[1].input.density.0, 0.0);
        assert_eq!(solution.final_snapshot().input.density.0, 0.0);
    }

    #[test]
    fn observer_can_stop_early() {
        let model = Logistic {
            rate: 1.0,
            capacity: 10.0,
            harvest: 0.0,
        };

        let observer = |event: &Event<'_, Culture, Growth>| {
            (event.snapshot.input.density.0 > 2.0).then_some(Action::StopEarly)
        };

        let solution = solve(&model, &ClampedCulture, culture(1.0), 0.1, 1000, observer)
            .expect("should stop early");

        assert_eq!(solution.status, Status::StoppedByObserver);
        assert!(solution.steps < 1000);
        assert_eq!(solution.history.len(), solution.steps + 1);
        assert!(solution.final_snapshot().input.density.0 > 2.0);
    }

    #[test]
    fn zero_steps_returns_initial() {
        let model = Logistic {
            rate: 1.0,
            capacity: 1.0,
            harvest: 0.0,
        };

        let solution =
            solve_unobserved(&model, &ClampedCulture, culture(0.3), 0.1, 0).expect("should solve");

        assert_eq!(solution.status, Status::Complete);
        assert_eq!(solution.steps, 0);
        assert_eq!(solution.history.len(), 1);
        assert_relative_eq!(solution.history[0].input.density.0, 0.3);
    }

    #[test]
    fn step_numbers_start_at_zero() {
        let model = Logistic {
            rate: 1.0,
            capacity: 1.0,
            harvest: 0.0,
        };

        let mut steps = Vec::new();
        solve(
            &model,
            &ClampedCulture,
            culture(0.5),
            0.25,
            4,
            |event: &Event<'_, Culture, Growth>| {
                steps.push(event.step);
                None
            },
        )
        .expect("should solve");

        assert_eq!(steps, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn solve_to_end_keeps_the_final_snapshot_only() {
        let model = Logistic {
            rate: 0.5,
            capacity: 1.0,
            harvest: 0.0,
        };

        let full =
            solve_unobserved(&model, &ClampedCulture, culture(0.1), 0.1, 10).expect("should solve");

        let mut seen = 0;
        let end = solve_to_end(
            &model,
            &ClampedCulture,
            culture(0.1),
            0.1,
            10,
            |_: &Event<'_, Culture, Growth>| {
                seen += 1;
                None
            },
        )
        .expect("should solve");

        assert_eq!(seen, 11);
        assert_eq!(end.status, Status::Complete);
        assert_eq!(end.steps, 10);
        assert_eq!(
            end.snapshot.input.density,
            full.final_snapshot().input.density
        );
        assert_relative_eq!(end.snapshot.input.time, 1.0, epsilon = 1e-12);
    }
}

use phagefit_core::{LeastSquaresProblem, Model, Observer};

use crate::least_squares::Evaluation;

use super::{
    Action, Bounds, Config, Error, Event, Probe, Solution, Status,
    evaluator::{Evaluator, Outcome},
    jacobian::forward_difference,
    normal::NormalEquations,
};

const INITIAL_DAMPING: f64 = 1e-3;
const DAMPING_UP: f64 = 10.0;
const DAMPING_DOWN: f64 = 0.1;
const MIN_DAMPING: f64 = 1e-12;
const MAX_DAMPING: f64 = 1e10;

/// Core bounded Levenberg–Marquardt iteration.
pub(super) fn search<M, P, Obs, const N: usize>(
    model: &M,
    problem: &P,
    x0: [f64; N],
    bounds: &Bounds<N>,
    config: &Config,
    observer: Obs,
) -> Result<Solution<M::Input, M::Output, N>, Error>
where
    M: Model,
    P: LeastSquaresProblem<N, Input = M::Input, Output = M::Output>,
    Obs: for<'a> Observer<Event<'a, M, P, N>, Action>,
{
    if let Some(index) = bounds.first_violation(&x0) {
        return Err(Error::GuessOutOfBounds {
            index,
            value: x0[index],
            lower: bounds.lower()[index],
            upper: bounds.upper()[index],
        });
    }

    let mut evaluator = Evaluator::new(model, problem, observer);

    let mut best = match evaluator.eval_and_observe(x0, Probe::Initial, 0, f64::INFINITY)? {
        Outcome::Accepted(eval) | Outcome::Rejected(Some(eval)) => eval,
        Outcome::Stop(Some(eval)) => {
            return Ok(Solution::from_best(
                eval,
                Status::StoppedByObserver,
                0,
                evaluator.evals(),
            ));
        }
        Outcome::Rejected(None) | Outcome::Stop(None) => {
            return Err(Error::NoSuccessfulEvaluation);
        }
    };

    if best.residuals.is_empty() {
        return Err(Error::EmptyResiduals);
    }
    evaluator.fix_residual_count(best.residuals.len());

    let mut damping = INITIAL_DAMPING;

    for iter in 1..=config.max_iters() {
        let Some(jacobian) =
            forward_difference(&mut evaluator, &best, bounds, config.diff_step(), iter)?
        else {
            return finished(best, Status::StoppedByObserver, iter, evaluator.evals());
        };

        let mut normal = NormalEquations::new(&jacobian, &best.residuals);
        let blocked = bounds.blocked(&best.x, normal.gradient());
        normal.freeze(&blocked);
        if normal.gradient_norm() <= config.g_tol() {
            return finished(best, Status::Converged, iter, evaluator.evals());
        }

        // Raise the damping until a trial step lowers the cost.
        loop {
            let Some(step) = normal.damped_step::<N>(damping) else {
                damping *= DAMPING_UP;
                if damping > MAX_DAMPING {
                    return finished(best, Status::Stalled, iter, evaluator.evals());
                }
                continue;
            };

            let trial_x = bounds.project(std::array::from_fn(|i| best.x[i] + step[i]));
            let step_norm = distance(&trial_x, &best.x);
            if step_norm <= config.x_tol() * (config.x_tol() + norm(&best.x)) {
                return finished(best, Status::Converged, iter, evaluator.evals());
            }

            match evaluator.eval_and_observe(trial_x, Probe::Trial, iter, best.cost)? {
                Outcome::Accepted(trial) if trial.cost < best.cost => {
                    let reduction = best.cost - trial.cost;
                    let previous = best.cost;
                    best = trial;
                    damping = (damping * DAMPING_DOWN).max(MIN_DAMPING);

                    if previous.is_finite() && reduction <= config.f_tol() * previous {
                        return finished(best, Status::Converged, iter, evaluator.evals());
                    }
                    break;
                }
                Outcome::Stop(trial) => {
                    let best = better(best, trial);
                    return finished(best, Status::StoppedByObserver, iter, evaluator.evals());
                }
                Outcome::Accepted(_) | Outcome::Rejected(_) => {
                    damping *= DAMPING_UP;
                    if damping > MAX_DAMPING {
                        return finished(best, Status::Stalled, iter, evaluator.evals());
                    }
                }
            }
        }
    }

    Ok(Solution::from_best(
        best,
        Status::MaxIters,
        config.max_iters(),
        evaluator.evals(),
    ))
}

fn finished<I, O, const N: usize>(
    best: Evaluation<I, O, N>,
    status: Status,
    iters: usize,
    evals: usize,
) -> Result<Solution<I, O, N>, Error> {
    Ok(Solution::from_best(best, status, iters, evals))
}

fn better<I, O, const N: usize>(
    best: Evaluation<I, O, N>,
    candidate: Option<Evaluation<I, O, N>>,
) -> Evaluation<I, O, N> {
    match candidate {
        Some(candidate) if candidate.cost < best.cost => candidate,
        _ => best,
    }
}

fn norm<const N: usize>(x: &[f64; N]) -> f64 {
    x.iter().map(|v| v * v).sum::<f64>().sqrt()
}

fn distance<const N: usize>(a: &[f64; N], b: &[f64; N]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(a, b)| (a - b) * (a - b))
        .sum::<f64>()
        .sqrt()
}

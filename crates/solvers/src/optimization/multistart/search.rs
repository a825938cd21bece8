use econsolve_core::{Model, Observer, OptimizationProblem};
use rand::Rng;
use tracing::{debug, debug_span, info, warn};

use crate::optimization::evaluate::{Evaluation, evaluate};

use super::{
    Action, Config, Error, Event, LocalError, LocalMinimizer, Phase, Point, Solution, Status,
    local::CostError,
    schedule::{blend, blend_weight},
    state::SearchState,
};

/// Core refined multi-start loop.
pub(super) fn search<M, P, L, R, Obs, const N: usize>(
    model: &M,
    problem: &P,
    local: &L,
    rng: &mut R,
    config: &Config,
    mut observer: Obs,
) -> Result<Solution<M::Input, M::Output, N>, Error>
where
    M: Model,
    P: OptimizationProblem<N, Input = M::Input, Output = M::Output>,
    L: LocalMinimizer<N>,
    R: Rng + ?Sized,
    Obs: for<'a> Observer<Event<'a, M::Input, M::Output, N>, Action>,
{
    let _span = debug_span!(
        "multistart",
        dim = N,
        warmup = config.warmup(),
        max_iters = config.max_iters()
    )
    .entered();

    let mut state = SearchState::with_capacity(config.max_iters());

    for iter in 0..config.max_iters() {
        let phase = Phase::of(iter, config.warmup());
        let draw = sample(rng, config.bounds());

        // Without an incumbent (every warm-up restart failed) there is nothing
        // to blend toward, so the raw draw is used.
        let (start, weight) = match (phase, state.best_point()) {
            (Phase::Exploit, Some(best)) => {
                let weight = blend_weight(iter, config.warmup());
                (blend(&draw, &best.x, weight), Some(weight))
            }
            _ => (draw, None),
        };
        state.record_guess(start);

        let outcome = run_local(model, problem, local, start, config.tolerance());
        let action = match (outcome, state.best_point()) {
            (Ok(candidate), Some(best)) if !state.is_improvement(&candidate) => {
                let point = Point::from(&candidate);
                debug!(
                    iter,
                    ?phase,
                    objective = point.objective,
                    best = best.objective,
                    "no improvement"
                );
                let event: Event<'_, M::Input, M::Output, N> = Event::NotImproved {
                    iter,
                    phase,
                    start,
                    weight,
                    point,
                    best,
                };
                observer.observe(&event)
            }
            (Ok(candidate), _) => {
                debug!(iter, ?phase, objective = candidate.objective, "new incumbent");
                let action = {
                    let event = Event::Improved {
                        iter,
                        phase,
                        start,
                        weight,
                        point: Point::from(&candidate),
                        input: &candidate.snapshot.input,
                        output: &candidate.snapshot.output,
                    };
                    observer.observe(&event)
                };
                state.accept(candidate);
                action
            }
            (Err(error), best) => {
                warn!(iter, ?phase, ?start, %error, "restart failed, keeping incumbent");
                let action = {
                    let event: Event<'_, M::Input, M::Output, N> = Event::LocalFailed {
                        iter,
                        phase,
                        start,
                        weight,
                        best,
                        error: &error,
                    };
                    observer.observe(&event)
                };
                state.record_failure(iter, start, error);
                action
            }
        };

        let iters = iter + 1;
        if state.is_converged(config.tolerance()) {
            info!(iters, "converged");
            return state.into_solution(Status::Converged, iters);
        }
        if action == Some(Action::StopEarly) {
            info!(iters, "stopped by observer");
            return state.into_solution(Status::StoppedByObserver, iters);
        }
    }

    info!(iters = config.max_iters(), "iteration limit reached");
    state.into_solution(Status::MaxIters, config.max_iters())
}

/// Draws a point with each coordinate uniform on `[lo, hi)`.
fn sample<R, const N: usize>(rng: &mut R, [lo, hi]: [f64; 2]) -> [f64; N]
where
    R: Rng + ?Sized,
{
    std::array::from_fn(|_| rng.random_range(lo..hi))
}

/// Runs the local minimizer from `start` and evaluates its result.
fn run_local<M, P, L, const N: usize>(
    model: &M,
    problem: &P,
    local: &L,
    start: [f64; N],
    tolerance: f64,
) -> Result<Evaluation<M::Input, M::Output, N>, LocalError>
where
    M: Model,
    P: OptimizationProblem<N, Input = M::Input, Output = M::Output>,
    L: LocalMinimizer<N>,
{
    let cost = |x: &[f64; N]| -> Result<f64, CostError> {
        Ok(evaluate(model, problem, *x)?.objective)
    };

    let x = local
        .minimize(&cost, start, tolerance)
        .map_err(|e| LocalError::Minimizer(Box::new(e)))?;

    evaluate(model, problem, x).map_err(LocalError::from)
}

//! Refined multi-start global minimization.
//!
//! # Algorithm
//!
//! Each iteration `k` draws a random point with every coordinate uniform over
//! the configured bounds and runs a local minimizer from an effective starting
//! point:
//!
//! - **Warm-up** (`k < warmup`): the random draw itself.
//! - **Exploit** (`k >= warmup`): the draw blended toward the incumbent,
//!   `x0 = χ·x + (1 − χ)·best` with `χ = 1 / (1 + exp((k − warmup) / 100))`.
//!   The weight starts at 0.5 and decays toward 0, so restarts cluster ever
//!   closer around the best point found so far.
//!
//! A local result replaces the incumbent only when its objective is strictly
//! lower. The run stops as soon as the incumbent objective drops below the
//! tolerance, or after `max_iters` restarts.
//!
//! Results are reproducible for a given seed: the random source is passed in
//! by the caller and is drawn from in a fixed order.
//!
//! # Local failures
//!
//! A restart whose local minimization fails, or whose result cannot be
//! evaluated to a finite objective, never ends the run. The failure is logged,
//! reported to the observer as [`Event::LocalFailed`], recorded in
//! [`Solution::failures`], and the incumbent is left untouched. Only a run in
//! which no restart succeeded returns [`Error::NoSolutionFound`].
//!
//! # Observer Events
//!
//! The solver emits one [`Event`] per restart, after the incumbent update.
//! Observers can return [`Action::StopEarly`] to end the run with the current
//! incumbent.

mod action;
mod config;
mod error;
mod event;
mod lbfgs;
mod local;
mod point;
mod schedule;
mod search;
mod solution;
mod state;

#[cfg(test)]
mod tests;

pub use action::Action;
pub use config::{Config, ConfigError};
pub use error::{Error, LocalError};
pub use event::Event;
pub use lbfgs::{Lbfgs, LbfgsConfigError, LbfgsError};
pub use local::{CostError, LocalMinimizer};
pub use point::Point;
pub use schedule::{Phase, blend_weight};
pub use solution::{LocalFailure, Solution, Status};

use econsolve_core::{Model, Observer, OptimizationProblem};
use rand::Rng;

/// Finds a global minimum of the objective by refined multi-start search.
///
/// `local` runs each restart; `rng` supplies every random draw of the run.
/// The observer receives an [`Event`] for each restart.
/// See the [module docs](self) for the schedule and failure handling.
///
/// # Errors
///
/// Returns [`Error::NoSolutionFound`] if every restart failed.
pub fn minimize<M, P, L, R, Obs, const N: usize>(
    model: &M,
    problem: &P,
    local: &L,
    rng: &mut R,
    config: &Config,
    observer: Obs,
) -> Result<Solution<M::Input, M::Output, N>, Error>
where
    M: Model,
    P: OptimizationProblem<N, Input = M::Input, Output = M::Output>,
    L: LocalMinimizer<N>,
    R: Rng + ?Sized,
    Obs: for<'a> Observer<Event<'a, M::Input, M::Output, N>, Action>,
{
    search::search(model, problem, local, rng, config, observer)
}

/// Finds a global minimum without observer support.
///
/// This is a convenience wrapper around [`minimize`] that uses a no-op observer.
///
/// # Errors
///
/// Returns [`Error::NoSolutionFound`] if every restart failed.
pub fn minimize_unobserved<M, P, L, R, const N: usize>(
    model: &M,
    problem: &P,
    local: &L,
    rng: &mut R,
    config: &Config,
) -> Result<Solution<M::Input, M::Output, N>, Error>
where
    M: Model,
    P: OptimizationProblem<N, Input = M::Input, Output = M::Output>,
    L: LocalMinimizer<N>,
    R: Rng + ?Sized,
{
    minimize(model, problem, local, rng, config, ())
}

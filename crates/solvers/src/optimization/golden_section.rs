//! Golden section search for single-variable optimization.
//!
//! # Algorithm
//!
//! Golden section search finds the minimum (or maximum) of a unimodal function
//! on a bounded interval. It keeps two interior points positioned by the
//! golden ratio, compares their objectives, and shrinks the bracket toward the
//! better one. Each shrink reuses one interior point, so every iteration costs
//! a single evaluation.
//!
//! # Limitations
//!
//! - **Single variable only**: works with [`OptimizationProblem<1>`]
//! - **Unimodal assumption**: may settle on a local optimum if the bracket
//!   holds several
//! - **Bracket-bound**: an optimum on an edge of the bracket is approached but
//!   never evaluated exactly
//!
//! A failed evaluation ends the search with an [`Error`], as does a bracket
//! without two distinct finite bounds.

mod bracket;
mod config;
mod error;
mod solution;


pub use config::{Config, ConfigError};
pub use error::Error;
pub use solution::{Solution, Status};

use econsolve_core::{Model, OptimizationProblem};

use crate::optimization::evaluate::Sense;

use bracket::Bracket;

/// Finds the minimum of the objective on `bracket` using golden section search.
///
/// # Errors
///
/// Returns an error if the bracket is unusable or an evaluation fails.
pub fn minimize<M, P>(
    model: &M,
    problem: &P,
    bracket: [f64; 2],
    config: &Config,
) -> Result<Solution<M::Input, M::Output>, Error>
where
    M: Model,
    P: OptimizationProblem<1, Input = M::Input, Output = M::Output>,
{
    search(model, problem, bracket, config, Sense::Minimize)
}

/// Finds the maximum of the objective on `bracket` using golden section search.
///
/// # Errors
///
/// Returns an error if the bracket is unusable or an evaluation fails.
pub fn maximize<M, P>(
    model: &M,
    problem: &P,
    bracket: [f64; 2],
    config: &Config,
) -> Result<Solution<M::Input, M::Output>, Error>
where
    M: Model,
    P: OptimizationProblem<1, Input = M::Input, Output = M::Output>,
{
    search(model, problem, bracket, config, Sense::Maximize)
}

fn search<M, P>(
    model: &M,
    problem: &P,
    bounds: [f64; 2],
    config: &Config,
    sense: Sense,
) -> Result<Solution<M::Input, M::Output>, Error>
where
    M: Model,
    P: OptimizationProblem<1, Input = M::Input, Output = M::Output>,
{
    let mut bracket = Bracket::new(model, problem, bounds)?;

    let mut iters = 0;
    while iters < config.max_iters() && !config.is_converged(bracket.gap(), bracket.center()) {
        bracket.shrink(model, problem, sense)?;
        iters += 1;
    }

    let status = if config.is_converged(bracket.gap(), bracket.center()) {
        Status::Converged
    } else {
        Status::MaxIters
    };
    let best = bracket.into_best(sense);

    Ok(Solution {
        status,
        x: best.x[0],
        objective: best.objective,
        snapshot: best.snapshot,
        iters,
    })
}

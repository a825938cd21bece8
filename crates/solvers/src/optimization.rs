//! Solvers for optimization problems, minimizing or maximizing an objective.
//!
//! An [`OptimizationProblem`] maps solver variables `x: [f64; N]` to model
//! inputs, calls the model, and extracts a scalar objective. Solvers in this
//! module search for the `x` that minimizes or maximizes that objective.
//!
//! # Solvers
//!
//! - [`multistart`]: global minimization by randomized restarts of a local
//!   quasi-Newton minimizer, refined toward the incumbent over time
//! - [`golden_section`]: derivative-free search over a bracketed interval for
//!   unimodal functions of one variable
//!
//! [`OptimizationProblem`]: econsolve_core::OptimizationProblem

mod evaluate;

pub use evaluate::{EvalError, Evaluation, Sense, evaluate};

pub mod golden_section;
pub mod multistart;

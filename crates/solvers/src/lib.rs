//! Numerical optimizers for econsolve models.
//!
//! Solvers work against the [`Model`] and [`OptimizationProblem`] traits from
//! `econsolve-core`, so any model can be optimized once a problem adapts solver
//! variables to its input and extracts an objective from its output.
//!
//! [`Model`]: econsolve_core::Model
//! [`OptimizationProblem`]: econsolve_core::OptimizationProblem

pub mod optimization;

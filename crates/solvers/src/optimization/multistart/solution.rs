use econsolve_core::Snapshot;

use super::LocalError;

/// How a multi-start run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The incumbent objective fell below the tolerance.
    Converged,

    /// Ran all restarts without reaching the tolerance.
    MaxIters,

    /// Stopped early due to an observer decision.
    StoppedByObserver,
}

/// A restart that produced no usable candidate.
#[derive(Debug)]
pub struct LocalFailure<const N: usize> {
    /// Restart index.
    pub iter: usize,

    /// Effective starting point of the restart.
    pub start: [f64; N],

    pub error: LocalError,
}

/// The result of a refined multi-start run.
#[derive(Debug)]
pub struct Solution<I, O, const N: usize> {
    pub status: Status,

    /// Best point found.
    pub x: [f64; N],

    /// Objective value at `x`.
    pub objective: f64,

    /// Model input and output at `x`.
    pub snapshot: Snapshot<I, O>,

    /// Effective starting point of every restart, in order.
    pub guesses: Vec<[f64; N]>,

    /// Restarts that failed and were skipped, in order.
    pub failures: Vec<LocalFailure<N>>,

    /// Number of restarts run.
    pub iters: usize,
}

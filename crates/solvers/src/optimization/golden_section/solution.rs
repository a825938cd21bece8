use econsolve_core::Snapshot;

/// Whether golden section search converged or ran out of iterations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The bracket shrank within the configured tolerances.
    Converged,

    /// Reached the iteration limit without converging.
    MaxIters,
}

/// The result of a golden section search.
#[derive(Debug, Clone)]
pub struct Solution<I, O> {
    pub status: Status,

    /// Best estimate of the optimum x.
    pub x: f64,

    /// Objective value at `x`.
    pub objective: f64,

    /// Model input and output at `x`.
    pub snapshot: Snapshot<I, O>,

    /// Number of bracket shrinks performed.
    pub iters: usize,
}

use crate::optimization::evaluate::Evaluation;

use super::{Error, LocalError, LocalFailure, Point, Solution, Status};

/// Mutable state of one multi-start run.
///
/// Owned by a single run and consumed into a [`Solution`] when it ends.
pub(super) struct SearchState<I, O, const N: usize> {
    best: Option<Evaluation<I, O, N>>,
    guesses: Vec<[f64; N]>,
    failures: Vec<LocalFailure<N>>,
}

/// Upper bound on the guesses reserved up front; longer runs grow the vector.
const RESERVED_GUESSES: usize = 1024;

impl<I, O, const N: usize> SearchState<I, O, N> {
    pub(super) fn with_capacity(max_iters: usize) -> Self {
        Self {
            best: None,
            guesses: Vec::with_capacity(max_iters.min(RESERVED_GUESSES)),
            failures: Vec::new(),
        }
    }

    pub(super) fn best_point(&self) -> Option<Point<N>> {
        self.best.as_ref().map(Point::from)
    }

    pub(super) fn record_guess(&mut self, start: [f64; N]) {
        self.guesses.push(start);
    }

    pub(super) fn record_failure(&mut self, iter: usize, start: [f64; N], error: LocalError) {
        self.failures.push(LocalFailure { iter, start, error });
    }

    /// Whether `candidate` strictly beats the incumbent (or there is none).
    pub(super) fn is_improvement(&self, candidate: &Evaluation<I, O, N>) -> bool {
        self.best
            .as_ref()
            .is_none_or(|best| candidate.objective < best.objective)
    }

    /// Replaces the incumbent. Only call after [`Self::is_improvement`].
    pub(super) fn accept(&mut self, candidate: Evaluation<I, O, N>) {
        self.best = Some(candidate);
    }

    pub(super) fn is_converged(&self, tolerance: f64) -> bool {
        self.best
            .as_ref()
            .is_some_and(|best| best.objective < tolerance)
    }

    pub(super) fn into_solution(
        self,
        status: Status,
        iters: usize,
    ) -> Result<Solution<I, O, N>, Error> {
        let best = self.best.ok_or(Error::NoSolutionFound { iters })?;

        Ok(Solution {
            status,
            x: best.x,
            objective: best.objective,
            snapshot: best.snapshot,
            guesses: self.guesses,
            failures: self.failures,
            iters,
        })
    }
}

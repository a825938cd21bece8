use econsolve_core::{Model, OptimizationProblem};

use crate::optimization::evaluate::{Evaluation, Sense, evaluate};

use super::Error;

/// The inverse golden ratio, `(√5 − 1) / 2`.
const INV_PHI: f64 = 0.618_033_988_749_894_9;

/// The two interior points of `[lo, hi]`, each `INV_PHI` of the width from
/// the opposite end.
fn interior(lo: f64, hi: f64) -> (f64, f64) {
    let step = INV_PHI * (hi - lo);
    (hi - step, lo + step)
}

/// A search interval together with its evaluated interior points.
///
/// `lower.x < upper.x` always holds, and both lie strictly inside `[lo, hi]`.
#[derive(Debug)]
pub(super) struct Bracket<I, O> {
    lo: f64,
    hi: f64,
    lower: Evaluation<I, O, 1>,
    upper: Evaluation<I, O, 1>,
}

impl<I, O> Bracket<I, O> {
    /// Validates `bounds` (in either order) and evaluates both interior points.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bracket`] if the bounds are non-finite, equal, or too
    /// far apart for their width to be finite, and an evaluation error if
    /// either interior point fails.
    #[allow(clippy::float_cmp)]
    pub(super) fn new<M, P>(model: &M, problem: &P, bounds: [f64; 2]) -> Result<Self, Error>
    where
        M: Model<Input = I, Output = O>,
        P: OptimizationProblem<1, Input = I, Output = O>,
    {
        let [a, b] = bounds;
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        if !lo.is_finite() || !hi.is_finite() || !(hi - lo).is_finite() || lo == hi {
            return Err(Error::Bracket { lo, hi });
        }

        let (x_lower, x_upper) = interior(lo, hi);
        Ok(Self {
            lo,
            hi,
            lower: evaluate(model, problem, [x_lower])?,
            upper: evaluate(model, problem, [x_upper])?,
        })
    }

    /// Distance between the interior points.
    pub(super) fn gap(&self) -> f64 {
        self.upper.x[0] - self.lower.x[0]
    }

    /// Midpoint of the interior points.
    pub(super) fn center(&self) -> f64 {
        0.5 * (self.lower.x[0] + self.upper.x[0])
    }

    /// Drops the part of the interval beyond the worse interior point.
    ///
    /// The surviving interior point is reused, so each shrink costs exactly
    /// one evaluation.
    pub(super) fn shrink<M, P>(&mut self, model: &M, problem: &P, sense: Sense) -> Result<(), Error>
    where
        M: Model<Input = I, Output = O>,
        P: OptimizationProblem<1, Input = I, Output = O>,
    {
        if sense.prefers(self.lower.objective, self.upper.objective) {
            self.hi = self.upper.x[0];
            let (x, _) = interior(self.lo, self.hi);
            let fresh = evaluate(model, problem, [x])?;
            self.upper = std::mem::replace(&mut self.lower, fresh);
        } else {
            self.lo = self.lower.x[0];
            let (_, x) = interior(self.lo, self.hi);
            let fresh = evaluate(model, problem, [x])?;
            self.lower = std::mem::replace(&mut self.upper, fresh);
        }
        Ok(())
    }

    /// The better interior point.
    ///
    /// Every discarded point lost to a point still held, so this is the best
    /// point the search has seen.
    pub(super) fn into_best(self, sense: Sense) -> Evaluation<I, O, 1> {
        if sense.prefers(self.lower.objective, self.upper.objective) {
            self.lower
        } else {
            self.upper
        }
    }
}

use thiserror::Error;

use econsolve_core::{Model, OptimizationProblem, Snapshot};

/// Direction of an optimization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Minimize,
    Maximize,
}

impl Sense {
    /// Whether objective `a` is at least as good as `b`.
    #[must_use]
    pub fn prefers(self, a: f64, b: f64) -> bool {
        match self {
            Self::Minimize => a <= b,
            Self::Maximize => a >= b,
        }
    }
}

/// A point `x` with its finite objective and the model call behind it.
#[derive(Debug, Clone)]
pub struct Evaluation<I, O, const N: usize> {
    pub x: [f64; N],

    pub objective: f64,

    pub snapshot: Snapshot<I, O>,
}

/// Why a point could not be scored.
#[derive(Debug, Error)]
pub enum EvalError<ME, PE> {
    #[error("model call failed")]
    Model(#[source] ME),

    #[error("problem error")]
    Problem(#[source] PE),

    /// The objective came back NaN or infinite, so it cannot be compared.
    #[error("objective is not finite: {0}")]
    NonFinite(f64),
}

/// Scores `x`: maps it to a model input, calls the model, and computes the
/// objective.
///
/// Every returned [`Evaluation`] has a finite objective, so solvers can
/// compare evaluations without checking for NaN themselves.
///
/// # Errors
///
/// Returns an error if input mapping, the model call, or the objective fails,
/// or if the objective is not finite.
#[allow(clippy::type_complexity)]
pub fn evaluate<M, P, const N: usize>(
    model: &M,
    problem: &P,
    x: [f64; N],
) -> Result<Evaluation<M::Input, M::Output, N>, EvalError<M::Error, P::Error>>
where
    M: Model,
    P: OptimizationProblem<N, Input = M::Input, Output = M::Output>,
{
    let input = problem.input(&x).map_err(EvalError::Problem)?;
    let output = model.call(&input).map_err(EvalError::Model)?;
    let objective = problem
        .objective(&input, &output)
        .map_err(EvalError::Problem)?;

    if !objective.is_finite() {
        return Err(EvalError::NonFinite(objective));
    }

    Ok(Evaluation {
        x,
        objective,
        snapshot: Snapshot::new(input, output),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::convert::Infallible;

    use approx::assert_relative_eq;

    /// Sum of squares over the plane, undefined in the left half-plane.
    struct HalfBowl;

    impl Model for HalfBowl {
        type Input = [f64; 2];
        type Output = f64;
        type Error = Infallible;

        fn call(&self, x: &[f64; 2]) -> Result<f64, Self::Error> {
            Ok(if x[0] < -5.0 {
                f64::NAN
            } else {
                x[0].powi(2) + x[1].powi(2)
            })
        }
    }

    #[derive(Debug, Error)]
    #[error("x[1] must be non-negative, got {0}")]
    struct NegativeSecond(f64);

    struct NonNegativeSecond;

    impl OptimizationProblem<2> for NonNegativeSecond {
        type Input = [f64; 2];
        type Output = f64;
        type Error = NegativeSecond;

        fn input(&self, x: &[f64; 2]) -> Result<[f64; 2], Self::Error> {
            if x[1] < 0.0 {
                Err(NegativeSecond(x[1]))
            } else {
                Ok(*x)
            }
        }

        fn objective(&self, _input: &[f64; 2], output: &f64) -> Result<f64, Self::Error> {
            Ok(*output)
        }
    }

    #[test]
    fn evaluation_captures_snapshot() {
        let eval = evaluate(&HalfBowl, &NonNegativeSecond, [3.0, 4.0]).unwrap();

        assert_relative_eq!(eval.objective, 25.0);
        assert_eq!(eval.snapshot.input, [3.0, 4.0]);
        assert_relative_eq!(eval.snapshot.output, 25.0);
    }

    #[test]
    fn problem_errors_are_reported_as_problem() {
        let result = evaluate(&HalfBowl, &NonNegativeSecond, [0.0, -1.0]);

        assert!(matches!(result, Err(EvalError::Problem(NegativeSecond(v))) if v == -1.0));
    }

    #[test]
    fn nan_objective_is_rejected() {
        let result = evaluate(&HalfBowl, &NonNegativeSecond, [-6.0, 0.0]);

        assert!(matches!(result, Err(EvalError::NonFinite(v)) if v.is_nan()));
    }

    #[test]
    fn sense_orders_objectives() {
        assert!(Sense::Minimize.prefers(1.0, 2.0));
        assert!(!Sense::Minimize.prefers(2.0, 1.0));
        assert!(Sense::Maximize.prefers(2.0, 1.0));
        assert!(Sense::Maximize.prefers(1.0, 1.0));
    }
}

use argmin::core::{CostFunction, Executor, Gradient, State};
use argmin::solver::linesearch::MoreThuenteLineSearch;
use argmin::solver::quasinewton::LBFGS;
use thiserror::Error;

use super::local::{CostError, LocalMinimizer};

/// Limited-memory BFGS local minimizer backed by `argmin`.
///
/// Uses a More–Thuente line search and central finite differences for the
/// gradient. The tolerance passed by the caller bounds the gradient norm at
/// convergence. When the iteration cap is hit first, the best point `argmin`
/// recorded is still returned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lbfgs {
    memory: usize,
    max_iters: u64,
    diff_step: f64,
}

/// Errors from validating an [`Lbfgs`] configuration.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LbfgsConfigError {
    #[error("memory must be at least 1")]
    Memory,

    #[error("diff_step must be finite and positive")]
    DiffStep,
}

/// Errors from a single L-BFGS run.
#[derive(Debug, Error)]
pub enum LbfgsError {
    #[error("argmin solver failed: {0}")]
    Solver(String),

    #[error("solver finished without a best parameter")]
    NoBestParam,

    #[error("solver returned {found} coordinates, expected {expected}")]
    Dimension { expected: usize, found: usize },

    #[error("solver returned a non-finite point: {0:?}")]
    NonFinite(Vec<f64>),
}

impl Default for Lbfgs {
    fn default() -> Self {
        // Known-good values, unwrap is safe
        Self::new(10, 400, 1e-6).unwrap()
    }
}

impl Lbfgs {
    /// Creates a minimizer.
    ///
    /// - `memory`: number of correction pairs kept for the inverse Hessian
    /// - `max_iters`: iteration cap per local run
    /// - `diff_step`: absolute step for central-difference gradients
    ///
    /// # Errors
    ///
    /// Returns an error if `memory` is zero or `diff_step` is not finite and
    /// positive.
    pub fn new(memory: usize, max_iters: u64, diff_step: f64) -> Result<Self, LbfgsConfigError> {
        if memory == 0 {
            return Err(LbfgsConfigError::Memory);
        }
        if !diff_step.is_finite() || diff_step <= 0.0 {
            return Err(LbfgsConfigError::DiffStep);
        }

        Ok(Self {
            memory,
            max_iters,
            diff_step,
        })
    }

    #[must_use]
    pub fn memory(&self) -> usize {
        self.memory
    }

    #[must_use]
    pub fn max_iters(&self) -> u64 {
        self.max_iters
    }

    #[must_use]
    pub fn diff_step(&self) -> f64 {
        self.diff_step
    }
}

impl<const N: usize> LocalMinimizer<N> for Lbfgs {
    type Error = LbfgsError;

    fn minimize<F>(&self, cost: &F, start: [f64; N], tolerance: f64) -> Result<[f64; N], Self::Error>
    where
        F: Fn(&[f64; N]) -> Result<f64, CostError>,
    {
        let problem = ArgminCost {
            cost,
            diff_step: self.diff_step,
        };

        let solver = LBFGS::new(MoreThuenteLineSearch::new(), self.memory)
            .with_tolerance_grad(tolerance)
            .map_err(solver_error)?;

        let result = Executor::new(problem, solver)
            .configure(|state| state.param(start.to_vec()).max_iters(self.max_iters))
            .run()
            .map_err(solver_error)?;

        let best = result
            .state()
            .get_best_param()
            .ok_or(LbfgsError::NoBestParam)?;

        let x: [f64; N] = best.as_slice().try_into().map_err(|_| LbfgsError::Dimension {
            expected: N,
            found: best.len(),
        })?;

        if x.iter().all(|v| v.is_finite()) {
            Ok(x)
        } else {
            Err(LbfgsError::NonFinite(best.clone()))
        }
    }
}

fn solver_error(err: argmin::core::Error) -> LbfgsError {
    LbfgsError::Solver(err.to_string())
}

/// Exposes a fixed-size cost closure as an `argmin` problem over `Vec<f64>`.
struct ArgminCost<'a, F, const N: usize> {
    cost: &'a F,
    diff_step: f64,
}

impl<F, const N: usize> ArgminCost<'_, F, N>
where
    F: Fn(&[f64; N]) -> Result<f64, CostError>,
{
    fn eval(&self, param: &[f64]) -> Result<f64, argmin::core::Error> {
        let x: [f64; N] = param.try_into().map_err(|_| {
            argmin::core::Error::msg(format!("expected {N} parameters, got {}", param.len()))
        })?;
        (self.cost)(&x).map_err(|e| argmin::core::Error::msg(e.to_string()))
    }
}

impl<F, const N: usize> CostFunction for ArgminCost<'_, F, N>
where
    F: Fn(&[f64; N]) -> Result<f64, CostError>,
{
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, param: &Self::Param) -> Result<Self::Output, argmin::core::Error> {
        self.eval(param)
    }
}

impl<F, const N: usize> Gradient for ArgminCost<'_, F, N>
where
    F: Fn(&[f64; N]) -> Result<f64, CostError>,
{
    type Param = Vec<f64>;
    type Gradient = Vec<f64>;

    fn gradient(&self, param: &Self::Param) -> Result<Self::Gradient, argmin::core::Error> {
        let h = self.diff_step;
        let mut probe = param.clone();
        let mut grad = Vec::with_capacity(param.len());

        for (i, &xi) in param.iter().enumerate() {
            probe[i] = xi + h;
            let f_plus = self.eval(&probe)?;
            probe[i] = xi - h;
            let f_minus = self.eval(&probe)?;
            probe[i] = xi;

            grad.push((f_plus - f_minus) / (2.0 * h));
        }

        Ok(grad)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn rosenbrock(x: &[f64; 2]) -> Result<f64, CostError> {
        Ok((1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0].powi(2)).powi(2))
    }

    #[test]
    fn rejects_bad_settings() {
        assert_eq!(Lbfgs::new(0, 100, 1e-6), Err(LbfgsConfigError::Memory));
        assert_eq!(Lbfgs::new(5, 100, 0.0), Err(LbfgsConfigError::DiffStep));
    }

    #[test]
    fn central_difference_gradient_matches_analytic() {
        let bowl = |x: &[f64; 2]| -> Result<f64, CostError> { Ok(x[0].powi(2) + 3.0 * x[1].powi(2)) };
        let problem = ArgminCost {
            cost: &bowl,
            diff_step: 1e-6,
        };

        let grad = problem.gradient(&vec![1.5, -2.0]).unwrap();

        assert_relative_eq!(grad[0], 3.0, epsilon = 1e-6);
        assert_relative_eq!(grad[1], -12.0, epsilon = 1e-6);
    }

    #[test]
    fn minimizes_quadratic_bowl() {
        let bowl = |x: &[f64; 2]| -> Result<f64, CostError> {
            Ok((x[0] - 1.0).powi(2) + 2.0 * (x[1] + 3.0).powi(2))
        };

        let x = Lbfgs::default().minimize(&bowl, [10.0, 10.0], 1e-8).unwrap();

        assert_relative_eq!(x[0], 1.0, epsilon = 1e-5);
        assert_relative_eq!(x[1], -3.0, epsilon = 1e-5);
    }

    #[test]
    fn minimizes_rosenbrock_from_classic_start() {
        let x = Lbfgs::default()
            .minimize(&rosenbrock, [-1.2, 1.0], 1e-6)
            .unwrap();

        assert_relative_eq!(x[0], 1.0, epsilon = 1e-3);
        assert_relative_eq!(x[1], 1.0, epsilon = 1e-3);
    }

    #[test]
    fn cost_errors_surface_as_solver_errors() {
        let failing = |_: &[f64; 2]| -> Result<f64, CostError> { Err("always fails".into()) };

        let result = Lbfgs::default().minimize(&failing, [0.0, 0.0], 1e-8);

        assert!(matches!(result, Err(LbfgsError::Solver(msg)) if msg.contains("always fails")));
    }
}

//! The Griewank test function.
//!
//! `f(x) = Σ xᵢ²/4000 − Π cos(xᵢ/√i) + 1`, with `i` counted from 1. The global
//! minimum is 0 at the origin, surrounded by a regular lattice of local minima
//! that defeats single-start local search.

use std::convert::Infallible;

use econsolve_core::{Model, OptimizationProblem};
use econsolve_solvers::optimization::multistart::{self, Config, Lbfgs, Solution};
use rand::Rng;

/// Evaluates the Griewank function at `x`.
#[must_use]
pub fn griewank<const N: usize>(x: &[f64; N]) -> f64 {
    let (sum, product) = x
        .iter()
        .zip(1..=N)
        .fold((0.0, 1.0), |(sum, product), (&xi, i)| {
            #[allow(clippy::cast_precision_loss)]
            let scale = (i as f64).sqrt();
            (sum + xi * xi / 4000.0, product * (xi / scale).cos())
        });

    sum - product + 1.0
}

/// The Griewank function as a model over `N` coordinates.
#[derive(Debug, Clone, Copy, Default)]
pub struct Griewank<const N: usize>;

impl<const N: usize> Model for Griewank<N> {
    type Input = [f64; N];
    type Output = f64;
    type Error = Infallible;

    fn call(&self, input: &[f64; N]) -> Result<f64, Self::Error> {
        Ok(griewank(input))
    }
}

/// Minimizes [`Griewank`] output over its coordinates.
#[derive(Debug, Clone, Copy, Default)]
pub struct GriewankProblem<const N: usize>;

impl<const N: usize> OptimizationProblem<N> for GriewankProblem<N> {
    type Input = [f64; N];
    type Output = f64;
    type Error = Infallible;

    fn input(&self, x: &[f64; N]) -> Result<[f64; N], Self::Error> {
        Ok(*x)
    }

    fn objective(&self, _input: &[f64; N], output: &f64) -> Result<f64, Self::Error> {
        Ok(*output)
    }
}

/// Searches for the Griewank global minimum with refined multi-start L-BFGS.
///
/// # Errors
///
/// Returns an error if every restart failed.
pub fn minimize<R, const N: usize>(
    rng: &mut R,
    config: &Config,
) -> Result<Solution<[f64; N], f64, N>, multistart::Error>
where
    R: Rng + ?Sized,
{
    multistart::minimize_unobserved(
        &Griewank::<N>,
        &GriewankProblem::<N>,
        &Lbfgs::default(),
        rng,
        config,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use rand::{SeedableRng, rngs::StdRng};

    use econsolve_solvers::optimization::multistart::Status;

    #[test]
    fn zero_at_origin() {
        assert_eq!(griewank(&[0.0, 0.0]), 0.0);
        assert_eq!(griewank(&[0.0; 5]), 0.0);
    }

    #[test]
    fn matches_two_dimensional_form() {
        for [x1, x2] in [[1.0, 2.0], [-3.5, 0.25], [120.0, -431.0]] {
            let expected = x1 * x1 / 4000.0 + x2 * x2 / 4000.0
                - f64::cos(x1) * f64::cos(x2 / 2.0_f64.sqrt())
                + 1.0;
            assert_relative_eq!(griewank(&[x1, x2]), expected, epsilon = 1e-14);
        }
    }

    #[test]
    fn non_negative_on_dense_grid() {
        let steps = 601;
        let coord = |k: usize| -30.0 + 60.0 * k as f64 / (steps - 1) as f64;

        for i in 0..steps {
            for j in 0..steps {
                let value = griewank(&[coord(i), coord(j)]);
                assert!(value >= 0.0, "f({}, {}) = {value}", coord(i), coord(j));
            }
        }
    }

    #[test]
    fn non_negative_on_random_samples() {
        let mut rng = StdRng::seed_from_u64(2024);

        for _ in 0..100_000 {
            let x: [f64; 3] = std::array::from_fn(|_| rng.random_range(-600.0..600.0));
            assert!(griewank(&x) >= 0.0, "f({x:?}) is negative");
        }
    }

    #[test]
    fn model_and_problem_agree_with_function() {
        let x = [3.0, -7.0];
        let input = GriewankProblem::<2>.input(&x).unwrap();
        let output = Griewank::<2>.call(&input).unwrap();

        assert_relative_eq!(
            GriewankProblem::<2>.objective(&input, &output).unwrap(),
            griewank(&x)
        );
    }

    #[test]
    fn refined_multistart_finds_global_minimum() {
        let mut rng = StdRng::seed_from_u64(19);

        let solution = minimize::<_, 2>(&mut rng, &Config::default()).unwrap();

        assert_eq!(solution.status, Status::Converged);
        assert!(solution.objective < 1e-8);
        assert!(solution.x.iter().all(|v| v.abs() < 1e-4), "x = {:?}", solution.x);
        assert_relative_eq!(solution.objective, griewank(&solution.x));
    }
}

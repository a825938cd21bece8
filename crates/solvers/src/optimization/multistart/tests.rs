use std::cell::Cell;
use std::convert::Infallible;

use approx::assert_relative_eq;
use rand::{RngCore, SeedableRng, rngs::StdRng};
use thiserror::Error;

use econsolve_core::{Model, OptimizationProblem};

use super::{
    Action, Config, ConfigError, CostError, Error, Event, Lbfgs, LocalError, LocalMinimizer, Phase,
    Status, minimize, minimize_unobserved,
};

/// Two-dimensional Griewank function, minimum 0 at the origin.
struct Griewank;

impl Model for Griewank {
    type Input = [f64; 2];
    type Output = f64;
    type Error = Infallible;

    fn call(&self, x: &[f64; 2]) -> Result<f64, Self::Error> {
        let [x1, x2] = *x;
        Ok(x1.powi(2) / 4000.0 + x2.powi(2) / 4000.0
            - x1.cos() * (x2 / 2.0_f64.sqrt()).cos()
            + 1.0)
    }
}

/// Uses the model output as the objective.
struct OutputObjective;

impl OptimizationProblem<2> for OutputObjective {
    type Input = [f64; 2];
    type Output = f64;
    type Error = Infallible;

    fn input(&self, x: &[f64; 2]) -> Result<[f64; 2], Self::Error> {
        Ok(*x)
    }

    fn objective(&self, _input: &[f64; 2], output: &f64) -> Result<f64, Self::Error> {
        Ok(*output)
    }
}

/// Local "minimizer" that returns its starting point unchanged.
struct Stay;

impl<const N: usize> LocalMinimizer<N> for Stay {
    type Error = Infallible;

    fn minimize<F>(&self, _cost: &F, start: [f64; N], _tolerance: f64) -> Result<[f64; N], Infallible>
    where
        F: Fn(&[f64; N]) -> Result<f64, CostError>,
    {
        Ok(start)
    }
}

#[derive(Debug, Error)]
#[error("scripted failure on call {0}")]
struct Scripted(usize);

/// Local minimizer that fails on the calls `fails` selects and stays put otherwise.
struct Flaky<S> {
    calls: Cell<usize>,
    fails: S,
}

impl<S: Fn(usize) -> bool> Flaky<S> {
    fn new(fails: S) -> Self {
        Self {
            calls: Cell::new(0),
            fails,
        }
    }
}

impl<S: Fn(usize) -> bool, const N: usize> LocalMinimizer<N> for Flaky<S> {
    type Error = Scripted;

    fn minimize<F>(&self, _cost: &F, start: [f64; N], _tolerance: f64) -> Result<[f64; N], Scripted>
    where
        F: Fn(&[f64; N]) -> Result<f64, CostError>,
    {
        let call = self.calls.get();
        self.calls.set(call + 1);
        if (self.fails)(call) {
            Err(Scripted(call))
        } else {
            Ok(start)
        }
    }
}

/// Objective that ignores its input.
struct Flat(f64);

impl Model for Flat {
    type Input = [f64; 2];
    type Output = f64;
    type Error = Infallible;

    fn call(&self, _x: &[f64; 2]) -> Result<f64, Self::Error> {
        Ok(self.0)
    }
}

#[test]
fn converges_to_griewank_origin() {
    let mut rng = StdRng::seed_from_u64(19);

    let solution = minimize_unobserved(
        &Griewank,
        &OutputObjective,
        &Lbfgs::default(),
        &mut rng,
        &Config::default(),
    )
    .expect("should find a solution");

    assert_eq!(solution.status, Status::Converged);
    assert!(solution.objective < 1e-8, "objective {}", solution.objective);
    assert!(solution.x.iter().all(|v| v.abs() < 1e-4), "x = {:?}", solution.x);
    assert!(solution.iters < 1000);
    assert_eq!(solution.guesses.len(), solution.iters);
    assert_relative_eq!(solution.snapshot.output, solution.objective);
}

#[test]
fn same_seed_reproduces_run() {
    let config = Config::new(10, 60, [-600.0, 600.0], 1e-8).unwrap();
    let run = |seed| {
        let mut rng = StdRng::seed_from_u64(seed);
        minimize_unobserved(&Griewank, &OutputObjective, &Lbfgs::default(), &mut rng, &config)
            .unwrap()
    };

    let first = run(7);
    let second = run(7);
    let other = run(8);

    assert_eq!(first.guesses, second.guesses);
    assert_eq!(first.x, second.x);
    assert_eq!(first.iters, second.iters);
    assert_ne!(first.guesses[0], other.guesses[0]);
}

#[test]
fn incumbent_objective_never_increases() {
    let config = Config::new(10, 150, [-600.0, 600.0], 1e-8).unwrap();
    let mut rng = StdRng::seed_from_u64(3);

    let mut trace = Vec::new();
    let observer = |event: &Event<'_, _, _, 2>| {
        if let Some(best) = event.best() {
            trace.push(best.objective);
        }
        None
    };

    let solution = minimize(
        &Griewank,
        &OutputObjective,
        &Lbfgs::default(),
        &mut rng,
        &config,
        observer,
    )
    .unwrap();

    assert!(!trace.is_empty());
    assert!(trace.windows(2).all(|w| w[1] <= w[0]), "trace regressed: {trace:?}");
    assert_relative_eq!(*trace.last().unwrap(), solution.objective);
}

#[test]
fn warmup_equal_to_max_iters_never_blends() {
    let config = Config::new(25, 25, [-600.0, 600.0], 1e-12).unwrap();
    let mut rng = StdRng::seed_from_u64(11);

    let mut events = 0;
    let observer = |event: &Event<'_, _, _, 2>| {
        events += 1;
        assert_eq!(event.phase(), Phase::Warmup);
        assert_eq!(event.weight(), None);
        None
    };

    let solution = minimize(&Griewank, &OutputObjective, &Stay, &mut rng, &config, observer).unwrap();

    assert_eq!(events, 25);
    assert_eq!(solution.status, Status::MaxIters);
}

#[test]
fn exploit_starts_blend_with_decaying_weight() {
    let config = Config::new(5, 30, [-600.0, 600.0], 1e-12).unwrap();
    let mut rng = StdRng::seed_from_u64(5);

    let mut weights = Vec::new();
    let observer = |event: &Event<'_, _, _, 2>| {
        match event.phase() {
            Phase::Warmup => assert!(event.iter() < 5 && event.weight().is_none()),
            Phase::Exploit => weights.push(event.weight().expect("exploit restarts blend")),
        }
        None
    };

    minimize(&Griewank, &OutputObjective, &Stay, &mut rng, &config, observer).unwrap();

    assert_eq!(weights.len(), 25);
    assert_relative_eq!(weights[0], 0.5);
    assert!(weights.windows(2).all(|w| w[1] < w[0]));
}

#[test]
fn blended_starts_stay_inside_bounds() {
    // With `Stay` the incumbent is an earlier start, so blends are convex
    // combinations of points in the box.
    let config = Config::new(3, 40, [-10.0, 10.0], 1e-12).unwrap();
    let mut rng = StdRng::seed_from_u64(21);

    let solution = minimize_unobserved(&Griewank, &OutputObjective, &Stay, &mut rng, &config).unwrap();

    assert!(
        solution
            .guesses
            .iter()
            .flatten()
            .all(|v| (-10.0..=10.0).contains(v))
    );
}

#[test]
fn ties_keep_the_older_incumbent() {
    let config = Config::new(2, 8, [-5.0, 5.0], 0.1).unwrap();
    let mut rng = StdRng::seed_from_u64(1);

    let mut improvements = 0;
    let observer = |event: &Event<'_, _, _, 2>| {
        if matches!(event, Event::Improved { .. }) {
            improvements += 1;
        }
        None
    };

    let solution =
        minimize(&Flat(0.5), &OutputObjective, &Stay, &mut rng, &config, observer).unwrap();

    assert_eq!(improvements, 1);
    assert_eq!(solution.x, solution.guesses[0]);
    assert_eq!(solution.status, Status::MaxIters);
}

#[test]
fn observer_can_stop_early() {
    let config = Config::new(2, 50, [-600.0, 600.0], 1e-12).unwrap();
    let mut rng = StdRng::seed_from_u64(2);

    let observer = |event: &Event<'_, _, _, 2>| (event.iter() == 2).then_some(Action::StopEarly);

    let solution = minimize(&Griewank, &OutputObjective, &Stay, &mut rng, &config, observer).unwrap();

    assert_eq!(solution.status, Status::StoppedByObserver);
    assert_eq!(solution.iters, 3);
    assert_eq!(solution.guesses.len(), 3);
}

#[test]
fn local_failures_are_recorded_and_skipped() {
    let config = Config::new(2, 6, [-600.0, 600.0], 1e-12).unwrap();
    let mut rng = StdRng::seed_from_u64(4);
    let local = Flaky::new(|call| call % 2 == 0);

    let mut failed_events = Vec::new();
    let observer = |event: &Event<'_, _, _, 2>| {
        if let Event::LocalFailed { iter, error, .. } = event {
            assert!(matches!(error, LocalError::Minimizer(_)));
            failed_events.push(*iter);
        }
        None
    };

    let solution =
        minimize(&Griewank, &OutputObjective, &local, &mut rng, &config, observer).unwrap();

    let failed: Vec<usize> = solution.failures.iter().map(|f| f.iter).collect();
    assert_eq!(failed, vec![0, 2, 4]);
    assert_eq!(failed_events, failed);
    assert_eq!(solution.failures[1].start, solution.guesses[2]);
    assert_eq!(solution.iters, 6);
}

#[test]
fn blending_waits_for_a_first_incumbent() {
    // Warm-up is 2 restarts, but the first 3 local runs fail, so restarts 2
    // and 3 have nothing to blend toward.
    let config = Config::new(2, 6, [-600.0, 600.0], 1e-12).unwrap();
    let mut rng = StdRng::seed_from_u64(6);
    let local = Flaky::new(|call| call < 3);

    let mut weights = Vec::new();
    let observer = |event: &Event<'_, _, _, 2>| {
        weights.push(event.weight());
        None
    };

    minimize(&Griewank, &OutputObjective, &local, &mut rng, &config, observer).unwrap();

    assert_eq!(weights[..4], [None, None, None, None]);
    assert!(weights[4].is_some() && weights[5].is_some());
}

#[test]
fn all_failures_report_no_solution() {
    let config = Config::new(1, 5, [-1.0, 1.0], 1e-8).unwrap();
    let mut rng = StdRng::seed_from_u64(9);
    let local = Flaky::new(|_| true);

    let result = minimize_unobserved(&Griewank, &OutputObjective, &local, &mut rng, &config);

    assert!(matches!(result, Err(Error::NoSolutionFound { iters: 5 })));
}

/// Returns NaN in the right half-plane.
struct HalfDefined;

impl Model for HalfDefined {
    type Input = [f64; 2];
    type Output = f64;
    type Error = Infallible;

    fn call(&self, x: &[f64; 2]) -> Result<f64, Self::Error> {
        Ok(if x[0] > 0.0 { f64::NAN } else { x[0].powi(2) })
    }
}

#[test]
fn non_finite_candidates_are_failures() {
    let config = Config::new(1, 40, [-1.0, 1.0], 1e-12).unwrap();
    let mut rng = StdRng::seed_from_u64(12);

    let solution =
        minimize_unobserved(&HalfDefined, &OutputObjective, &Stay, &mut rng, &config).unwrap();

    assert!(!solution.failures.is_empty());
    assert!(
        solution
            .failures
            .iter()
            .all(|f| f.start[0] > 0.0 && matches!(f.error, LocalError::NonFinite(v) if v.is_nan()))
    );
    assert!(solution.x[0] <= 0.0);
}

#[test]
fn invalid_config_draws_nothing() {
    let mut rng = StdRng::seed_from_u64(3);

    let result = Config::new(11, 10, [-600.0, 600.0], 1e-8).map(|config| {
        minimize_unobserved(&Griewank, &OutputObjective, &Stay, &mut rng, &config)
    });

    assert!(matches!(
        result,
        Err(ConfigError::WarmupExceedsMax {
            warmup: 11,
            max_iters: 10
        })
    ));
    assert_eq!(rng.next_u64(), StdRng::seed_from_u64(3).next_u64());
}

#[test]
fn huge_iteration_cap_reserves_little() {
    let config = Config::new(1, usize::MAX, [-1.0, 1.0], 1e-8).unwrap();
    let mut rng = StdRng::seed_from_u64(5);

    let solution =
        minimize_unobserved(&Flat(0.0), &OutputObjective, &Stay, &mut rng, &config).unwrap();

    assert_eq!(solution.status, Status::Converged);
    assert_eq!(solution.iters, 1);
    assert_eq!(solution.guesses.len(), 1);
}

#[test]
fn overflowing_bounds_are_rejected_before_sampling() {
    let mut rng = StdRng::seed_from_u64(8);

    let result = Config::new(1, 3, [-1e308, 1e308], 1e-8).map(|config| {
        minimize_unobserved(&Griewank, &OutputObjective, &Stay, &mut rng, &config)
    });

    assert!(matches!(result, Err(ConfigError::Bounds { .. })));
    assert_eq!(rng.next_u64(), StdRng::seed_from_u64(8).next_u64());
}

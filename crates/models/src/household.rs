//! Time allocation of a two-member household.
//!
//! A male (`M`) and a female (`F`) member each split a 24-hour day between
//! market work `L`, home production `H`, and leisure. Market work buys
//! consumption `C = w_M L_M + w_F L_F`, and home hours are combined by
//!
//! - Leontief `min(H_M, H_F)` when `σ = 0`
//! - Cobb-Douglas `H_M^(1−α) H_F^α` when `σ = 1`
//! - CES `((1−α) H_M^((σ−1)/σ) + α H_F^((σ−1)/σ))^(σ/(σ−1))` otherwise
//!
//! The household maximizes
//! `Q^(1−ρ)/(1−ρ) − ν (T_M^(1+1/ε) + T_F^(1+1/ε)) / (1+1/ε)`, where
//! `Q = C^ω H^(1−ω)` and `T` is a member's total working time.
//!
//! Two solvers are provided. [`Household::solve_discrete`] scans an even grid
//! of hours. [`Household::solve_continuous`] runs a local minimizer over an
//! unconstrained reparametrization whose every point is a feasible day, so no
//! constraint handling is needed inside the minimizer.

use std::convert::Infallible;

use econsolve_core::{Model, OptimizationProblem};
use econsolve_solvers::optimization::{
    evaluate,
    multistart::{CostError, Lbfgs, LocalError, LocalMinimizer},
};
use thiserror::Error;
use tracing::{debug, debug_span};

use crate::grid::linspace;

/// Hours available to each member per day.
pub const DAY: f64 = 24.0;

/// Grid points per axis used by the reference discrete solve, a half-hour step.
pub const DISCRETE_POINTS: usize = 49;

/// Gradient tolerance used by [`Household::solve`].
pub const CONTINUOUS_TOLERANCE: f64 = 1e-8;

/// Lower bound on the consumption aggregate, keeping utility finite at zero.
const QUANTITY_FLOOR: f64 = 1e-8;

/// Where the continuous solve starts.
const START: Hours = Hours {
    lm: 3.0,
    hm: 5.0,
    lf: 5.5,
    hf: 4.0,
};

/// Preference and wage parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-derive", derive(serde::Serialize, serde::Deserialize))]
pub struct Params {
    /// Relative risk aversion of the consumption aggregate, positive and not 1.
    pub rho: f64,

    /// Weight on the disutility of work.
    pub nu: f64,

    /// Frisch elasticity of labor supply.
    pub epsilon: f64,

    /// Weight of market consumption in `Q`, in `(0, 1)`.
    pub omega: f64,

    /// Weight of female home hours, in `(0, 1)`.
    pub alpha: f64,

    /// Elasticity of substitution between home hours.
    pub sigma: f64,

    pub w_m: f64,
    pub w_f: f64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            rho: 2.0,
            nu: 0.001,
            epsilon: 1.0,
            omega: 0.5,
            alpha: 0.5,
            sigma: 1.0,
            w_m: 1.0,
            w_f: 1.0,
        }
    }
}

/// Errors from validating [`Params`].
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ParamsError {
    #[error("rho must be finite, positive, and not 1, got {0}")]
    Rho(f64),

    #[error("nu must be finite and non-negative, got {0}")]
    Nu(f64),

    #[error("epsilon must be finite and positive, got {0}")]
    Epsilon(f64),

    #[error("omega must be in (0, 1), got {0}")]
    Omega(f64),

    #[error("alpha must be in (0, 1), got {0}")]
    Alpha(f64),

    #[error("sigma must be finite and non-negative, got {0}")]
    Sigma(f64),

    #[error("male wage must be finite and positive, got {0}")]
    MaleWage(f64),

    #[error("female wage must be finite and positive, got {0}")]
    FemaleWage(f64),
}

impl Params {
    #[allow(clippy::float_cmp)]
    fn validate(&self) -> Result<(), ParamsError> {
        let unit = |v: f64| v > 0.0 && v < 1.0;
        let positive = |v: f64| v.is_finite() && v > 0.0;

        if !positive(self.rho) || self.rho == 1.0 {
            return Err(ParamsError::Rho(self.rho));
        }
        if !(self.nu.is_finite() && self.nu >= 0.0) {
            return Err(ParamsError::Nu(self.nu));
        }
        if !positive(self.epsilon) {
            return Err(ParamsError::Epsilon(self.epsilon));
        }
        if !unit(self.omega) {
            return Err(ParamsError::Omega(self.omega));
        }
        if !unit(self.alpha) {
            return Err(ParamsError::Alpha(self.alpha));
        }
        if !(self.sigma.is_finite() && self.sigma >= 0.0) {
            return Err(ParamsError::Sigma(self.sigma));
        }
        if !positive(self.w_m) {
            return Err(ParamsError::MaleWage(self.w_m));
        }
        if !positive(self.w_f) {
            return Err(ParamsError::FemaleWage(self.w_f));
        }
        Ok(())
    }
}

/// How home hours of the two members combine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HomeProduction {
    Leontief,
    CobbDouglas { alpha: f64 },
    Ces { alpha: f64, sigma: f64 },
}

impl HomeProduction {
    #[allow(clippy::float_cmp)]
    fn from_params(params: &Params) -> Self {
        let Params { alpha, sigma, .. } = *params;
        if sigma == 0.0 {
            Self::Leontief
        } else if sigma == 1.0 {
            Self::CobbDouglas { alpha }
        } else {
            Self::Ces { alpha, sigma }
        }
    }

    /// Home output from male and female home hours.
    #[must_use]
    pub fn output(self, hm: f64, hf: f64) -> f64 {
        match self {
            Self::Leontief => hm.min(hf),
            Self::CobbDouglas { alpha } => hm.powf(1.0 - alpha) * hf.powf(alpha),
            Self::Ces { alpha, sigma } => {
                let power = (sigma - 1.0) / sigma;
                ((1.0 - alpha) * hm.powf(power) + alpha * hf.powf(power)).powf(1.0 / power)
            }
        }
    }
}

/// Daily hours of market work (`l`) and home production (`h`) per member.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-derive", derive(serde::Serialize, serde::Deserialize))]
pub struct Hours {
    pub lm: f64,
    pub hm: f64,
    pub lf: f64,
    pub hf: f64,
}

impl Hours {
    #[must_use]
    pub fn male_total(&self) -> f64 {
        self.lm + self.hm
    }

    #[must_use]
    pub fn female_total(&self) -> f64 {
        self.lf + self.hf
    }

    /// Non-negative hours with neither member working more than [`DAY`].
    #[must_use]
    pub fn is_feasible(&self) -> bool {
        [self.lm, self.hm, self.lf, self.hf].iter().all(|&h| h >= 0.0)
            && self.male_total() <= DAY
            && self.female_total() <= DAY
    }

    /// Female over male home hours, `H_F / H_M`.
    #[must_use]
    pub fn home_ratio(&self) -> f64 {
        self.hf / self.hm
    }
}

/// An allocation and the utility it gives.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-derive", derive(serde::Serialize, serde::Deserialize))]
pub struct Choice {
    pub hours: Hours,
    pub utility: f64,
}

/// The optimal choice at one female wage.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-derive", derive(serde::Serialize, serde::Deserialize))]
pub struct WagePoint {
    pub w_f: f64,
    pub choice: Choice,
}

/// Errors from solving the household problem.
#[derive(Debug, Error)]
pub enum HouseholdError {
    #[error(transparent)]
    Params(#[from] ParamsError),

    #[error("a grid needs at least two points per axis, got {0}")]
    Grid(usize),

    #[error("continuous solve failed")]
    Continuous(#[from] LocalError),
}

/// The household with validated parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Household {
    params: Params,
    production: HomeProduction,
}

impl Household {
    /// Validates `params` and builds the household.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first parameter out of range.
    pub fn new(params: Params) -> Result<Self, ParamsError> {
        params.validate()?;
        Ok(Self {
            params,
            production: HomeProduction::from_params(&params),
        })
    }

    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }

    #[must_use]
    pub fn production(&self) -> HomeProduction {
        self.production
    }

    /// Utility of an allocation.
    #[must_use]
    pub fn utility(&self, hours: &Hours) -> f64 {
        let Params {
            rho,
            nu,
            epsilon,
            omega,
            w_m,
            w_f,
            ..
        } = self.params;

        let consumption = w_m * hours.lm + w_f * hours.lf;
        let home = self.production.output(hours.hm, hours.hf);
        let quantity = (consumption.powf(omega) * home.powf(1.0 - omega)).max(QUANTITY_FLOOR);
        let gain = quantity.powf(1.0 - rho) / (1.0 - rho);

        let power = 1.0 + 1.0 / epsilon;
        let effort = hours.male_total().powf(power) + hours.female_total().powf(power);

        gain - nu * effort / power
    }

    /// Best allocation on an even grid of `points` values per axis on
    /// `[0, DAY]`, skipping any member day longer than [`DAY`].
    ///
    /// Grid points are visited with `lm` outermost and `hf` innermost. The
    /// first maximum found is kept.
    ///
    /// # Errors
    ///
    /// Returns [`HouseholdError::Grid`] if `points < 2`.
    pub fn solve_discrete(&self, points: usize) -> Result<Choice, HouseholdError> {
        if points < 2 {
            return Err(HouseholdError::Grid(points));
        }
        let _span = debug_span!("solve_discrete", points).entered();

        let grid = linspace(0.0, DAY, points);
        let days: Vec<(f64, f64)> = grid
            .iter()
            .flat_map(|&l| {
                grid.iter()
                    .take_while(move |&&h| l + h <= DAY)
                    .map(move |&h| (l, h))
            })
            .collect();

        let mut best: Option<Choice> = None;
        for &(lm, hm) in &days {
            for &(lf, hf) in &days {
                let hours = Hours { lm, hm, lf, hf };
                let utility = self.utility(&hours);
                if best.is_none_or(|b| utility > b.utility) {
                    best = Some(Choice { hours, utility });
                }
            }
        }

        let best = best.ok_or(HouseholdError::Grid(points))?;
        debug!(hours = ?best.hours, utility = best.utility, "discrete optimum");
        Ok(best)
    }

    /// Best allocation over continuous hours, found by `local` from a fixed
    /// interior start.
    ///
    /// # Errors
    ///
    /// Returns an error if the local minimizer fails.
    pub fn solve_continuous<L>(&self, local: &L, tolerance: f64) -> Result<Choice, HouseholdError>
    where
        L: LocalMinimizer<4>,
    {
        let cost = |z: &[f64; 4]| -> Result<f64, CostError> {
            Ok(evaluate(self, &DaySplit, *z)?.objective)
        };

        let z = local
            .minimize(&cost, DaySplit::encode(&START), tolerance)
            .map_err(|e| LocalError::Minimizer(Box::new(e)))?;
        let best = evaluate(self, &DaySplit, z).map_err(LocalError::from)?;

        let choice = Choice {
            hours: best.snapshot.input,
            utility: best.snapshot.output,
        };
        debug!(hours = ?choice.hours, utility = choice.utility, "continuous optimum");
        Ok(choice)
    }

    /// [`Household::solve_continuous`] with L-BFGS defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if L-BFGS fails.
    pub fn solve(&self) -> Result<Choice, HouseholdError> {
        self.solve_continuous(&Lbfgs::default(), CONTINUOUS_TOLERANCE)
    }

    /// Re-solves the household with each female wage in `wages`.
    ///
    /// `solve` picks the method, for example `Household::solve` or
    /// `|h| h.solve_discrete(DISCRETE_POINTS)`.
    ///
    /// # Errors
    ///
    /// Returns an error for the first invalid wage or failed solve.
    pub fn wage_sweep<F>(&self, wages: &[f64], solve: F) -> Result<Vec<WagePoint>, HouseholdError>
    where
        F: Fn(&Household) -> Result<Choice, HouseholdError>,
    {
        wages
            .iter()
            .map(|&w_f| {
                let household = Household::new(Params { w_f, ..self.params })?;
                let choice = solve(&household)?;
                debug!(w_f, ratio = choice.hours.home_ratio(), "solved wage point");
                Ok(WagePoint { w_f, choice })
            })
            .collect()
    }
}

/// Female wages from 0.8 to 1.2 in steps of 0.1.
#[must_use]
pub fn default_wages() -> Vec<f64> {
    linspace(0.8, 1.2, 5)
}

impl Model for Household {
    type Input = Hours;
    type Output = f64;
    type Error = Infallible;

    fn call(&self, hours: &Hours) -> Result<f64, Self::Error> {
        Ok(self.utility(hours))
    }
}

/// Maps four unconstrained coordinates onto a feasible day.
///
/// Each member's pair `(z_l, z_h)` gives shares of the day through a softmax
/// with leisure as the zero-score option, so hours are positive and sum to
/// less than [`DAY`]. The objective is negated utility.
struct DaySplit;

impl DaySplit {
    fn member(z_work: f64, z_home: f64) -> (f64, f64) {
        let top = z_work.max(z_home).max(0.0);
        let work = (z_work - top).exp();
        let home = (z_home - top).exp();
        let total = work + home + (-top).exp();
        (DAY * work / total, DAY * home / total)
    }

    /// Coordinates of an interior allocation.
    fn encode(hours: &Hours) -> [f64; 4] {
        let leisure_m = DAY - hours.male_total();
        let leisure_f = DAY - hours.female_total();
        [
            (hours.lm / leisure_m).ln(),
            (hours.hm / leisure_m).ln(),
            (hours.lf / leisure_f).ln(),
            (hours.hf / leisure_f).ln(),
        ]
    }
}

impl OptimizationProblem<4> for DaySplit {
    type Input = Hours;
    type Output = f64;
    type Error = Infallible;

    fn input(&self, z: &[f64; 4]) -> Result<Hours, Self::Error> {
        let (lm, hm) = Self::member(z[0], z[1]);
        let (lf, hf) = Self::member(z[2], z[3]);
        Ok(Hours { lm, hm, lf, hf })
    }

    fn objective(&self, _hours: &Hours, utility: &f64) -> Result<f64, Self::Error> {
        Ok(-utility)
    }
}

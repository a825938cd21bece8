//! Dynamic labor demand of a salon facing adjustment costs.
//!
//! Log demand follows an AR(1) process, `ln κ_t = ρ ln κ_{t−1} + ε_t` with
//! `κ_{−1} = 1` and `ε_t ~ N(−½σ², σ)`. Without frictions the salon hires
//! `ℓ*_t = ((1 − η) κ_t / w)^(1/η)`. Changing headcount costs `ι`, so a
//! threshold policy `Δ` only adjusts when `|ℓ_{t−1} − ℓ*_t| > Δ`.
//!
//! A policy is valued by Monte Carlo: each shock series gives an ex-post value
//! `Σ_t R^(−t) profit_t`, and the ex-ante value `H(Δ)` is their mean. Every
//! policy is valued against the same [`ShockPanel`], so policy differences are
//! not blurred by sampling noise.
//!
//! Log demand carries `ln κ_{t−1}` forward every period, so shocks persist,
//! and all `num_series` series enter the mean. Values therefore differ from
//! simulations that redraw demand independently each period or drop a series.

use rand::Rng;
use rand_distr::{Distribution, Normal, NormalError};
use thiserror::Error;
use tracing::{debug, debug_span, info};

use crate::grid::linspace;

/// Model parameters.
///
/// Validated when a [`Salon`] is built from them.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-derive", derive(serde::Serialize, serde::Deserialize))]
pub struct Params {
    /// Persistence of log demand, in `(-1, 1)`.
    pub rho: f64,

    /// Cost paid whenever headcount changes.
    pub iota: f64,

    /// Standard deviation of the demand shocks.
    pub sigma_epsilon: f64,

    /// Gross per-period discount rate `R`.
    pub r: f64,

    /// Demand elasticity, in `(0, 1)`.
    pub eta: f64,

    /// Wage.
    pub w: f64,

    /// Number of periods simulated per series.
    pub horizon: usize,

    /// Number of Monte Carlo shock series. Every series is simulated and
    /// averaged, none is held back.
    pub num_series: usize,
}

impl Default for Params {
    /// Monthly periods over ten years with a 1% annual interest rate.
    fn default() -> Self {
        Self {
            rho: 0.90,
            iota: 0.01,
            sigma_epsilon: 0.10,
            r: 1.01_f64.powf(1.0 / 12.0),
            eta: 0.5,
            w: 1.0,
            horizon: 120,
            num_series: 1000,
        }
    }
}

/// Errors from validating [`Params`].
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ParamsError {
    #[error("rho must be finite and in (-1, 1), got {0}")]
    Persistence(f64),

    #[error("iota must be finite and non-negative, got {0}")]
    AdjustmentCost(f64),

    #[error("sigma_epsilon must be finite and non-negative, got {0}")]
    ShockStdDev(f64),

    #[error("r must be finite and positive, got {0}")]
    DiscountRate(f64),

    #[error("eta must be in (0, 1), got {0}")]
    Elasticity(f64),

    #[error("w must be finite and positive, got {0}")]
    Wage(f64),

    #[error("horizon must be at least one period")]
    ZeroHorizon,

    #[error("num_series must be at least one")]
    ZeroSeries,
}

/// Errors from valuing policies.
#[derive(Debug, Error)]
pub enum SalonError {
    #[error("threshold must be finite and non-negative, got {0}")]
    Threshold(f64),

    #[error("shock panel has horizon {found}, model expects {expected}")]
    PanelHorizon { expected: usize, found: usize },

    #[error("threshold grid is empty")]
    EmptyGrid,

    #[error("bad shock distribution")]
    Shocks(#[from] NormalError),
}

/// An adjustment policy: re-hire only when the gap exceeds `threshold`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-derive", derive(serde::Serialize, serde::Deserialize))]
pub struct Policy {
    threshold: f64,
}

impl Policy {
    /// The policy that always moves to frictionless labor (`Δ = 0`).
    #[must_use]
    pub fn always_adjust() -> Self {
        Self { threshold: 0.0 }
    }

    /// Creates a threshold policy.
    ///
    /// # Errors
    ///
    /// Returns an error if `threshold` is negative or non-finite.
    pub fn threshold(threshold: f64) -> Result<Self, SalonError> {
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(SalonError::Threshold(threshold));
        }
        Ok(Self { threshold })
    }

    #[must_use]
    pub fn delta(&self) -> f64 {
        self.threshold
    }

    /// Chooses this period's labor given last period's and the frictionless level.
    fn choose(&self, previous: f64, frictionless: f64) -> f64 {
        if (previous - frictionless).abs() > self.threshold {
            frictionless
        } else {
            previous
        }
    }
}

/// Demand shocks `ε`, one row of `horizon` draws per Monte Carlo series.
#[derive(Debug, Clone)]
pub struct ShockPanel {
    horizon: usize,
    shocks: Vec<f64>,
}

impl ShockPanel {
    #[must_use]
    pub fn horizon(&self) -> usize {
        self.horizon
    }

    #[must_use]
    pub fn num_series(&self) -> usize {
        self.shocks.len() / self.horizon
    }

    /// Iterates over the shock series.
    pub fn series(&self) -> impl Iterator<Item = &[f64]> {
        self.shocks.chunks_exact(self.horizon)
    }
}

/// How a policy compares with always adjusting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde-derive", derive(serde::Serialize, serde::Deserialize))]
pub enum Verdict {
    Improves,
    Worsens,
    Unchanged,
}

/// A policy valued against the always-adjust baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-derive", derive(serde::Serialize, serde::Deserialize))]
pub struct Comparison {
    pub policy: Policy,

    /// Ex-ante value of `policy`.
    pub value: f64,

    /// Ex-ante value of always adjusting.
    pub baseline: f64,

    pub verdict: Verdict,
}

/// Ex-ante values over a threshold grid.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-derive", derive(serde::Serialize, serde::Deserialize))]
pub struct GridSearch {
    /// The value-maximizing policy (first on ties).
    pub best: Policy,

    /// Ex-ante value of `best`.
    pub value: f64,

    /// `(Δ, H(Δ))` for every grid point, in grid order.
    pub curve: Vec<(f64, f64)>,
}

/// The default threshold grid: 100 points from 0.01 to 1.
#[must_use]
pub fn default_grid() -> Vec<f64> {
    linspace(0.01, 1.0, 100)
}

/// The salon model with validated parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Salon {
    params: Params,
}

impl Salon {
    /// Creates a salon model.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid parameter.
    pub fn new(params: Params) -> Result<Self, ParamsError> {
        let Params {
            rho,
            iota,
            sigma_epsilon,
            r,
            eta,
            w,
            horizon,
            num_series,
        } = params;

        if !(rho.is_finite() && rho.abs() < 1.0) {
            return Err(ParamsError::Persistence(rho));
        }
        if !(iota.is_finite() && iota >= 0.0) {
            return Err(ParamsError::AdjustmentCost(iota));
        }
        if !(sigma_epsilon.is_finite() && sigma_epsilon >= 0.0) {
            return Err(ParamsError::ShockStdDev(sigma_epsilon));
        }
        if !(r.is_finite() && r > 0.0) {
            return Err(ParamsError::DiscountRate(r));
        }
        if !(eta > 0.0 && eta < 1.0) {
            return Err(ParamsError::Elasticity(eta));
        }
        if !(w.is_finite() && w > 0.0) {
            return Err(ParamsError::Wage(w));
        }
        if horizon == 0 {
            return Err(ParamsError::ZeroHorizon);
        }
        if num_series == 0 {
            return Err(ParamsError::ZeroSeries);
        }

        Ok(Self { params })
    }

    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Draws a `num_series × horizon` panel of shocks from `rng`.
    ///
    /// # Errors
    ///
    /// Returns an error if the shock distribution cannot be built.
    pub fn draw_shocks<R>(&self, rng: &mut R) -> Result<ShockPanel, SalonError>
    where
        R: Rng + ?Sized,
    {
        let Params {
            sigma_epsilon,
            horizon,
            num_series,
            ..
        } = self.params;

        let normal = Normal::new(-0.5 * sigma_epsilon.powi(2), sigma_epsilon)?;
        let shocks = normal.sample_iter(rng).take(num_series * horizon).collect();

        Ok(ShockPanel { horizon, shocks })
    }

    /// Demand level `κ_t` along one shock series.
    #[must_use]
    pub fn demand_path(&self, shocks: &[f64]) -> Vec<f64> {
        shocks
            .iter()
            .scan(0.0, |log_kappa: &mut f64, epsilon| {
                *log_kappa = self.params.rho * *log_kappa + epsilon;
                Some(log_kappa.exp())
            })
            .collect()
    }

    /// Profit-maximizing labor without adjustment costs.
    #[must_use]
    pub fn frictionless_labor(&self, kappa: f64) -> f64 {
        let Params { eta, w, .. } = self.params;
        ((1.0 - eta) * kappa / w).powf(1.0 / eta)
    }

    /// Labor chosen by `policy` along one shock series, starting from no staff.
    #[must_use]
    pub fn labor_path(&self, shocks: &[f64], policy: Policy) -> Vec<f64> {
        self.demand_path(shocks)
            .into_iter()
            .scan(0.0, |previous: &mut f64, kappa| {
                *previous = policy.choose(*previous, self.frictionless_labor(kappa));
                Some(*previous)
            })
            .collect()
    }

    /// Discounted profit of `policy` along one shock series.
    #[must_use]
    pub fn ex_post_value(&self, shocks: &[f64], policy: Policy) -> f64 {
        let Params {
            iota, r, eta, w, ..
        } = self.params;

        let mut previous = 0.0;
        let mut discount = 1.0;
        let mut value = 0.0;

        for kappa in self.demand_path(shocks) {
            let labor = policy.choose(previous, self.frictionless_labor(kappa));

            #[allow(clippy::float_cmp)]
            let adjustment = if labor == previous { 0.0 } else { iota };
            value += discount * (kappa * labor.powf(1.0 - eta) - w * labor - adjustment);

            previous = labor;
            discount /= r;
        }

        value
    }

    /// Mean ex-post value of `policy` over the panel, `H(Δ)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the panel horizon differs from the model's.
    pub fn ex_ante_value(&self, panel: &ShockPanel, policy: Policy) -> Result<f64, SalonError> {
        if panel.horizon != self.params.horizon {
            return Err(SalonError::PanelHorizon {
                expected: self.params.horizon,
                found: panel.horizon,
            });
        }

        let total: f64 = panel
            .series()
            .map(|shocks| self.ex_post_value(shocks, policy))
            .sum();

        #[allow(clippy::cast_precision_loss)]
        let value = total / panel.num_series() as f64;
        debug!(delta = policy.delta(), value, "valued policy");
        Ok(value)
    }

    /// Values `policy` against always adjusting on the same panel.
    ///
    /// # Errors
    ///
    /// Returns an error if the panel horizon differs from the model's.
    pub fn compare(&self, panel: &ShockPanel, policy: Policy) -> Result<Comparison, SalonError> {
        let baseline = self.ex_ante_value(panel, Policy::always_adjust())?;
        let value = self.ex_ante_value(panel, policy)?;

        let verdict = if value > baseline {
            Verdict::Improves
        } else if value < baseline {
            Verdict::Worsens
        } else {
            Verdict::Unchanged
        };
        info!(delta = policy.delta(), value, baseline, ?verdict, "compared policy");

        Ok(Comparison {
            policy,
            value,
            baseline,
            verdict,
        })
    }

    /// Finds the value-maximizing threshold on `grid`.
    ///
    /// # Errors
    ///
    /// Returns an error if the grid is empty, holds an invalid threshold, or
    /// the panel horizon differs from the model's.
    pub fn grid_search(&self, panel: &ShockPanel, grid: &[f64]) -> Result<GridSearch, SalonError> {
        let _span = debug_span!("grid_search", points = grid.len()).entered();

        let mut best: Option<(Policy, f64)> = None;
        let mut curve = Vec::with_capacity(grid.len());

        for &delta in grid {
            let policy = Policy::threshold(delta)?;
            let value = self.ex_ante_value(panel, policy)?;
            curve.push((delta, value));

            if best.is_none_or(|(_, best_value)| value > best_value) {
                best = Some((policy, value));
            }
        }

        let (best, value) = best.ok_or(SalonError::EmptyGrid)?;
        info!(delta = best.delta(), value, "best threshold");

        Ok(GridSearch { best, value, curve })
    }
}

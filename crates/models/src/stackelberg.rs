//! Stackelberg quantity competition between a leader and a follower.
//!
//! Inverse demand is linear, `p = d − (q_l + q_f)`, and both firms produce at
//! marginal cost `c`. The equilibrium is found by backward induction. The
//! follower best-responds to any leader quantity, and the leader picks its
//! quantity anticipating that response. Both steps are golden section
//! maximizations over `[0, d]`, nested so that every leader evaluation solves
//! the follower's problem.

use std::convert::Infallible;

use econsolve_core::{Model, OptimizationProblem};
use econsolve_solvers::optimization::golden_section::{self, Config, Status};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors from building a [`Duopoly`].
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum DuopolyError {
    #[error("demand intercept d must be finite and positive, got {0}")]
    Demand(f64),

    #[error("marginal cost c must be finite and non-negative, got {0}")]
    Cost(f64),
}

/// A duopoly market with validated demand and cost.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-derive", derive(serde::Serialize, serde::Deserialize))]
pub struct Duopoly {
    d: f64,
    c: f64,
}

/// Quantities, price, and profits at a Stackelberg equilibrium.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-derive", derive(serde::Serialize, serde::Deserialize))]
pub struct Equilibrium {
    /// Marginal cost the equilibrium was solved for.
    pub cost: f64,
    pub q_leader: f64,
    pub q_follower: f64,
    pub price: f64,
    pub profit_leader: f64,
    pub profit_follower: f64,
}

impl Duopoly {
    /// Creates a market with demand intercept `d` and marginal cost `c`.
    ///
    /// # Errors
    ///
    /// Returns an error if `d` is not positive or `c` is negative, or either
    /// is non-finite.
    pub fn new(d: f64, c: f64) -> Result<Self, DuopolyError> {
        if !(d.is_finite() && d > 0.0) {
            return Err(DuopolyError::Demand(d));
        }
        if !(c.is_finite() && c >= 0.0) {
            return Err(DuopolyError::Cost(c));
        }
        Ok(Self { d, c })
    }

    #[must_use]
    pub fn demand(&self) -> f64 {
        self.d
    }

    #[must_use]
    pub fn cost(&self) -> f64 {
        self.c
    }

    /// Market price at the given quantities.
    #[must_use]
    pub fn price(&self, q_leader: f64, q_follower: f64) -> f64 {
        self.d - (q_leader + q_follower)
    }

    #[must_use]
    pub fn profit_leader(&self, q_leader: f64, q_follower: f64) -> f64 {
        (self.price(q_leader, q_follower) - self.c) * q_leader
    }

    #[must_use]
    pub fn profit_follower(&self, q_leader: f64, q_follower: f64) -> f64 {
        (self.price(q_leader, q_follower) - self.c) * q_follower
    }

    /// The follower's profit-maximizing quantity given the leader's.
    ///
    /// # Errors
    ///
    /// Returns an error if the search fails.
    pub fn follower_reaction(&self, q_leader: f64, config: &Config) -> Result<f64, golden_section::Error> {
        let model = FollowerProfit {
            market: self,
            q_leader,
        };
        let solution = golden_section::maximize(&model, &Quantity, [0.0, self.d], config)?;

        if solution.status == Status::MaxIters {
            warn!(q_leader, x = solution.x, "follower search hit the iteration limit");
        }
        Ok(solution.x)
    }

    /// Solves for the equilibrium by backward induction.
    ///
    /// # Errors
    ///
    /// Returns an error if either search fails.
    pub fn equilibrium(&self, config: &Config) -> Result<Equilibrium, golden_section::Error> {
        let model = LeaderProfit {
            market: self,
            config,
        };
        let solution = golden_section::maximize(&model, &Quantity, [0.0, self.d], config)?;
        if solution.status == Status::MaxIters {
            warn!(x = solution.x, "leader search hit the iteration limit");
        }

        let q_leader = solution.x;
        let q_follower = self.follower_reaction(q_leader, config)?;
        debug!(cost = self.c, q_leader, q_follower, "solved equilibrium");

        Ok(Equilibrium {
            cost: self.c,
            q_leader,
            q_follower,
            price: self.price(q_leader, q_follower),
            profit_leader: self.profit_leader(q_leader, q_follower),
            profit_follower: self.profit_follower(q_leader, q_follower),
        })
    }
}

/// Errors from a cost sweep.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error(transparent)]
    Market(#[from] DuopolyError),

    #[error("equilibrium search failed at cost {cost}")]
    Search {
        cost: f64,
        #[source]
        source: golden_section::Error,
    },
}

/// Solves the equilibrium with demand intercept `d` for each cost in `costs`.
///
/// # Errors
///
/// Returns an error for the first invalid cost or failed search.
pub fn cost_sweep(d: f64, costs: &[f64], config: &Config) -> Result<Vec<Equilibrium>, SweepError> {
    costs
        .iter()
        .map(|&cost| {
            Duopoly::new(d, cost)?
                .equilibrium(config)
                .map_err(|source| SweepError::Search { cost, source })
        })
        .collect()
}

/// Maps the scalar search variable to a quantity.
struct Quantity;

impl OptimizationProblem<1> for Quantity {
    type Input = f64;
    type Output = f64;
    type Error = Infallible;

    fn input(&self, x: &[f64; 1]) -> Result<f64, Self::Error> {
        Ok(x[0])
    }

    fn objective(&self, _input: &f64, profit: &f64) -> Result<f64, Self::Error> {
        Ok(*profit)
    }
}

/// Follower profit as a function of its own quantity.
struct FollowerProfit<'a> {
    market: &'a Duopoly,
    q_leader: f64,
}

impl Model for FollowerProfit<'_> {
    type Input = f64;
    type Output = f64;
    type Error = Infallible;

    fn call(&self, q_follower: &f64) -> Result<f64, Self::Error> {
        Ok(self.market.profit_follower(self.q_leader, *q_follower))
    }
}

/// Leader profit with the follower's reaction solved inside each call.
struct LeaderProfit<'a> {
    market: &'a Duopoly,
    config: &'a Config,
}

impl Model for LeaderProfit<'_> {
    type Input = f64;
    type Output = f64;
    type Error = golden_section::Error;

    fn call(&self, q_leader: &f64) -> Result<f64, Self::Error> {
        let q_follower = self.market.follower_reaction(*q_leader, self.config)?;
        Ok(self.market.profit_leader(*q_leader, q_follower))
    }
}

use thiserror::Error;

/// Configuration for a refined multi-start run.
///
/// A `Config` can only be built through [`Config::new`], so a run never starts
/// from an invalid configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    warmup: usize,
    max_iters: usize,
    bounds: [f64; 2],
    tolerance: f64,
}

/// Errors from validating a multi-start config.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ConfigError {
    #[error("warmup must be at least 1")]
    ZeroWarmup,

    #[error("warmup ({warmup}) exceeds max_iters ({max_iters})")]
    WarmupExceedsMax { warmup: usize, max_iters: usize },

    #[error("bounds must be finite with lo < hi and a finite width, got [{lo}, {hi}]")]
    Bounds { lo: f64, hi: f64 },

    #[error("tolerance must be finite and positive, got {0}")]
    Tolerance(f64),
}

impl Default for Config {
    fn default() -> Self {
        // Known-good values, unwrap is safe
        Self::new(10, 1000, [-600.0, 600.0], 1e-8).unwrap()
    }
}

impl Config {
    /// Creates a validated config.
    ///
    /// `bounds` is the sampling interval applied to every coordinate.
    ///
    /// # Errors
    ///
    /// Returns an error if `warmup` is zero or exceeds `max_iters`, if the
    /// bounds are non-finite, not strictly increasing, or so far apart that
    /// their width overflows, or if the tolerance is not finite and positive.
    pub fn new(
        warmup: usize,
        max_iters: usize,
        bounds: [f64; 2],
        tolerance: f64,
    ) -> Result<Self, ConfigError> {
        if warmup == 0 {
            return Err(ConfigError::ZeroWarmup);
        }
        if warmup > max_iters {
            return Err(ConfigError::WarmupExceedsMax { warmup, max_iters });
        }
        let [lo, hi] = bounds;
        if !lo.is_finite() || !hi.is_finite() || lo >= hi || !(hi - lo).is_finite() {
            return Err(ConfigError::Bounds { lo, hi });
        }
        if !tolerance.is_finite() || tolerance <= 0.0 {
            return Err(ConfigError::Tolerance(tolerance));
        }

        Ok(Self {
            warmup,
            max_iters,
            bounds,
            tolerance,
        })
    }

    /// Number of leading restarts that use unblended random starts.
    #[must_use]
    pub fn warmup(&self) -> usize {
        self.warmup
    }

    /// Hard cap on the number of restarts.
    #[must_use]
    pub fn max_iters(&self) -> usize {
        self.max_iters
    }

    /// Sampling interval `[lo, hi]` for each coordinate.
    #[must_use]
    pub fn bounds(&self) -> [f64; 2] {
        self.bounds
    }

    /// The run stops once the incumbent objective is below this value.
    ///
    /// Also passed to the local minimizer as its convergence tolerance.
    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }
}

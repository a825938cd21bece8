use thiserror::Error;

/// Stopping rules for golden section search.
///
/// The search stops once the two interior points are within
/// `x_abs_tol + x_rel_tol * |center|` of each other, or after `max_iters`
/// bracket shrinks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    max_iters: usize,
    x_abs_tol: f64,
    x_rel_tol: f64,
}

/// Errors from validating a golden section config.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ConfigError {
    #[error("max_iters must be at least 1")]
    ZeroIters,

    #[error("{name} must be finite and non-negative, got {value}")]
    Tolerance { name: &'static str, value: f64 },
}

impl Default for Config {
    fn default() -> Self {
        // Known-good values, unwrap is safe
        Self::new(200, 1e-10, 1e-10).unwrap()
    }
}

impl Config {
    /// Creates a validated config.
    ///
    /// # Errors
    ///
    /// Returns an error if `max_iters` is zero or either tolerance is
    /// negative or non-finite.
    pub fn new(max_iters: usize, x_abs_tol: f64, x_rel_tol: f64) -> Result<Self, ConfigError> {
        if max_iters == 0 {
            return Err(ConfigError::ZeroIters);
        }
        check_tolerance("x_abs_tol", x_abs_tol)?;
        check_tolerance("x_rel_tol", x_rel_tol)?;

        Ok(Self {
            max_iters,
            x_abs_tol,
            x_rel_tol,
        })
    }

    #[must_use]
    pub fn max_iters(&self) -> usize {
        self.max_iters
    }

    #[must_use]
    pub fn x_abs_tol(&self) -> f64 {
        self.x_abs_tol
    }

    #[must_use]
    pub fn x_rel_tol(&self) -> f64 {
        self.x_rel_tol
    }

    /// Whether interior points `gap` apart around `center` are close enough.
    #[must_use]
    pub fn is_converged(&self, gap: f64, center: f64) -> bool {
        gap <= self.x_abs_tol + self.x_rel_tol * center.abs()
    }
}

fn check_tolerance(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Tolerance { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_settings() {
        assert_eq!(Config::new(0, 1e-8, 0.0), Err(ConfigError::ZeroIters));
        assert_eq!(
            Config::new(10, -1.0, 0.0),
            Err(ConfigError::Tolerance {
                name: "x_abs_tol",
                value: -1.0
            })
        );
        assert!(matches!(
            Config::new(10, 0.0, f64::NAN),
            Err(ConfigError::Tolerance { name: "x_rel_tol", .. })
        ));
    }

    #[test]
    fn relative_tolerance_scales_with_center() {
        let config = Config::new(10, 1e-6, 1e-3).unwrap();

        assert!(config.is_converged(1e-6, 0.0));
        assert!(!config.is_converged(1e-3, 0.0));
        assert!(config.is_converged(1e-3, 10.0));
    }
}

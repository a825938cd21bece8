/// Error type returned by the cost closures handed to a [`LocalMinimizer`].
pub type CostError = Box<dyn std::error::Error + Send + Sync>;

/// A local minimizer run from each multi-start starting point.
///
/// Implementations should converge to a nearby stationary point of `cost`;
/// global optimality is not expected. The multi-start driver only relies on
/// the returned point, which it re-evaluates itself.
pub trait LocalMinimizer<const N: usize> {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Minimizes `cost` starting from `start`.
    ///
    /// `tolerance` is the convergence tolerance requested by the caller.
    ///
    /// # Errors
    ///
    /// Returns an error if no candidate point could be produced.
    fn minimize<F>(&self, cost: &F, start: [f64; N], tolerance: f64) -> Result<[f64; N], Self::Error>
    where
        F: Fn(&[f64; N]) -> Result<f64, CostError>;
}

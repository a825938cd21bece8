/// Defines a minimization problem over `N` solver variables.
///
/// A problem maps solver variables to a model input, then computes an
/// objective value from the model input and output. Minimizers search for the
/// `x` with the smallest objective; maximizers negate the comparison.
///
/// For example, `N = 1` represents a scalar problem and `N = 2` a search over
/// the plane.
pub trait OptimizationProblem<const N: usize> {
    type Input;
    type Output;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Maps solver variables (`x`) into a model input.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the input cannot be constructed from `x`.
    fn input(&self, x: &[f64; N]) -> Result<Self::Input, Self::Error>;

    /// Computes an objective value from model input/output.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the objective cannot be computed.
    fn objective(&self, input: &Self::Input, output: &Self::Output) -> Result<f64, Self::Error>;
}

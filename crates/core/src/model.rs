/// A callable model that maps an input to an output.
///
/// Models are the unit of computation solvers work against: an economic
/// model, a test function, or a nested solve can all be expressed as one.
pub trait Model {
    type Input;
    type Output;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Calls the model with the given input.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error>;
}

/// A captured input/output pair from a model call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot<I, O> {
    pub input: I,
    pub output: O,
}

impl<I, O> Snapshot<I, O> {
    /// Creates a new snapshot from input and output values.
    pub fn new(input: I, output: O) -> Self {
        Self { input, output }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::convert::Infallible;

    struct Square;

    impl Model for Square {
        type Input = f64;
        type Output = f64;
        type Error = Infallible;

        fn call(&self, x: &f64) -> Result<f64, Self::Error> {
            Ok(x * x)
        }
    }

    #[test]
    fn snapshot_captures_call() {
        let input = 3.0;
        let output = Square.call(&input).unwrap();

        let snapshot = Snapshot::new(input, output);

        assert_eq!(snapshot, Snapshot { input: 3.0, output: 9.0 });
    }
}

use std::error::Error as StdError;

use thiserror::Error;

use crate::optimization::EvalError;

/// Errors that end a multi-start run without a solution.
#[derive(Debug, Error)]
pub enum Error {
    /// Every restart failed, so there is no incumbent to report.
    #[error("no solution found: all {iters} restarts failed")]
    NoSolutionFound { iters: usize },
}

/// Why a single restart produced no usable candidate.
///
/// These are recovered per restart and never end a run on their own.
#[derive(Debug, Error)]
pub enum LocalError {
    #[error("local minimizer failed: {0}")]
    Minimizer(Box<dyn StdError + Send + Sync>),

    #[error("model error at candidate: {0}")]
    Model(Box<dyn StdError + Send + Sync>),

    #[error("problem error at candidate: {0}")]
    Problem(Box<dyn StdError + Send + Sync>),

    #[error("candidate objective is not finite: {0}")]
    NonFinite(f64),
}

impl<ME, PE> From<EvalError<ME, PE>> for LocalError
where
    ME: StdError + Send + Sync + 'static,
    PE: StdError + Send + Sync + 'static,
{
    fn from(err: EvalError<ME, PE>) -> Self {
        match err {
            EvalError::Model(e) => Self::Model(Box::new(e)),
            EvalError::Problem(e) => Self::Problem(Box::new(e)),
            EvalError::NonFinite(v) => Self::NonFinite(v),
        }
    }
}

use std::error::Error as StdError;

use crate::optimization::EvalError;

/// Errors that can occur during golden section search.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("bracket [{lo}, {hi}] must be finite with distinct bounds")]
    Bracket { lo: f64, hi: f64 },

    #[error("model error: {0}")]
    Model(Box<dyn StdError + Send + Sync>),

    #[error("problem error: {0}")]
    Problem(Box<dyn StdError + Send + Sync>),

    #[error("objective is not finite: {0}")]
    NonFinite(f64),
}

impl<ME, PE> From<EvalError<ME, PE>> for Error
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

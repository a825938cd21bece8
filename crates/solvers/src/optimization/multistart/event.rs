use super::{LocalError, Phase, Point};

/// Events emitted by the multi-start solver, one per restart.
///
/// Every event describes restart `iter`: its [`Phase`], the effective starting
/// point `start`, and the blend `weight` (`Some` only when the start was
/// blended toward the incumbent).
pub enum Event<'a, I, O, const N: usize> {
    /// The local result became the new incumbent.
    Improved {
        iter: usize,
        phase: Phase,
        start: [f64; N],
        weight: Option<f64>,

        /// The new incumbent.
        point: Point<N>,

        /// The model input at the new incumbent.
        input: &'a I,

        /// The model output at the new incumbent.
        output: &'a O,
    },

    /// The local result did not beat the incumbent (ties included).
    NotImproved {
        iter: usize,
        phase: Phase,
        start: [f64; N],
        weight: Option<f64>,

        /// The local result.
        point: Point<N>,

        /// The unchanged incumbent.
        best: Point<N>,
    },

    /// The restart produced no usable candidate.
    LocalFailed {
        iter: usize,
        phase: Phase,
        start: [f64; N],
        weight: Option<f64>,

        /// The incumbent, if any restart has succeeded yet.
        best: Option<Point<N>>,

        error: &'a LocalError,
    },
}

impl<I, O, const N: usize> Event<'_, I, O, N> {
    /// Returns the restart index.
    #[must_use]
    pub fn iter(&self) -> usize {
        match self {
            Self::Improved { iter, .. }
            | Self::NotImproved { iter, .. }
            | Self::LocalFailed { iter, .. } => *iter,
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        match self {
            Self::Improved { phase, .. }
            | Self::NotImproved { phase, .. }
            | Self::LocalFailed { phase, .. } => *phase,
        }
    }

    /// Returns the effective starting point of the restart.
    #[must_use]
    pub fn start(&self) -> [f64; N] {
        match self {
            Self::Improved { start, .. }
            | Self::NotImproved { start, .. }
            | Self::LocalFailed { start, .. } => *start,
        }
    }

    /// Returns the blend weight, if the start was blended.
    #[must_use]
    pub fn weight(&self) -> Option<f64> {
        match self {
            Self::Improved { weight, .. }
            | Self::NotImproved { weight, .. }
            | Self::LocalFailed { weight, .. } => *weight,
        }
    }

    /// Returns the incumbent after this restart, if one exists.
    #[must_use]
    pub fn best(&self) -> Option<Point<N>> {
        match self {
            Self::Improved { point, .. } => Some(*point),
            Self::NotImproved { best, .. } => Some(*best),
            Self::LocalFailed { best, .. } => *best,
        }
    }
}

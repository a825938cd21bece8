/// Where a restart sits in the exploration schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Starting points are unblended random draws.
    Warmup,

    /// Starting points are random draws blended toward the incumbent.
    Exploit,
}

impl Phase {
    /// Returns the phase of restart `iter` for a given warm-up length.
    #[must_use]
    pub fn of(iter: usize, warmup: usize) -> Self {
        if iter < warmup {
            Self::Warmup
        } else {
            Self::Exploit
        }
    }
}

/// Weight of the random draw when blending restart `iter` toward the incumbent.
///
/// Logistic decay from 0.5 at `iter == warmup` toward 0, with a scale of 100
/// restarts. Only meaningful in [`Phase::Exploit`].
#[must_use]
pub fn blend_weight(iter: usize, warmup: usize) -> f64 {
    debug_assert!(iter >= warmup, "blend weight requested during warm-up");
    #[allow(clippy::cast_precision_loss)]
    let elapsed = (iter - warmup) as f64;
    0.50 * (2.0 / (1.0 + (elapsed / 100.0).exp()))
}

/// Blends `draw` toward `incumbent`: `weight * draw + (1 - weight) * incumbent`.
pub(super) fn blend<const N: usize>(draw: &[f64; N], incumbent: &[f64; N], weight: f64) -> [f64; N] {
    std::array::from_fn(|i| weight * draw[i] + (1.0 - weight) * incumbent[i])
}

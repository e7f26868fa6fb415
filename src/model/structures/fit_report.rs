/// Outcome of the trend fit, surfaced alongside the ranked entries so the
/// caller can tell a real fit apart from the degraded fallback modes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FitReport {
    /// The curve fit converged; carries the fitted dropout parameters.
    Fitted { scale: f64, rate: f64 },

    /// Too few qualifying records to fit a trend. Predictions use a fixed
    /// conservative score.
    Underdetermined { fallback_score: i32 },

    /// The optimizer failed to converge. Predictions use a fixed
    /// optimistic score.
    Diverged { fallback_score: i32 },

    /// No usable records at all; the result set is empty.
    NoData
}

impl FitReport {
    pub fn is_degraded(&self) -> bool {
        !matches!(self, FitReport::Fitted { .. })
    }
}

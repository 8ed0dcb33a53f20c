use crate::error::{Error, Result, finite_result, positive};

/// Return on investment as a percentage: `(gain - cost) / cost * 100`.
///
/// `cost` must be positive; `gain` may be anything finite, including a loss.
pub fn roi_percent(gain: f64, cost: f64) -> Result<f64> {
    if !gain.is_finite() {
        return Err(Error::InvalidInput {
            field: "gain",
            reason: format!("{gain} is not a finite number"),
        });
    }
    let cost = positive("cost", cost)?;
    finite_result((gain - cost) / cost * 100.0)
}

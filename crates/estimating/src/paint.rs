//! Traffic paint estimates for line striping.

use crate::error::{Result, finite_result, positive};

/// Standard parking-lot stripe width.
pub const DEFAULT_WIDTH_INCHES: f64 = 4.0;

/// Square feet one gallon covers at 15 mil wet film.
pub const DEFAULT_COVERAGE_SQFT_PER_GALLON: f64 = 100.0;

/// A striping job to estimate paint for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StripeJob {
    pub linear_feet: f64,
    pub width_inches: f64,
    pub coverage_sqft_per_gallon: f64,
    pub coats: u32,
}

impl StripeJob {
    /// A single-coat 4" stripe job.
    pub fn new(linear_feet: f64) -> Self {
        Self {
            linear_feet,
            width_inches: DEFAULT_WIDTH_INCHES,
            coverage_sqft_per_gallon: DEFAULT_COVERAGE_SQFT_PER_GALLON,
            coats: 1,
        }
    }

    pub fn width(mut self, inches: f64) -> Self {
        self.width_inches = inches;
        self
    }

    pub fn coverage(mut self, sqft_per_gallon: f64) -> Self {
        self.coverage_sqft_per_gallon = sqft_per_gallon;
        self
    }

    pub fn coats(mut self, coats: u32) -> Self {
        self.coats = coats;
        self
    }
}

/// Gallons of paint needed for `job`, rounded up to the next tenth.
pub fn paint_gallons(job: StripeJob) -> Result<f64> {
    let feet = positive("linear_feet", job.linear_feet)?;
    let width = positive("width_inches", job.width_inches)?;
    let coverage = positive("coverage_sqft_per_gallon", job.coverage_sqft_per_gallon)?;
    let coats = positive("coats", f64::from(job.coats))?;

    let area = feet * (width / 12.0);
    let gallons = finite_result(area / coverage * coats)?;
    // Nudge down first so exact tenths don't round up on float noise. Any
    // positive job needs at least a tenth.
    Ok((((gallons * 10.0) - 1e-9).ceil() / 10.0).max(0.1))
}

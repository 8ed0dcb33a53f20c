//! Field calculators used when quoting paving work.
//!
//! ```
//! use estimating::{StripeJob, paint_gallons, roi_percent};
//!
//! assert_eq!(roi_percent(15_000.0, 10_000.0)?, 50.0);
//! assert_eq!(paint_gallons(StripeJob::new(300.0))?, 1.0);
//! # Ok::<(), estimating::Error>(())
//! ```

mod error;
mod paint;
mod roi;

pub use error::{Error, Result};
pub use paint::{
    DEFAULT_COVERAGE_SQFT_PER_GALLON, DEFAULT_WIDTH_INCHES, StripeJob, paint_gallons,
};
pub use roi::roi_percent;

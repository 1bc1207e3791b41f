pub mod cross_section;
pub mod time_series;

pub use cross_section::*;
pub use time_series::*;

/// Valuation multiples only carry information when strictly positive; a
/// negative PE or EV/EBITDA means the denominator went negative, not that
/// the stock is cheap.
pub(crate) fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v > 0.0)
}

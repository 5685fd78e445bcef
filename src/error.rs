use crate::series::Month;
use thiserror::Error;

/// Input validation failures of the variability builder.
///
/// None of these are retryable: the same input always fails the same way.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VariabilityError {
    /// A monthly series does not have exactly 12 entries.
    #[error("{series} series must have 12 months, but has {len}")]
    InvalidLength { series: &'static str, len: usize },

    /// A month holds an infinite value.
    #[error("{series} series has a non-finite value in {month}")]
    NonFinite { series: &'static str, month: Month },

    /// Analysis mode is neither `percentages` nor `absolute`.
    #[error("invalid analysis mode {0:?} (expected \"percentages\" or \"absolute\")")]
    InvalidMode(String),

    /// Every month of the selected series is missing.
    #[error("no historical data available")]
    NoData,
}

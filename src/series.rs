//! Monthly series and analysis modes.

use crate::error::VariabilityError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

pub const N_MONTHS: usize = 12;

/// Calendar month, `Jan` is index 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Month {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    pub const ALL: [Month; N_MONTHS] = [
        Month::Jan,
        Month::Feb,
        Month::Mar,
        Month::Apr,
        Month::May,
        Month::Jun,
        Month::Jul,
        Month::Aug,
        Month::Sep,
        Month::Oct,
        Month::Nov,
        Month::Dec,
    ];

    pub fn idx(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Month::Jan => "Jan",
            Month::Feb => "Feb",
            Month::Mar => "Mar",
            Month::Apr => "Apr",
            Month::May => "May",
            Month::Jun => "Jun",
            Month::Jul => "Jul",
            Month::Aug => "Aug",
            Month::Sep => "Sep",
            Month::Oct => "Oct",
            Month::Nov => "Nov",
            Month::Dec => "Dec",
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which series drives the monthly values and the variability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AnalysisMode {
    Percentages,
    Absolute,
}

impl AnalysisMode {
    pub fn as_str(self) -> &'static str {
        match self {
            AnalysisMode::Percentages => "percentages",
            AnalysisMode::Absolute => "absolute",
        }
    }

    /// Unit shown next to the average mix.
    pub fn avg_unit(self) -> &'static str {
        match self {
            AnalysisMode::Percentages => "%",
            AnalysisMode::Absolute => "calls",
        }
    }

    /// Unit shown next to the variability (percentage points or calls).
    pub fn var_unit(self) -> &'static str {
        match self {
            AnalysisMode::Percentages => "pp",
            AnalysisMode::Absolute => "calls",
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisMode {
    type Err = VariabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "percentages" => Ok(AnalysisMode::Percentages),
            "absolute" => Ok(AnalysisMode::Absolute),
            _ => Err(VariabilityError::InvalidMode(s.to_string())),
        }
    }
}

impl TryFrom<String> for AnalysisMode {
    type Error = VariabilityError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<AnalysisMode> for String {
    fn from(mode: AnalysisMode) -> Self {
        mode.as_str().to_string()
    }
}

/// Twelve monthly values; `None` marks a month without historical data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlySeries([Option<f64>; N_MONTHS]);

impl MonthlySeries {
    /// Build a series from raw values, where NaN is the no-data sentinel.
    ///
    /// Infinite values are rejected.
    pub fn from_values(vals: &[f64], series: &'static str) -> Result<Self, VariabilityError> {
        let len = vals.len();
        if len != N_MONTHS {
            return Err(VariabilityError::InvalidLength { series, len });
        }
        let mut months = [None; N_MONTHS];
        for ((slot, &val), month) in months.iter_mut().zip(vals).zip(Month::ALL) {
            if val.is_infinite() {
                return Err(VariabilityError::NonFinite { series, month });
            }
            *slot = (!val.is_nan()).then_some(val);
        }
        Ok(Self(months))
    }

    pub fn get(&self, month: Month) -> Option<f64> {
        self.0[month.idx()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Month, Option<f64>)> + '_ {
        Month::ALL.into_iter().zip(self.0.iter().copied())
    }

    pub fn active(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().filter_map(|&val| val)
    }

    pub fn n_active(&self) -> usize {
        self.active().count()
    }

    /// Mean over active months, `None` if every month is missing.
    pub fn mean(&self) -> Option<f64> {
        let n_active = self.n_active();
        if n_active == 0 {
            return None;
        }
        Some(self.active().sum::<f64>() / n_active as f64)
    }

    /// Share of each active month in the active total, in percent.
    ///
    /// Missing months stay missing. A zero total yields an all-missing series.
    pub fn to_percentages(&self) -> Self {
        let total: f64 = self.active().sum();
        if total == 0.0 {
            return Self([None; N_MONTHS]);
        }
        Self(self.0.map(|val| val.map(|val| val / total * 100.0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_marks_missing_months() {
        let mut vals = [10.0; N_MONTHS];
        vals[0] = f64::NAN;
        vals[1] = f64::NAN;
        let series = MonthlySeries::from_values(&vals, "monthly calls").unwrap();
        assert_eq!(series.get(Month::Jan), None);
        assert_eq!(series.get(Month::Mar), Some(10.0));
        assert_eq!(series.n_active(), 10);
    }

    #[test]
    fn wrong_length_is_rejected() {
        let err = MonthlySeries::from_values(&[1.0; 11], "monthly calls").unwrap_err();
        assert_eq!(
            err,
            VariabilityError::InvalidLength {
                series: "monthly calls",
                len: 11
            }
        );
        assert!(MonthlySeries::from_values(&[1.0; 13], "monthly calls").is_err());
    }

    #[test]
    fn infinite_values_are_rejected() {
        let mut vals = [8.0; N_MONTHS];
        vals[2] = f64::NEG_INFINITY;
        let err = MonthlySeries::from_values(&vals, "monthly percentages").unwrap_err();
        assert_eq!(
            err,
            VariabilityError::NonFinite {
                series: "monthly percentages",
                month: Month::Mar
            }
        );
    }

    #[test]
    fn mean_ignores_missing_months() {
        let mut vals = [f64::NAN; N_MONTHS];
        vals[10] = 4.0;
        vals[11] = 8.0;
        let series = MonthlySeries::from_values(&vals, "monthly calls").unwrap();
        assert_eq!(series.mean(), Some(6.0));

        let empty = MonthlySeries::from_values(&[f64::NAN; N_MONTHS], "monthly calls").unwrap();
        assert_eq!(empty.mean(), None);
    }

    #[test]
    fn percentages_only_count_active_months() {
        let mut vals = [100.0; N_MONTHS];
        vals[0] = f64::NAN;
        vals[1] = f64::NAN;
        let pct = MonthlySeries::from_values(&vals, "monthly calls")
            .unwrap()
            .to_percentages();
        assert_eq!(pct.get(Month::Jan), None);
        assert!((pct.get(Month::Dec).unwrap() - 10.0).abs() < 1e-12);
        assert!((pct.active().sum::<f64>() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn zero_total_yields_no_percentages() {
        let series = MonthlySeries::from_values(&[0.0; N_MONTHS], "monthly calls").unwrap();
        assert_eq!(series.to_percentages().n_active(), 0);
    }

    #[test]
    fn mode_parsing() {
        assert_eq!("Percentages".parse::<AnalysisMode>(), Ok(AnalysisMode::Percentages));
        assert_eq!(" absolute ".parse::<AnalysisMode>(), Ok(AnalysisMode::Absolute));
        assert_eq!(
            "relative".parse::<AnalysisMode>(),
            Err(VariabilityError::InvalidMode("relative".to_string()))
        );
    }
}

use crate::series::AnalysisMode;
use crate::table::{AnnotatedTable, PlainTable, VariabilityTableBuilder};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fs, path::Path};

/// Monthly call data of one company.
///
/// Months without historical data are `nan` in both series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyRecord {
    pub id: u64,
    pub name: String,

    /// Number of calls per month, January first.
    pub monthly_calls: Vec<f64>,
    /// Share of calls per month. Derived from `monthly_calls` when absent.
    #[serde(default)]
    pub calls_percentages: Option<Vec<f64>>,
}

/// Companies loaded from a TOML file with one `[[company]]` table each.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(rename = "company", default)]
    pub companies: Vec<CompanyRecord>,
}

impl Dataset {
    /// Load and validate a [`Dataset`] from a TOML file.
    ///
    /// Series lengths are checked when the tables are built.
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let file = file.as_ref();
        let contents =
            fs::read_to_string(file).with_context(|| format!("failed to read {file:?}"))?;

        let dataset: Dataset = toml::from_str(&contents).context("failed to deserialize dataset")?;

        dataset.validate().context("failed to validate dataset")?;

        Ok(dataset)
    }

    fn validate(&self) -> Result<()> {
        if self.companies.is_empty() {
            bail!("dataset must contain at least one company");
        }
        let mut ids = HashSet::new();
        for company in &self.companies {
            if !ids.insert(company.id) {
                bail!("company id {} is not unique", company.id);
            }
            if company.name.trim().is_empty() {
                bail!("company {} must have a name", company.id);
            }
            check_counts(&company.monthly_calls)
                .with_context(|| format!("invalid monthly calls of company {}", company.id))?;
            if let Some(pct) = &company.calls_percentages {
                check_percentages(pct).with_context(|| {
                    format!("invalid calls percentages of company {}", company.id)
                })?;
            }
        }
        Ok(())
    }

    /// Build the variability tables of every company, or of a single one.
    pub fn build_tables(
        &self,
        mode: AnalysisMode,
        company_id: Option<u64>,
    ) -> Result<(PlainTable, AnnotatedTable)> {
        let mut builder = VariabilityTableBuilder::new(mode);
        let mut n_rows = 0;
        for company in &self.companies {
            if company_id.is_some_and(|id| id != company.id) {
                continue;
            }
            builder
                .add_entity(
                    &company.monthly_calls,
                    company.calls_percentages.as_deref(),
                    &company.name,
                    company.id,
                )
                .with_context(|| {
                    format!("failed to build row of company {} ({})", company.id, company.name)
                })?;
            n_rows += 1;
        }
        match company_id {
            Some(id) if n_rows == 0 => bail!("no company with id {id}"),
            _ => {}
        }
        log::info!("built {mode} table with {n_rows} rows");

        Ok(builder.finish())
    }
}

// NaN entries mark missing months and are skipped by both checks.
fn check_counts(vec: &[f64]) -> Result<()> {
    if let Some(count) = vec
        .iter()
        .filter(|count| !count.is_nan())
        .find(|&&count| count < 0.0 || count.is_infinite() || count.fract() != 0.0)
    {
        bail!("call counts must be finite non-negative integers, but found {count}");
    }
    Ok(())
}

fn check_percentages(vec: &[f64]) -> Result<()> {
    if let Some(pct) = vec.iter().find(|&&pct| pct.is_infinite()) {
        bail!("percentages must be finite, but found {pct}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::Month;
    use crate::table::Column;

    const COMPANIES: &str = r#"
[[company]]
id = 2
name = "Elite Plumbing"
monthly_calls = [120, 110, 130, 140, 150, 160, 170, 160, 150, 140, 130, 120]

[[company]]
id = 1
name = "Monarch HVAC"
monthly_calls = [nan, nan, 1300, 1400, 1500, 1600, 1700, 1600, 1500, 1400, 1300, 1200]
calls_percentages = [nan, nan, 9.03, 9.72, 10.42, 11.11, 11.81, 11.11, 10.42, 9.72, 9.03, 8.33]
"#;

    #[test]
    fn parses_companies_with_missing_months() {
        let dataset: Dataset = toml::from_str(COMPANIES).unwrap();
        dataset.validate().unwrap();
        assert_eq!(dataset.companies.len(), 2);
        assert!(dataset.companies[1].monthly_calls[0].is_nan());
        assert_eq!(dataset.companies[0].calls_percentages, None);
    }

    #[test]
    fn builds_one_row_per_company_ordered_by_id() {
        let dataset: Dataset = toml::from_str(COMPANIES).unwrap();
        let (plain, annotated) = dataset.build_tables(AnalysisMode::Absolute, None).unwrap();
        let names: Vec<_> = annotated.rows.iter().map(|row| row.entity_name.as_str()).collect();
        assert_eq!(names, ["Monarch HVAC", "Elite Plumbing"]);
        assert_eq!(plain.rows[0].cell(Column::Value(Month::Jan)), None);
        assert_eq!(plain.rows[0].cell(Column::AverageMix), Some(1450.0));
    }

    #[test]
    fn builds_single_company() {
        let dataset: Dataset = toml::from_str(COMPANIES).unwrap();
        let (plain, _) = dataset.build_tables(AnalysisMode::Percentages, Some(2)).unwrap();
        assert_eq!(plain.rows.len(), 1);
        assert_eq!(plain.rows[0].entity_id, 2);

        let err = dataset.build_tables(AnalysisMode::Percentages, Some(9)).unwrap_err();
        assert!(err.to_string().contains("no company with id 9"));
    }

    #[test]
    fn rejects_invalid_datasets() {
        let dup = COMPANIES.replace("id = 2", "id = 1");
        let dataset: Dataset = toml::from_str(&dup).unwrap();
        assert!(dataset.validate().is_err());

        let negative = COMPANIES.replace("120, 110", "-120, 110");
        let dataset: Dataset = toml::from_str(&negative).unwrap();
        assert!(dataset.validate().is_err());

        let fractional = COMPANIES.replace("120, 110", "120.5, 110");
        let dataset: Dataset = toml::from_str(&fractional).unwrap();
        let err = dataset.validate().unwrap_err();
        assert!(format!("{err:#}").contains("non-negative integers"));

        let infinite = COMPANIES.replace("[nan, nan, 9.03", "[inf, nan, 9.03");
        let dataset: Dataset = toml::from_str(&infinite).unwrap();
        let err = dataset.validate().unwrap_err();
        assert!(format!("{err:#}").contains("invalid calls percentages of company 1"));

        let empty: Dataset = toml::from_str("").unwrap();
        assert!(empty.validate().is_err());
    }

    #[test]
    fn short_series_fails_the_whole_table() {
        let short = COMPANIES.replace("150, 140, 130, 120]", "150, 140, 130]");
        let dataset: Dataset = toml::from_str(&short).unwrap();
        let err = dataset.build_tables(AnalysisMode::Absolute, None).unwrap_err();
        assert!(format!("{err:#}").contains("must have 12 months, but has 11"));
    }
}

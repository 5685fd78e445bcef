//! Historical variability tables.
//!
//! A table has one row per entity and 25 columns: the average mix, the twelve
//! monthly values and the twelve monthly variabilities (value minus average).
//! [`PlainTable`] keeps the unrounded numbers for export, [`AnnotatedTable`]
//! carries the display text and a [`CellCategory`] per cell for renderers.

use crate::error::VariabilityError;
use crate::format::{fmt_fixed, fmt_signed, round_to};
use crate::series::{AnalysisMode, Month, MonthlySeries, N_MONTHS};
use serde::Serialize;
use std::fmt;

pub const N_COLUMNS: usize = 1 + 2 * N_MONTHS;

/// Decimals used for averages, percentages and variabilities.
pub const VAR_DECIMALS: u32 = 2;

/// Column of a variability table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum Column {
    AverageMix,
    Value(Month),
    Variability(Month),
}

impl Column {
    /// All columns in table order.
    pub fn all() -> Vec<Column> {
        let mut columns = Vec::with_capacity(N_COLUMNS);
        columns.push(Column::AverageMix);
        columns.extend(Month::ALL.map(Column::Value));
        columns.extend(Month::ALL.map(Column::Variability));
        columns
    }

    pub fn idx(self) -> usize {
        match self {
            Column::AverageMix => 0,
            Column::Value(month) => 1 + month.idx(),
            Column::Variability(month) => 1 + N_MONTHS + month.idx(),
        }
    }

    pub fn name(self) -> String {
        match self {
            Column::AverageMix => "Average Mix".to_string(),
            Column::Value(month) => month.label().to_string(),
            Column::Variability(month) => format!("{month}_var"),
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl From<Column> for String {
    fn from(column: Column) -> Self {
        column.name()
    }
}

/// Display category of a cell. Renderers map categories to styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CellCategory {
    Average,
    MonthlyValue,
    VariabilityPositive,
    VariabilityNegative,
    VariabilityZero,
    Missing,
}

impl CellCategory {
    /// Classify a variability on its rounded display value.
    pub fn of_variability(var: f64) -> Self {
        let rounded = round_to(var, VAR_DECIMALS);
        if rounded > 0.0 {
            CellCategory::VariabilityPositive
        } else if rounded < 0.0 {
            CellCategory::VariabilityNegative
        } else {
            CellCategory::VariabilityZero
        }
    }
}

/// Average and per-month deviation of one entity.
#[derive(Debug, Clone, PartialEq)]
pub struct VariabilityRow {
    pub average: f64,
    pub values: MonthlySeries,
    pub variability: [Option<f64>; N_MONTHS],
}

impl VariabilityRow {
    /// Compute the average over active months and each month's deviation.
    pub fn compute(values: MonthlySeries) -> Result<Self, VariabilityError> {
        let average = values.mean().ok_or(VariabilityError::NoData)?;
        let variability = Month::ALL.map(|month| values.get(month).map(|val| val - average));
        Ok(Self {
            average,
            values,
            variability,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlainRow {
    pub entity_id: u64,
    pub entity_name: String,
    /// One cell per column, `None` for missing months.
    pub cells: Vec<Option<f64>>,
}

impl PlainRow {
    pub fn cell(&self, column: Column) -> Option<f64> {
        self.cells[column.idx()]
    }
}

/// Unstyled table for export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlainTable {
    pub mode: AnalysisMode,
    pub columns: Vec<Column>,
    pub rows: Vec<PlainRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedCell {
    pub text: String,
    pub category: CellCategory,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedRow {
    pub entity_id: u64,
    pub entity_name: String,
    pub cells: Vec<AnnotatedCell>,
}

impl AnnotatedRow {
    pub fn cell(&self, column: Column) -> &AnnotatedCell {
        &self.cells[column.idx()]
    }
}

/// Table with display text and category per cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedTable {
    pub mode: AnalysisMode,
    pub columns: Vec<Column>,
    pub rows: Vec<AnnotatedRow>,
}

/// Accumulates one row per entity into a plain and an annotated table.
pub struct VariabilityTableBuilder {
    mode: AnalysisMode,
    plain_rows: Vec<PlainRow>,
    annotated_rows: Vec<AnnotatedRow>,
}

impl VariabilityTableBuilder {
    pub fn new(mode: AnalysisMode) -> Self {
        Self {
            mode,
            plain_rows: Vec::new(),
            annotated_rows: Vec::new(),
        }
    }

    /// Validate an entity's series and append its row to both tables.
    ///
    /// Both series must have 12 entries, NaN marking months without data.
    /// In percentages mode without a percentage series, percentages are
    /// derived from the monthly values. On error nothing is appended.
    pub fn add_entity(
        &mut self,
        monthly_values: &[f64],
        monthly_percentages: Option<&[f64]>,
        entity_name: &str,
        entity_id: u64,
    ) -> Result<(), VariabilityError> {
        let values = MonthlySeries::from_values(monthly_values, "monthly values")?;
        let percentages = monthly_percentages
            .map(|pct| MonthlySeries::from_values(pct, "monthly percentages"))
            .transpose()?;

        let selected = match self.mode {
            AnalysisMode::Percentages => percentages.unwrap_or_else(|| values.to_percentages()),
            AnalysisMode::Absolute => values,
        };
        let row = VariabilityRow::compute(selected)?;
        log::debug!(
            "entity {entity_id} ({entity_name}): average {:.4} over {} active months",
            row.average,
            row.values.n_active()
        );

        self.plain_rows.push(PlainRow {
            entity_id,
            entity_name: entity_name.to_string(),
            cells: plain_cells(&row),
        });
        self.annotated_rows.push(AnnotatedRow {
            entity_id,
            entity_name: entity_name.to_string(),
            cells: annotated_cells(&row, self.mode),
        });

        Ok(())
    }

    /// Finish both tables, rows ordered by entity id.
    pub fn finish(self) -> (PlainTable, AnnotatedTable) {
        let mut plain_rows = self.plain_rows;
        let mut annotated_rows = self.annotated_rows;
        plain_rows.sort_by_key(|row| row.entity_id);
        annotated_rows.sort_by_key(|row| row.entity_id);

        let plain = PlainTable {
            mode: self.mode,
            columns: Column::all(),
            rows: plain_rows,
        };
        let annotated = AnnotatedTable {
            mode: self.mode,
            columns: Column::all(),
            rows: annotated_rows,
        };
        (plain, annotated)
    }
}

/// Build the single-row variability tables of one entity.
pub fn build(
    monthly_values: &[f64],
    monthly_percentages: Option<&[f64]>,
    mode: AnalysisMode,
    entity_name: &str,
    entity_id: u64,
) -> Result<(PlainTable, AnnotatedTable), VariabilityError> {
    let mut builder = VariabilityTableBuilder::new(mode);
    builder.add_entity(monthly_values, monthly_percentages, entity_name, entity_id)?;
    Ok(builder.finish())
}

fn plain_cells(row: &VariabilityRow) -> Vec<Option<f64>> {
    let mut cells = Vec::with_capacity(N_COLUMNS);
    cells.push(Some(row.average));
    cells.extend(row.values.iter().map(|(_, val)| val));
    cells.extend(row.variability);
    cells
}

fn annotated_cells(row: &VariabilityRow, mode: AnalysisMode) -> Vec<AnnotatedCell> {
    let grouped = mode == AnalysisMode::Absolute;
    let missing = || AnnotatedCell {
        text: String::new(),
        category: CellCategory::Missing,
    };

    let mut cells = Vec::with_capacity(N_COLUMNS);
    cells.push(AnnotatedCell {
        text: fmt_average(row.average, mode),
        category: CellCategory::Average,
    });
    for (_, val) in row.values.iter() {
        cells.push(match val {
            Some(val) => AnnotatedCell {
                text: fmt_value(val, mode),
                category: CellCategory::MonthlyValue,
            },
            None => missing(),
        });
    }
    for var in row.variability {
        cells.push(match var {
            Some(var) => AnnotatedCell {
                text: fmt_signed(var, VAR_DECIMALS, grouped),
                category: CellCategory::of_variability(var),
            },
            None => missing(),
        });
    }
    cells
}

/// Decimals of a monthly value: call counts are whole numbers.
pub fn value_decimals(mode: AnalysisMode) -> u32 {
    match mode {
        AnalysisMode::Percentages => VAR_DECIMALS,
        AnalysisMode::Absolute => 0,
    }
}

fn fmt_average(average: f64, mode: AnalysisMode) -> String {
    match mode {
        AnalysisMode::Percentages => format!("{}%", fmt_fixed(average, VAR_DECIMALS, false)),
        AnalysisMode::Absolute => fmt_fixed(average, VAR_DECIMALS, true),
    }
}

fn fmt_value(val: f64, mode: AnalysisMode) -> String {
    match mode {
        AnalysisMode::Percentages => format!("{}%", fmt_fixed(val, value_decimals(mode), false)),
        AnalysisMode::Absolute => fmt_fixed(val, value_decimals(mode), true),
    }
}

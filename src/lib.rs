//! Historical variability of monthly call volumes.
//!
//! [`table::build`] turns twelve monthly values of one company into a plain
//! table for export and an annotated table for display. Everything else in
//! this crate loads data, renders, and writes files around it.

pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod format;
pub mod manager;
pub mod render;
pub mod series;
pub mod table;

pub use error::VariabilityError;
pub use series::{AnalysisMode, Month, MonthlySeries};
pub use table::{AnnotatedTable, CellCategory, Column, PlainTable, VariabilityTableBuilder, build};

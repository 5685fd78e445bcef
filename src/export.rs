//! File exports of variability tables.

use crate::format::fmt_fixed;
use crate::render::Renderer;
use crate::table::{AnnotatedTable, Column, PlainTable, VAR_DECIMALS, value_decimals};
use anyhow::{Context, Result};
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::Path,
};

/// Write the plain table as CSV, one row per entity.
///
/// Numbers are written at display precision without grouping or sign;
/// missing months are empty fields.
pub fn write_csv<P: AsRef<Path>>(table: &PlainTable, file: P) -> Result<()> {
    let file = file.as_ref();
    let writer = File::create(file).with_context(|| format!("failed to create {file:?}"))?;
    let mut writer = csv::Writer::from_writer(BufWriter::new(writer));

    let mut header = vec!["Company".to_string(), "Company ID".to_string()];
    header.extend(table.columns.iter().map(|column| column.name()));
    writer
        .write_record(&header)
        .context("failed to write csv header")?;

    for row in &table.rows {
        let mut record = vec![row.entity_name.clone(), row.entity_id.to_string()];
        for (&column, &cell) in table.columns.iter().zip(&row.cells) {
            let decimals = match column {
                Column::Value(_) => value_decimals(table.mode),
                Column::AverageMix | Column::Variability(_) => VAR_DECIMALS,
            };
            record.push(cell.map_or(String::new(), |val| fmt_fixed(val, decimals, false)));
        }
        writer
            .write_record(&record)
            .with_context(|| format!("failed to write csv row of entity {}", row.entity_id))?;
    }

    writer.flush().context("failed to flush writer stream")?;

    Ok(())
}

/// Write the annotated table as pretty-printed JSON.
pub fn write_json<P: AsRef<Path>>(table: &AnnotatedTable, file: P) -> Result<()> {
    let file = file.as_ref();
    let writer = File::create(file).with_context(|| format!("failed to create {file:?}"))?;
    let mut writer = BufWriter::new(writer);

    serde_json::to_writer_pretty(&mut writer, table).context("failed to serialize table")?;
    writer.flush().context("failed to flush writer stream")?;

    Ok(())
}

/// Render the annotated table and write the result.
pub fn write_rendered<R: Renderer, P: AsRef<Path>>(
    renderer: &R,
    table: &AnnotatedTable,
    file: P,
) -> Result<()> {
    let file = file.as_ref();
    fs::write(file, renderer.render(table)).with_context(|| format!("failed to write {file:?}"))?;
    Ok(())
}

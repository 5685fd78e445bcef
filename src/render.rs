//! Renderers for annotated variability tables.
//!
//! Tables only carry a [`CellCategory`] per cell; a [`CellStyler`] decides how
//! each category looks, so the palette can be swapped without touching the
//! table builder.

use crate::table::{AnnotatedTable, CellCategory};
use maud::{DOCTYPE, html};

/// Visual style of a table cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellStyle {
    pub background: &'static str,
    pub color: Option<&'static str>,
    pub bold: bool,
}

impl CellStyle {
    /// Inline CSS declaration list.
    pub fn css(&self) -> String {
        let mut css = format!("background-color: {}", self.background);
        if let Some(color) = self.color {
            css.push_str(&format!("; color: {color}"));
        }
        if self.bold {
            css.push_str("; font-weight: bold");
        }
        css
    }
}

pub trait CellStyler {
    fn style(&self, category: CellCategory) -> CellStyle;

    /// Style of the entity name column.
    fn header_style(&self) -> CellStyle {
        CellStyle {
            background: "#f8f9fa",
            color: None,
            bold: true,
        }
    }
}

/// Default palette: yellow average, blue values, green/red/grey variability.
#[derive(Debug, Clone, Copy, Default)]
pub struct Palette;

impl CellStyler for Palette {
    fn style(&self, category: CellCategory) -> CellStyle {
        match category {
            CellCategory::Average => CellStyle {
                background: "#fff2cc",
                color: None,
                bold: true,
            },
            CellCategory::MonthlyValue => CellStyle {
                background: "#e8f4f8",
                color: None,
                bold: false,
            },
            CellCategory::VariabilityPositive => CellStyle {
                background: "#d4edda",
                color: Some("#155724"),
                bold: false,
            },
            CellCategory::VariabilityNegative => CellStyle {
                background: "#f8d7da",
                color: Some("#721c24"),
                bold: false,
            },
            CellCategory::VariabilityZero => CellStyle {
                background: "#f8f9fa",
                color: None,
                bold: false,
            },
            CellCategory::Missing => CellStyle {
                background: "#ffffff",
                color: None,
                bold: false,
            },
        }
    }
}

pub trait Renderer {
    fn render(&self, table: &AnnotatedTable) -> String;
}

/// Column-aligned plain text, for terminals and logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl Renderer for TextRenderer {
    fn render(&self, table: &AnnotatedTable) -> String {
        let mut header = vec!["Company".to_string()];
        header.extend(table.columns.iter().map(|column| column.name()));

        let body: Vec<Vec<&str>> = table
            .rows
            .iter()
            .map(|row| {
                let mut line = vec![row.entity_name.as_str()];
                line.extend(row.cells.iter().map(|cell| cell.text.as_str()));
                line
            })
            .collect();

        let mut widths: Vec<usize> = header.iter().map(|name| name.chars().count()).collect();
        for line in &body {
            for (width, text) in widths.iter_mut().zip(line) {
                *width = (*width).max(text.chars().count());
            }
        }

        let mut out = format!(
            "Historical variability ({}: average in {}, variability in {})\n",
            table.mode,
            table.mode.avg_unit(),
            table.mode.var_unit()
        );
        push_line(&mut out, header.iter().map(String::as_str), &widths);
        let rule: Vec<String> = widths.iter().map(|&width| "-".repeat(width)).collect();
        push_line(&mut out, rule.iter().map(String::as_str), &widths);
        for line in &body {
            push_line(&mut out, line.iter().copied(), &widths);
        }
        out
    }
}

fn push_line<'a>(out: &mut String, texts: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let fields: Vec<String> = texts
        .zip(widths)
        .enumerate()
        .map(|(idx, (text, &width))| {
            // Entity names read left to right, numbers line up on the right.
            if idx == 0 {
                format!("{text:<width$}")
            } else {
                format!("{text:>width$}")
            }
        })
        .collect();
    out.push_str(fields.join("  ").trim_end());
    out.push('\n');
}

/// Standalone HTML document with inline cell styles.
#[derive(Debug, Clone, Default)]
pub struct HtmlRenderer<S: CellStyler> {
    styler: S,
}

impl<S: CellStyler> HtmlRenderer<S> {
    pub fn new(styler: S) -> Self {
        Self { styler }
    }
}

impl<S: CellStyler> Renderer for HtmlRenderer<S> {
    fn render(&self, table: &AnnotatedTable) -> String {
        let title = format!("Historical Variability ({})", table.mode);
        let name_css = self.styler.header_style().css();
        let markup = html! {
            (DOCTYPE)
            html {
                head {
                    meta charset="utf-8";
                    title { (title) }
                    style {
                        "table { border-collapse: collapse; font-family: sans-serif; font-size: 12px; }
                        th, td { border: 1px solid #ddd; padding: 4px 6px; text-align: right; }
                        th { background-color: #f0f2f6; }"
                    }
                }
                body {
                    h1 { (title) }
                    p {
                        "Average mix in " (table.mode.avg_unit())
                        ", variability in " (table.mode.var_unit()) "."
                    }
                    table {
                        thead {
                            tr {
                                th { "Company" }
                                @for column in &table.columns {
                                    th { (column.name()) }
                                }
                            }
                        }
                        tbody {
                            @for row in &table.rows {
                                tr data-entity-id=(row.entity_id) {
                                    td style=(name_css) { (row.entity_name) }
                                    @for cell in &row.cells {
                                        td style=(self.styler.style(cell.category).css()) {
                                            (cell.text)
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        };
        markup.into_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::{AnalysisMode, N_MONTHS};
    use crate::table::build;

    fn sample_table() -> AnnotatedTable {
        let mut pct = [8.0; N_MONTHS];
        pct[0] = f64::NAN;
        pct[5] = 12.0;
        let (_, annotated) = build(
            &[100.0; N_MONTHS],
            Some(&pct[..]),
            AnalysisMode::Percentages,
            "Smith & Sons",
            4,
        )
        .unwrap();
        annotated
    }

    #[test]
    fn palette_css() {
        let css = Palette.style(CellCategory::VariabilityNegative).css();
        assert_eq!(css, "background-color: #f8d7da; color: #721c24");
        let css = Palette.style(CellCategory::Average).css();
        assert_eq!(css, "background-color: #fff2cc; font-weight: bold");
    }

    #[test]
    fn text_table_is_aligned() {
        let text = TextRenderer.render(&sample_table());
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("percentages"));
        assert!(lines[1].starts_with("Company"));
        assert!(lines[1].ends_with("Dec_var"));
        assert!(lines[3].starts_with("Smith & Sons"));
        assert!(lines[3].contains("+3.64"));
    }

    #[test]
    fn html_escapes_and_styles_cells() {
        let html = HtmlRenderer::new(Palette).render(&sample_table());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Smith &amp; Sons"));
        assert!(html.contains("<th>Jan_var</th>"));
        assert!(html.contains("data-entity-id=\"4\""));
        assert!(html.contains("background-color: #d4edda; color: #155724"));
        assert!(html.contains("background-color: #ffffff"));
    }
}

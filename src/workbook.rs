// Workbook serialization and the styling pass.
//
// Sheets are written in a fixed order with their table's row/column order
// preserved. Styling (header formatting, column widths) is applied per
// sheet and is allowed to fail without aborting the run: a sheet that
// cannot be styled is logged and left plain.
use crate::error::ReportError;
use crate::types::{Dataset, ReportTables, SheetTable, Value};
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatPattern, Image, Workbook, XlsxError};
use std::path::{Path, PathBuf};
use tracing::warn;

const HEADER_FILL: u32 = 0x4F81BD;
const MIN_COLUMN_WIDTH: f64 = 8.0;
const MAX_COLUMN_WIDTH: f64 = 50.0;

/// Vertical spacing between embedded chart images, in rows.
const CHART_ROW_STRIDE: u32 = 25;

/// Write all data sheets, style them, embed any chart images, and save.
/// The output file is overwritten if it already exists.
pub fn write_report(
    dataset: &Dataset,
    tables: &ReportTables,
    chart_images: &[PathBuf],
    path: &Path,
) -> Result<(), ReportError> {
    let raw = SheetTable {
        columns: dataset.columns.clone(),
        rows: dataset.rows.clone(),
    };

    let mut sheets: Vec<(&str, &SheetTable)> = vec![
        ("Raw Data", &raw),
        ("Wind Summary", &tables.wind),
        ("Temperature Summary", &tables.temperature),
        ("Precipitation Summary", &tables.precipitation),
        ("Statistics", &tables.statistics),
        ("Missing Values", &tables.missing),
    ];
    if let Some(labels) = &tables.labels {
        sheets.push(("Label Summary", labels));
    }

    let mut workbook = Workbook::new();
    for (name, table) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(name)?;
        write_sheet(worksheet, table)?;
        if let Err(e) = style_sheet(worksheet, table) {
            warn!(sheet = name, error = %e, "styling failed, sheet left unstyled");
        }
    }

    if !chart_images.is_empty() {
        if let Err(e) = embed_chart_images(&mut workbook, chart_images) {
            warn!(error = %e, "failed to insert charts, continuing without them");
        }
    }

    workbook.save(path)?;
    Ok(())
}

/// Plain data write: header row followed by the table rows. Missing cells
/// are simply left blank.
fn write_sheet(
    worksheet: &mut rust_xlsxwriter::Worksheet,
    table: &SheetTable,
) -> Result<(), XlsxError> {
    for (col, name) in table.columns.iter().enumerate() {
        worksheet.write_string(0, col as u16, name)?;
    }
    for (r, row) in table.rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            match cell {
                Value::Number(n) => {
                    worksheet.write_number(r as u32 + 1, c as u16, *n)?;
                }
                Value::Text(s) => {
                    worksheet.write_string(r as u32 + 1, c as u16, s)?;
                }
                Value::Missing => {}
            }
        }
    }
    Ok(())
}

/// The styling pass for one sheet: rewrite the header row with the header
/// format and size every column to its longest rendered value.
fn style_sheet(
    worksheet: &mut rust_xlsxwriter::Worksheet,
    table: &SheetTable,
) -> Result<(), XlsxError> {
    let format = header_format();
    for (col, name) in table.columns.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, name, &format)?;
    }
    for (col, width) in column_widths(table).into_iter().enumerate() {
        worksheet.set_column_width(col as u16, width)?;
    }
    Ok(())
}

/// Bold white text on a solid blue fill, centered both ways.
fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(HEADER_FILL))
        .set_pattern(FormatPattern::Solid)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
}

/// Width per column: longest rendered cell (header included) plus padding,
/// clamped to the configured bounds.
fn column_widths(table: &SheetTable) -> Vec<f64> {
    table
        .columns
        .iter()
        .enumerate()
        .map(|(col, name)| {
            let mut longest = name.chars().count();
            for row in &table.rows {
                if let Some(cell) = row.get(col) {
                    longest = longest.max(cell.render().chars().count());
                }
            }
            ((longest + 2) as f64).clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH)
        })
        .collect()
}

/// Append a `Charts` sheet and anchor each image at a vertically spaced
/// cell so images do not overlap.
fn embed_chart_images(workbook: &mut Workbook, images: &[PathBuf]) -> Result<(), XlsxError> {
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Charts")?;
    for (i, path) in images.iter().enumerate() {
        let image = Image::new(path)?;
        worksheet.insert_image(1 + i as u32 * CHART_ROW_STRIDE, 0, &image)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_format_is_not_the_default() {
        // The styling pass must produce bold text on a non-default fill.
        let styled = format!("{:?}", header_format());
        let plain = format!("{:?}", Format::new());
        assert_ne!(styled, plain);
    }

    #[test]
    fn column_widths_clamp_to_bounds() {
        let table = SheetTable {
            columns: vec!["Id".to_string(), "Notes".to_string()],
            rows: vec![vec![
                Value::Number(1.0),
                Value::Text("x".repeat(120)),
            ]],
        };
        let widths = column_widths(&table);
        assert_eq!(widths[0], MIN_COLUMN_WIDTH);
        assert_eq!(widths[1], MAX_COLUMN_WIDTH);
    }

    #[test]
    fn column_widths_fit_longest_cell() {
        let table = SheetTable {
            columns: vec!["Label".to_string()],
            rows: vec![vec![Value::Text("Thunderstorm".to_string())]],
        };
        // 12 characters plus 2 padding.
        assert_eq!(column_widths(&table), vec![14.0]);
    }
}

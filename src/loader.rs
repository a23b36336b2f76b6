use crate::error::ReportError;
use crate::types::{Dataset, Value};
use crate::util::{is_missing_marker, parse_f64_safe};
use csv::ReaderBuilder;
use std::path::Path;

/// What happened while loading, for the console/log summary.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub total_rows: usize,
    pub dropped_columns: usize,
    pub coerced_year_cells: usize,
}

/// Column headers produced as export artifacts: `Unnamed: 0` style names
/// from round-tripped spreadsheets, or blank index headers.
fn is_artifact_column(header: &str) -> bool {
    let h = header.trim();
    h.is_empty() || h.to_ascii_lowercase().starts_with("unnamed")
}

fn typed_cell(raw: &str) -> Value {
    if is_missing_marker(raw) {
        Value::Missing
    } else if let Some(n) = parse_f64_safe(raw) {
        Value::Number(n)
    } else {
        Value::Text(raw.trim().to_string())
    }
}

/// Read the CSV at `path` into a typed [`Dataset`], dropping artifact
/// columns and normalizing the `Year` column where safe.
pub fn load_dataset(path: &Path) -> Result<(Dataset, LoadReport), ReportError> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_path(path)?;

    let headers = rdr.headers()?.clone();
    // Indices of the columns we keep, in original order.
    let kept: Vec<usize> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| !is_artifact_column(h))
        .map(|(i, _)| i)
        .collect();
    let dropped_columns = headers.len() - kept.len();
    let columns: Vec<String> = kept
        .iter()
        .map(|&i| headers[i].trim().to_string())
        .collect();

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let row: Vec<Value> = kept
            .iter()
            .map(|&i| record.get(i).map_or(Value::Missing, typed_cell))
            .collect();
        rows.push(row);
    }

    let mut dataset = Dataset { columns, rows };
    let coerced_year_cells = normalize_year_column(&mut dataset);

    let report = LoadReport {
        total_rows: dataset.rows.len(),
        dropped_columns,
        coerced_year_cells,
    };
    Ok((dataset, report))
}

/// Best-effort `Year` cleanup: text cells that parse numerically become
/// numbers; everything that fails to parse is left untouched. Returns how
/// many cells were coerced. Never fails.
fn normalize_year_column(dataset: &mut Dataset) -> usize {
    let Some(idx) = dataset.column_index("Year") else {
        return 0;
    };
    let mut coerced = 0usize;
    for row in &mut dataset.rows {
        let Some(cell) = row.get_mut(idx) else {
            continue;
        };
        if let Value::Text(s) = cell {
            if let Some(n) = parse_f64_safe(s) {
                *cell = Value::Number(n);
                coerced += 1;
            }
        }
    }
    coerced
}

// Grouped and overall aggregation: everything between the cleaned dataset
// and the tables written to the workbook.
use crate::types::{Dataset, ReportTables, SheetTable, Value};
use crate::util::{mean, quantile_sorted, sorted, std_dev};
use std::cmp::Ordering;
use std::collections::HashMap;

pub const YEAR_COLUMN: &str = "Year";
pub const WIND_COLUMN: &str = "Wind";
pub const TEMPERATURE_COLUMN: &str = "Temperature";
pub const PRECIPITATION_COLUMN: &str = "Precipitation_mm";
pub const LABEL_COLUMN: &str = "Label";

const NO_YEAR_MESSAGE: &str = "No 'Year' column available";

/// Build every summary table for the workbook in one pass.
pub fn build_tables(dataset: &Dataset) -> ReportTables {
    let groups = year_groups(dataset);

    let (wind, temperature, precipitation) = match &groups {
        Some(groups) => (
            stat_summary(dataset, groups, WIND_COLUMN),
            stat_summary(dataset, groups, TEMPERATURE_COLUMN),
            sum_summary(dataset, groups, PRECIPITATION_COLUMN),
        ),
        None => (
            SheetTable::placeholder(NO_YEAR_MESSAGE),
            SheetTable::placeholder(NO_YEAR_MESSAGE),
            SheetTable::placeholder(NO_YEAR_MESSAGE),
        ),
    };

    ReportTables {
        wind,
        temperature,
        precipitation,
        statistics: describe(dataset),
        missing: missing_counts(dataset),
        labels: label_counts(dataset),
    }
}

/// Rows grouped by their `Year` cell, ordered ascending by year. Rows with
/// a missing year are left out, the way a groupby drops null keys.
/// `None` when the dataset has no `Year` column at all.
pub(crate) fn year_groups(dataset: &Dataset) -> Option<Vec<(Value, Vec<usize>)>> {
    let idx = dataset.column_index(YEAR_COLUMN)?;
    let mut map: HashMap<String, (Value, Vec<usize>)> = HashMap::new();
    for (row_no, cell) in dataset.column_values(idx).enumerate() {
        if cell.is_missing() {
            continue;
        }
        map.entry(cell.render())
            .or_insert_with(|| (cell.clone(), Vec::new()))
            .1
            .push(row_no);
    }
    let mut groups: Vec<(Value, Vec<usize>)> = map.into_values().collect();
    groups.sort_by(|a, b| compare_keys(&a.0, &b.0));
    Some(groups)
}

/// Numeric keys sort numerically and before text keys; text sorts
/// lexically. Keeps per-year sheets deterministic for odd inputs.
fn compare_keys(a: &Value, b: &Value) -> Ordering {
    match (a.as_number(), b.as_number()) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.render().cmp(&b.render()),
    }
}

/// Numeric cells of one column restricted to the given rows.
pub(crate) fn numeric_cells(dataset: &Dataset, col: usize, row_indices: &[usize]) -> Vec<f64> {
    row_indices
        .iter()
        .filter_map(|&r| dataset.rows[r].get(col).and_then(Value::as_number))
        .collect()
}

fn number_or_missing(n: Option<f64>) -> Value {
    n.map_or(Value::Missing, Value::Number)
}

/// Per-year Mean/Max/Min of one metric column. A dataset without the
/// metric yields the headers and no rows; a year with no numeric cells
/// yields blank stat cells.
fn stat_summary(dataset: &Dataset, groups: &[(Value, Vec<usize>)], metric: &str) -> SheetTable {
    let mut table = SheetTable::new(vec![
        YEAR_COLUMN.to_string(),
        "Mean".to_string(),
        "Max".to_string(),
        "Min".to_string(),
    ]);
    let Some(col) = dataset.column_index(metric) else {
        return table;
    };
    for (year, row_indices) in groups {
        let values = numeric_cells(dataset, col, row_indices);
        let max = values.iter().copied().fold(f64::MIN, f64::max);
        let min = values.iter().copied().fold(f64::MAX, f64::min);
        table.rows.push(vec![
            year.clone(),
            number_or_missing(mean(&values)),
            number_or_missing((!values.is_empty()).then_some(max)),
            number_or_missing((!values.is_empty()).then_some(min)),
        ]);
    }
    table
}

/// Per-year Total of one metric column, headers-only when the column is
/// absent so the sheet still exists.
fn sum_summary(dataset: &Dataset, groups: &[(Value, Vec<usize>)], metric: &str) -> SheetTable {
    let mut table = SheetTable::new(vec![YEAR_COLUMN.to_string(), "Total".to_string()]);
    let Some(col) = dataset.column_index(metric) else {
        return table;
    };
    for (year, row_indices) in groups {
        let total: f64 = numeric_cells(dataset, col, row_indices).iter().sum();
        table
            .rows
            .push(vec![year.clone(), Value::Number(total)]);
    }
    table
}

/// Frequency counts of the label column, descending by count then
/// ascending by label. `None` when the column is absent.
fn label_counts(dataset: &Dataset) -> Option<SheetTable> {
    let col = dataset.column_index(LABEL_COLUMN)?;
    let mut counts: HashMap<String, usize> = HashMap::new();
    for cell in dataset.column_values(col) {
        if cell.is_missing() {
            continue;
        }
        *counts.entry(cell.render()).or_insert(0) += 1;
    }
    let mut entries: Vec<(String, usize)> = counts.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let mut table = SheetTable::new(vec![LABEL_COLUMN.to_string(), "Count".to_string()]);
    for (label, count) in entries {
        table
            .rows
            .push(vec![Value::Text(label), Value::Number(count as f64)]);
    }
    Some(table)
}

/// Missing-cell count per column, in original column order.
fn missing_counts(dataset: &Dataset) -> SheetTable {
    let mut table = SheetTable::new(vec!["Column".to_string(), "MissingCount".to_string()]);
    for (idx, name) in dataset.columns.iter().enumerate() {
        let missing = dataset.column_values(idx).filter(|v| v.is_missing()).count();
        table.rows.push(vec![
            Value::Text(name.clone()),
            Value::Number(missing as f64),
        ]);
    }
    table
}

/// Whether a column should get numeric descriptive statistics: at least
/// one numeric cell and no text cells. All-missing columns count as
/// numeric with a zero count, like an all-null float column.
fn is_numeric_column(dataset: &Dataset, idx: usize) -> bool {
    let mut saw_text = false;
    for cell in dataset.column_values(idx) {
        if matches!(cell, Value::Text(_)) {
            saw_text = true;
            break;
        }
    }
    !saw_text
}

/// Full descriptive statistics, transposed so each original column becomes
/// one row. Numeric columns get Count/Mean/Std/Min/quartiles/Max;
/// categorical columns get Count/Unique/Top/Freq. The header set adapts to
/// which kinds of columns exist; cells that do not apply stay blank.
fn describe(dataset: &Dataset) -> SheetTable {
    let numeric: Vec<bool> = (0..dataset.columns.len())
        .map(|i| is_numeric_column(dataset, i))
        .collect();
    let any_numeric = numeric.iter().any(|&b| b);
    let any_categorical = numeric.iter().any(|&b| !b);

    let mut headers = vec!["Column".to_string(), "Count".to_string()];
    if any_categorical {
        headers.extend(["Unique".to_string(), "Top".to_string(), "Freq".to_string()]);
    }
    if any_numeric || !any_categorical {
        headers.extend([
            "Mean".to_string(),
            "Std".to_string(),
            "Min".to_string(),
            "25%".to_string(),
            "50%".to_string(),
            "75%".to_string(),
            "Max".to_string(),
        ]);
    }
    let mut table = SheetTable::new(headers);

    for (idx, name) in dataset.columns.iter().enumerate() {
        let mut row = vec![Value::Text(name.clone())];
        if numeric[idx] {
            let values: Vec<f64> = dataset
                .column_values(idx)
                .filter_map(Value::as_number)
                .collect();
            row.push(Value::Number(values.len() as f64));
            if any_categorical {
                row.extend([Value::Missing, Value::Missing, Value::Missing]);
            }
            let s = sorted(&values);
            row.push(number_or_missing(mean(&values)));
            row.push(number_or_missing(std_dev(&values)));
            row.push(number_or_missing(s.first().copied()));
            row.push(number_or_missing(quantile_sorted(&s, 0.25)));
            row.push(number_or_missing(quantile_sorted(&s, 0.5)));
            row.push(number_or_missing(quantile_sorted(&s, 0.75)));
            row.push(number_or_missing(s.last().copied()));
        } else {
            // Categorical: count non-missing, distinct values, and the most
            // frequent value with its frequency (first occurrence wins ties).
            let mut counts: HashMap<String, usize> = HashMap::new();
            let mut first_seen: HashMap<String, usize> = HashMap::new();
            let mut total = 0usize;
            for (pos, cell) in dataset.column_values(idx).enumerate() {
                if cell.is_missing() {
                    continue;
                }
                total += 1;
                let key = cell.render();
                first_seen.entry(key.clone()).or_insert(pos);
                *counts.entry(key).or_insert(0) += 1;
            }
            let top = counts
                .iter()
                .max_by(|a, b| {
                    a.1.cmp(b.1)
                        .then_with(|| first_seen[b.0].cmp(&first_seen[a.0]))
                })
                .map(|(k, &c)| (k.clone(), c));
            row.push(Value::Number(total as f64));
            row.push(Value::Number(counts.len() as f64));
            match top {
                Some((label, freq)) => {
                    row.push(Value::Text(label));
                    row.push(Value::Number(freq as f64));
                }
                None => {
                    row.push(Value::Missing);
                    row.push(Value::Missing);
                }
            }
            if any_numeric {
                row.extend(std::iter::repeat(Value::Missing).take(7));
            }
        }
        table.rows.push(row);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(columns: &[&str], rows: Vec<Vec<Value>>) -> Dataset {
        Dataset {
            columns: columns.iter().map(|s| s.to_string()).collect(),
            rows,
        }
    }

    fn num(n: f64) -> Value {
        Value::Number(n)
    }

    fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    #[test]
    fn wind_summary_per_year() {
        let ds = dataset(
            &["Year", "Wind"],
            vec![
                vec![num(2020.0), num(5.0)],
                vec![num(2020.0), num(7.0)],
                vec![num(2021.0), num(10.0)],
            ],
        );
        let tables = build_tables(&ds);
        assert_eq!(tables.wind.columns, vec!["Year", "Mean", "Max", "Min"]);
        assert_eq!(
            tables.wind.rows[0],
            vec![num(2020.0), num(6.0), num(7.0), num(5.0)]
        );
        assert_eq!(
            tables.wind.rows[1],
            vec![num(2021.0), num(10.0), num(10.0), num(10.0)]
        );
    }

    #[test]
    fn years_sort_ascending_even_when_input_is_not() {
        let ds = dataset(
            &["Year", "Wind"],
            vec![
                vec![num(2022.0), num(1.0)],
                vec![num(2020.0), num(2.0)],
                vec![num(2021.0), num(3.0)],
            ],
        );
        let tables = build_tables(&ds);
        let years: Vec<Value> = tables.wind.rows.iter().map(|r| r[0].clone()).collect();
        assert_eq!(years, vec![num(2020.0), num(2021.0), num(2022.0)]);
    }

    #[test]
    fn missing_year_column_yields_placeholders() {
        let ds = dataset(&["Wind"], vec![vec![num(5.0)]]);
        let tables = build_tables(&ds);
        for table in [&tables.wind, &tables.temperature, &tables.precipitation] {
            assert_eq!(table.columns, vec!["Message"]);
            assert_eq!(table.rows, vec![vec![text("No 'Year' column available")]]);
        }
    }

    #[test]
    fn absent_precipitation_gives_headers_only() {
        let ds = dataset(&["Year", "Wind"], vec![vec![num(2020.0), num(5.0)]]);
        let tables = build_tables(&ds);
        assert_eq!(tables.precipitation.columns, vec!["Year", "Total"]);
        assert!(tables.precipitation.rows.is_empty());
    }

    #[test]
    fn precipitation_totals_sum_per_year() {
        let ds = dataset(
            &["Year", "Precipitation_mm"],
            vec![
                vec![num(2020.0), num(10.0)],
                vec![num(2020.0), num(15.5)],
                vec![num(2021.0), num(3.0)],
            ],
        );
        let tables = build_tables(&ds);
        assert_eq!(tables.precipitation.rows[0], vec![num(2020.0), num(25.5)]);
        assert_eq!(tables.precipitation.rows[1], vec![num(2021.0), num(3.0)]);
    }

    #[test]
    fn label_counts_sorted_by_count_then_name() {
        let ds = dataset(
            &["Label"],
            vec![
                vec![text("Storm")],
                vec![text("Calm")],
                vec![text("Storm")],
                vec![text("Breeze")],
                vec![Value::Missing],
            ],
        );
        let tables = build_tables(&ds);
        let labels = tables.labels.unwrap();
        assert_eq!(labels.rows[0], vec![text("Storm"), num(2.0)]);
        assert_eq!(labels.rows[1], vec![text("Breeze"), num(1.0)]);
        assert_eq!(labels.rows[2], vec![text("Calm"), num(1.0)]);
    }

    #[test]
    fn no_label_column_means_no_label_table() {
        let ds = dataset(&["Year"], vec![vec![num(2020.0)]]);
        assert!(build_tables(&ds).labels.is_none());
    }

    #[test]
    fn missing_counts_cover_every_column() {
        let ds = dataset(
            &["Year", "Wind"],
            vec![
                vec![num(2020.0), Value::Missing],
                vec![Value::Missing, num(4.0)],
                vec![num(2021.0), Value::Missing],
            ],
        );
        let tables = build_tables(&ds);
        assert_eq!(tables.missing.rows[0], vec![text("Year"), num(1.0)]);
        assert_eq!(tables.missing.rows[1], vec![text("Wind"), num(2.0)]);
    }

    #[test]
    fn describe_mixes_numeric_and_categorical() {
        let ds = dataset(
            &["Wind", "Label"],
            vec![
                vec![num(1.0), text("a")],
                vec![num(2.0), text("a")],
                vec![num(3.0), text("b")],
                vec![num(4.0), Value::Missing],
            ],
        );
        let tables = build_tables(&ds);
        let stats = &tables.statistics;
        assert_eq!(
            stats.columns,
            vec![
                "Column", "Count", "Unique", "Top", "Freq", "Mean", "Std", "Min", "25%", "50%",
                "75%", "Max"
            ]
        );
        // Wind row: numeric stats filled, categorical blanks.
        let wind = &stats.rows[0];
        assert_eq!(wind[0], text("Wind"));
        assert_eq!(wind[1], num(4.0));
        assert_eq!(wind[2], Value::Missing);
        assert_eq!(wind[5], num(2.5)); // mean
        assert_eq!(wind[7], num(1.0)); // min
        assert_eq!(wind[8], num(1.75)); // 25%
        assert_eq!(wind[11], num(4.0)); // max
        // Label row: categorical stats filled, numeric blanks.
        let label = &stats.rows[1];
        assert_eq!(label[1], num(3.0));
        assert_eq!(label[2], num(2.0));
        assert_eq!(label[3], text("a"));
        assert_eq!(label[4], num(2.0));
        assert_eq!(label[5], Value::Missing);
    }

    #[test]
    fn describe_all_numeric_has_no_categorical_headers() {
        let ds = dataset(&["Wind"], vec![vec![num(1.0)], vec![num(3.0)]]);
        let stats = build_tables(&ds).statistics;
        assert_eq!(
            stats.columns,
            vec!["Column", "Count", "Mean", "Std", "Min", "25%", "50%", "75%", "Max"]
        );
    }

    #[test]
    fn year_with_no_numeric_metric_gets_blank_stats() {
        let ds = dataset(
            &["Year", "Wind"],
            vec![vec![num(2020.0), Value::Missing]],
        );
        let tables = build_tables(&ds);
        assert_eq!(
            tables.wind.rows[0],
            vec![num(2020.0), Value::Missing, Value::Missing, Value::Missing]
        );
    }
}

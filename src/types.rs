// Core in-memory shapes: the loaded dataset and the generic summary table
// that every sheet is built from.
//
// The input CSV has a loosely defined schema (extra columns are fine, some
// expected columns may be absent), so rows are kept as positional cells
// rather than deserialized into a fixed struct.

/// One CSV cell, typed at load time.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    Missing,
}

impl Value {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Render the cell the way it should appear in a console preview or a
    /// width calculation. Whole numbers drop their fractional part so a
    /// coerced year shows as `2023`, not `2023.0`.
    pub fn render(&self) -> String {
        match self {
            Value::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            Value::Text(s) => s.clone(),
            Value::Missing => String::new(),
        }
    }
}

/// The cleaned input data: ordered column names plus row-major cells.
/// Loaded once and read-only afterwards.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Dataset {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Iterate one column top to bottom. Rows shorter than the header
    /// (flexible CSV input) yield `Missing` for the absent cells.
    pub fn column_values(&self, idx: usize) -> impl Iterator<Item = &Value> {
        self.rows
            .iter()
            .map(move |row| row.get(idx).unwrap_or(&Value::Missing))
    }
}

/// An ordered table destined for one worksheet: header names plus cell rows.
/// Row and column order here is exactly the order written to the sheet.
#[derive(Debug, Clone)]
pub struct SheetTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl SheetTable {
    pub fn new(columns: Vec<String>) -> Self {
        SheetTable {
            columns,
            rows: Vec::new(),
        }
    }

    /// The single-row stand-in used when the dataset has no `Year` column
    /// so the per-year sheets still exist.
    pub fn placeholder(message: &str) -> Self {
        SheetTable {
            columns: vec!["Message".to_string()],
            rows: vec![vec![Value::Text(message.to_string())]],
        }
    }
}

/// All per-run summary tables, handed from the aggregator to the writer.
#[derive(Debug)]
pub struct ReportTables {
    pub wind: SheetTable,
    pub temperature: SheetTable,
    pub precipitation: SheetTable,
    pub statistics: SheetTable,
    pub missing: SheetTable,
    /// Only present when the dataset has a `Label` column.
    pub labels: Option<SheetTable>,
}

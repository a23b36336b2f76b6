use crate::types::{SheetTable, Value};
use tabled::{builder::Builder, settings::Style};

/// Print a markdown preview of a summary table, truncated to `max_rows`.
pub fn preview_table(title: &str, table: &SheetTable, max_rows: usize) {
    println!("{}", title);
    if table.rows.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let mut builder = Builder::default();
    builder.push_record(table.columns.clone());
    for row in table.rows.iter().take(max_rows) {
        builder.push_record(row.iter().map(Value::render));
    }
    let rendered = builder.build().with(Style::markdown()).to_string();
    println!("{}\n", rendered);
}

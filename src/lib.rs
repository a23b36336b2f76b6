// weather_report: one-shot CSV to styled multi-sheet Excel report.
//
// Flow: resolve paths -> load and clean the CSV -> aggregate summary
// tables -> render optional trend charts -> write, style, and save the
// workbook -> drop the temporary chart directory.
#[cfg(feature = "charts")]
mod charts;
mod console;
mod error;
mod loader;
mod paths;
mod reports;
mod types;
mod util;
mod workbook;

pub use error::ReportError;
pub use paths::DEFAULT_OUTPUT_NAME;
pub use types::{Dataset, ReportTables, SheetTable, Value};

use std::path::PathBuf;
use tracing::info;
#[cfg(feature = "charts")]
use tracing::warn;

/// Options for one report generation run.
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    /// Input CSV. May be `None` only in dialog mode.
    pub input: Option<PathBuf>,
    /// Output workbook path; defaults next to the input when absent.
    pub output: Option<PathBuf>,
    /// Pick paths through native file dialogs (`dialogs` feature).
    pub use_file_dialog: bool,
    /// Render and embed trend charts (`charts` feature).
    pub embed_charts: bool,
}

/// Generate the report end to end and return the resolved output path.
///
/// Each call is independent; runs with distinct output paths do not share
/// state. Styling and charting problems degrade to a still-valid workbook
/// and are only logged; the errors in [`ReportError`] are the fatal ones.
pub fn generate_excel_report(options: &ReportOptions) -> Result<PathBuf, ReportError> {
    let (input, output) = paths::resolve_paths(
        options.input.clone(),
        options.output.clone(),
        options.use_file_dialog,
    )?;

    let (dataset, load_report) = loader::load_dataset(&input)?;
    info!(
        rows = load_report.total_rows,
        dropped_columns = load_report.dropped_columns,
        coerced_year_cells = load_report.coerced_year_cells,
        "dataset loaded"
    );
    println!(
        "Processing dataset... ({} rows loaded)",
        util::format_int(load_report.total_rows as i64)
    );

    let tables = reports::build_tables(&dataset);
    console::preview_table("Wind Summary", &tables.wind, 5);

    // Charts are best-effort: rendered into a temporary directory that the
    // drop at the end of this function removes on every exit path.
    #[cfg(feature = "charts")]
    let rendered = if options.embed_charts && dataset.has_column(reports::YEAR_COLUMN) {
        match charts::render_trend_charts(&dataset) {
            Ok(r) => Some(r),
            Err(e) => {
                warn!(error = %e, "failed to create charts, continuing without them");
                None
            }
        }
    } else {
        None
    };
    #[cfg(feature = "charts")]
    let chart_images: &[PathBuf] = rendered.as_ref().map_or(&[], |r| r.images.as_slice());
    #[cfg(not(feature = "charts"))]
    let chart_images: &[PathBuf] = &[];

    workbook::write_report(&dataset, &tables, chart_images, &output)?;

    println!("Excel report generated: {}", output.display());
    Ok(output)
}

// Input/output path resolution, with optional native file dialogs behind
// the `dialogs` feature.
use crate::error::ReportError;
use std::path::PathBuf;

pub const DEFAULT_OUTPUT_NAME: &str = "Final_Report.xlsx";

/// Resolve the input CSV and output workbook paths.
///
/// Dialog mode needs the `dialogs` feature compiled in; requesting it
/// without is a configuration error, reported before any path checks. The
/// input must exist; a missing output falls back to the default name next
/// to the input.
pub fn resolve_paths(
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    use_file_dialog: bool,
) -> Result<(PathBuf, PathBuf), ReportError> {
    if use_file_dialog && !cfg!(feature = "dialogs") {
        return Err(ReportError::GuiUnavailable);
    }

    let input = match input {
        Some(p) => p,
        None if use_file_dialog => pick_input_file()?,
        None => return Err(ReportError::MissingInput),
    };
    if !input.exists() {
        return Err(ReportError::InputNotFound(input));
    }

    let output = match output {
        Some(p) => p,
        None if use_file_dialog => pick_output_file()?,
        None => input.with_file_name(DEFAULT_OUTPUT_NAME),
    };

    Ok((input, output))
}

#[cfg(feature = "dialogs")]
fn pick_input_file() -> Result<PathBuf, ReportError> {
    rfd::FileDialog::new()
        .set_title("Select CSV File")
        .add_filter("CSV files", &["csv"])
        .add_filter("All files", &["*"])
        .pick_file()
        .ok_or(ReportError::NoInputSelected)
}

#[cfg(feature = "dialogs")]
fn pick_output_file() -> Result<PathBuf, ReportError> {
    let mut path = rfd::FileDialog::new()
        .set_title("Save Excel Report As")
        .add_filter("Excel Workbook", &["xlsx"])
        .save_file()
        .ok_or(ReportError::NoOutputSelected)?;
    if path.extension().is_none() {
        path.set_extension("xlsx");
    }
    Ok(path)
}

// Unreachable when dialogs are compiled out; resolve_paths bails first.
#[cfg(not(feature = "dialogs"))]
fn pick_input_file() -> Result<PathBuf, ReportError> {
    Err(ReportError::GuiUnavailable)
}

#[cfg(not(feature = "dialogs"))]
fn pick_output_file() -> Result<PathBuf, ReportError> {
    Err(ReportError::GuiUnavailable)
}

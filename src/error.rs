use std::path::PathBuf;
use thiserror::Error;

/// Fatal error kinds for report generation.
///
/// Only these abort a run. Styling and charting problems are handled where
/// they occur (logged and skipped) and never surface here.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("csv path must be provided (or enable file dialogs)")]
    MissingInput,

    #[error("CSV not found: {0}")]
    InputNotFound(PathBuf),

    #[error("no CSV selected")]
    NoInputSelected,

    #[error("no save location selected")]
    NoOutputSelected,

    #[error("file dialogs unavailable: rebuild with the `dialogs` feature or pass paths directly")]
    GuiUnavailable,

    #[error("{0}")]
    Csv(#[from] csv::Error),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

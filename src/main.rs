use clap::{ArgAction, Parser, ValueHint};
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;
use weather_report::{generate_excel_report, ReportOptions};

#[derive(Parser, Debug)]
#[command(author, version, about = "CSV to styled multi-sheet Excel report", long_about = None)]
struct Cli {
    /// Input CSV file.
    #[arg(value_hint = ValueHint::FilePath)]
    input: Option<PathBuf>,

    /// Output workbook path. Defaults to a timestamped Final_Report.xlsx
    /// next to the input.
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,

    /// Pick input and output through native file dialogs.
    #[arg(long, action = ArgAction::SetTrue)]
    dialogs: bool,

    /// Skip chart rendering and embedding.
    #[arg(long, action = ArgAction::SetTrue)]
    no_charts: bool,

    /// Verbose logging.
    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,
}

/// Standalone runs stamp the default output name so repeated invocations
/// do not overwrite each other. In dialog mode the save dialog decides.
fn default_output(input: Option<&Path>, dialogs: bool) -> Option<PathBuf> {
    if dialogs {
        return None;
    }
    let input = input?;
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    Some(input.with_file_name(format!("Final_Report_{}.xlsx", stamp)))
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let output = cli
        .output
        .or_else(|| default_output(cli.input.as_deref(), cli.dialogs));
    let options = ReportOptions {
        input: cli.input,
        output,
        use_file_dialog: cli.dialogs,
        embed_charts: !cli.no_charts,
    };

    if let Err(err) = generate_excel_report(&options) {
        eprintln!("ERROR: {}", err);
        process::exit(1);
    }
}

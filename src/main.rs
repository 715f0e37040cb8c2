use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};

use kira_popsankey::input::{InputError, WorkbookSource, load_workbook};
use kira_popsankey::logging::init_tracing;
use kira_popsankey::pipeline::stage1_validate::run_stage1;
use kira_popsankey::pipeline::stage4_report::{ReportError, ReportFormat, write_reports};
use kira_popsankey::pipeline::{ImportError, run_import};
use kira_popsankey::report::json::render_validation_json;
use kira_popsankey::report::text::render_validation_text;

const EXIT_INVALID: u8 = 2;

#[derive(Debug, Parser)]
#[command(
    name = "kira-popsankey",
    version,
    about = "Validate hierarchical cell-population sheets and derive the Sankey tree and colors."
)]
struct Cli {
    /// Debug logging (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check the input sheets and print every defect found.
    Validate {
        #[command(flatten)]
        input: InputArgs,

        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Validate, build the population tree, assign colors and write outputs.
    Run {
        #[command(flatten)]
        input: InputArgs,

        /// Output directory (created if missing).
        #[arg(long)]
        out: PathBuf,

        #[arg(long, value_enum, default_value_t = OutputFormat::Both)]
        format: OutputFormat,
    },
}

#[derive(Debug, Args)]
struct InputArgs {
    /// JSON workbook `{ "meta": [..], "markers": [..] }`, optionally gzipped.
    #[arg(long, conflicts_with_all = ["meta", "markers"])]
    workbook: Option<PathBuf>,

    /// `meta` sheet as TSV/CSV (optionally gzipped).
    #[arg(long, requires = "markers")]
    meta: Option<PathBuf>,

    /// `markers` sheet as TSV/CSV (optionally gzipped).
    #[arg(long, requires = "meta")]
    markers: Option<PathBuf>,
}

impl InputArgs {
    fn source(&self) -> Result<WorkbookSource<'_>, CliError> {
        match (&self.workbook, &self.meta, &self.markers) {
            (Some(path), _, _) => Ok(WorkbookSource::Json(path.as_path())),
            (None, Some(meta), Some(markers)) => Ok(WorkbookSource::Delimited {
                meta: meta.as_path(),
                markers: markers.as_path(),
            }),
            _ => Err(CliError::Usage(
                "use --workbook, or --meta together with --markers".to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
    Both,
}

impl From<OutputFormat> for ReportFormat {
    fn from(value: OutputFormat) -> Self {
        match value {
            OutputFormat::Json => ReportFormat::Json,
            OutputFormat::Text => ReportFormat::Text,
            OutputFormat::Both => ReportFormat::Both,
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match run(cli) {
        Ok(code) => code,
        Err(CliError::Import(ImportError::Invalid(report))) => {
            eprint!("{}", render_validation_text(&report));
            ExitCode::from(EXIT_INVALID)
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, CliError> {
    match cli.command {
        Command::Validate { input, json } => {
            let workbook = load_workbook(input.source()?)?;
            let report = run_stage1(&workbook);
            if json {
                print!("{}", render_validation_json(&report)?);
            } else {
                print!("{}", render_validation_text(&report));
            }
            Ok(if report.valid {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(EXIT_INVALID)
            })
        }
        Command::Run { input, out, format } => {
            let workbook = load_workbook(input.source()?)?;
            let output = run_import(&workbook)?;
            let written = write_reports(&output, &resolve_output_dir(&out), format.into())?;
            tracing::info!("{} file(s) written", written.len());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn resolve_output_dir(base: &Path) -> PathBuf {
    if base.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        base.to_path_buf()
    }
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;

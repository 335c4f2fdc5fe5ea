use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use std::{
    fs,
    io,
    path::{Path, PathBuf},
    process::ExitCode,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use waterwatch_core::{
    analysis::{self, Assessment},
    extraction::{
        builder::ExtractorBuilder,
        extractor::{ColumnMapping, Extraction, Extractor},
        source::{InputSource, ManualInput, Upload},
    },
    ocr::CommandOcr,
    report::{self, ReportWriter},
};
use waterwatch_schemas::{file_formats::ConfigFile, parameter::Parameter};

mod config;
mod dashboard;
mod plotting;

/// Assess water quality readings against fixed safe ranges.
///
/// Without --file the five readings come from the manual flags, each with a
/// typical default. With --file the readings are
/// extracted from a CSV/Excel/JSON table or an instrument photo.
#[derive(Debug, Parser)]
#[command(name = "waterwatch", version)]
struct Cli {
    /// Upload a CSV, Excel, JSON, PNG or JPEG file instead of entering values.
    #[arg(long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// pH level (0 - 14)
    #[arg(long, conflicts_with = "file", allow_negative_numbers = true)]
    ph: Option<f64>,

    /// Temperature in °C (0 - 50)
    #[arg(long, conflicts_with = "file", allow_negative_numbers = true)]
    temperature: Option<f64>,

    /// Turbidity in NTU (0 - 100)
    #[arg(long, conflicts_with = "file", allow_negative_numbers = true)]
    turbidity: Option<f64>,

    /// Dissolved oxygen in mg/L (0 - 15)
    #[arg(long, conflicts_with = "file", allow_negative_numbers = true)]
    dissolved_oxygen: Option<f64>,

    /// Conductivity in µS/cm (0 - 2000)
    #[arg(long, conflicts_with = "file", allow_negative_numbers = true)]
    conductivity: Option<f64>,

    /// Feed table columns named after a parameter into the analysis.
    #[arg(long)]
    map_columns: bool,

    /// OCR program invoked as `<program> stdin stdout -l <language>`.
    #[arg(long, value_name = "PATH")]
    ocr_program: Option<String>,

    /// Language passed to the OCR program with `-l` (default: eng).
    #[arg(long, value_name = "LANG")]
    ocr_language: Option<String>,

    /// Configuration file (default: ./waterwatch.yaml when present).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write report.csv, report.json and readings.png into a timestamped run directory here.
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn manual_values(&self) -> [(Parameter, Option<f64>); 5] {
        [
            (Parameter::Ph, self.ph),
            (Parameter::Temperature, self.temperature),
            (Parameter::Turbidity, self.turbidity),
            (Parameter::DissolvedOxygen, self.dissolved_oxygen),
            (Parameter::Conductivity, self.conductivity),
        ]
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // One line: the context followed by its causes, `Error reading file: <cause>`.
            eprintln!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = config::load(cli.config.as_deref())?;
    let source = input_source(cli)?;
    let extractor = build_extractor(cli, &config);

    let extraction = extractor.extract(&source).context("Error reading file")?;
    let assessments = analysis::assess_all(&extraction.readings);

    dashboard::render(&mut io::stdout().lock(), &extraction, &assessments)
        .context("Failed to write dashboard")?;

    let output_dir = cli
        .output_dir
        .clone()
        .or_else(|| config.output.directory.as_ref().map(PathBuf::from));
    if let Some(output_dir) = output_dir {
        let run_dir = export_run(&output_dir, &extraction, &assessments)?;
        println!("\nReport written to '{}'", run_dir.display());
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(io::stderr)
        .init();
}

fn input_source(cli: &Cli) -> Result<InputSource> {
    if let Some(path) = &cli.file {
        let upload = Upload::read(path).context("Error reading file")?;
        info!("Processing upload '{}' ({} bytes)", upload.file_name, upload.bytes.len());
        return InputSource::from_upload(upload).context("Error reading file");
    }

    let mut manual = ManualInput::new();
    for (parameter, value) in cli.manual_values() {
        if let Some(value) = value {
            manual = manual
                .with_value(parameter, value)
                .context("Invalid manual reading")?;
        }
    }
    Ok(InputSource::Manual(manual))
}

/// CLI flags take precedence over the configuration file.
fn build_extractor(cli: &Cli, config: &ConfigFile) -> Extractor {
    let ocr = CommandOcr::new(
        cli.ocr_program.clone().unwrap_or_else(|| config.ocr.program.clone()),
        cli.ocr_language.clone().unwrap_or_else(|| config.ocr.language.clone()),
    )
    .with_extra_args(config.ocr.extra_args.clone());

    let column_mapping = if cli.map_columns || config.tabular.map_columns {
        ColumnMapping::HeaderNames
    } else {
        ColumnMapping::Disabled
    };

    ExtractorBuilder::new()
        .with_ocr_engine(ocr)
        .with_column_mapping(column_mapping)
        .build()
}

fn export_run(output_dir: &Path, extraction: &Extraction, assessments: &[Assessment]) -> Result<PathBuf> {
    let run_dir = output_dir.join(format!(
        "assessment_{}",
        chrono::Utc::now().format("%Y%m%d_%H%M%S")
    ));
    fs::create_dir_all(&run_dir)
        .with_context(|| format!("Failed to create output directory: {}", run_dir.display()))?;

    ReportWriter::create(&run_dir.join("report.csv"))?.write_assessments(assessments)?;
    report::write_json(&run_dir.join("report.json"), extraction, assessments)?;

    // Chart rendering depends on system fonts and is best-effort.
    if let Err(e) = plotting::plot_readings(&run_dir.join("readings.png"), assessments) {
        warn!("Could not render readings chart: {:#}", e);
    }
    Ok(run_dir)
}

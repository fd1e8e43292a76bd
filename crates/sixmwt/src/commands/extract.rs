use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use comfy_table::{presets::UTF8_FULL, Table};
use sixmwt_core::batch::{process_paths, BatchOutcome, FileStatus};
use sixmwt_core::export::{
    write_bundle, write_csv, write_parquet, write_records_json, write_xlsx, ColumnLayout,
    ExportSchema,
};
use sixmwt_core::SubjectRecord;
use tracing::info;

use super::load_config;
use crate::inputs::expand_inputs;

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Files, directories or glob patterns
    #[arg(required = true)]
    pub inputs: Vec<String>,
    /// Output file; stdout when omitted (csv and json only)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    pub format: OutputFormat,
    /// Column ordering, overriding the config file
    #[arg(long, value_enum)]
    pub layout: Option<LayoutArg>,
    /// Also write a zip with the table, full records and per-file report
    #[arg(long)]
    pub bundle: Option<PathBuf>,
    /// TOML config; defaults to $SIXMWT_CONFIG
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Csv,
    Parquet,
    Json,
    Xlsx,
}

impl OutputFormat {
    fn is_binary(&self) -> bool {
        matches!(self, OutputFormat::Parquet | OutputFormat::Xlsx)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LayoutArg {
    ByChannel,
    ByBucket,
}

impl From<LayoutArg> for ColumnLayout {
    fn from(value: LayoutArg) -> Self {
        match value {
            LayoutArg::ByChannel => ColumnLayout::ByChannel,
            LayoutArg::ByBucket => ColumnLayout::ByBucket,
        }
    }
}

pub fn run(args: ExtractArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(layout) = args.layout {
        config.export.layout = layout.into();
    }
    if args.format.is_binary() && args.output.is_none() {
        bail!("parquet and xlsx output need --output");
    }

    let paths = expand_inputs(&args.inputs)?;
    if paths.is_empty() {
        bail!("no input files matched {:?}", args.inputs);
    }

    let outcome = process_paths(&paths, &config);
    let summary = summary_table(&outcome);
    if args.output.is_some() {
        println!("{summary}");
    } else {
        eprintln!("{summary}");
    }

    if outcome.processed_count() == 0 {
        bail!("all {} input files failed", outcome.files.len());
    }

    let records = outcome.records();
    let schema = ExportSchema::for_records(config.export.layout, &records);
    write_table(&args, &schema, &records)?;

    if let Some(bundle) = &args.bundle {
        let file = File::create(bundle)
            .with_context(|| format!("failed to create bundle {}", bundle.display()))?;
        write_bundle(file, &schema, &records, &outcome.reports())
            .with_context(|| format!("failed to write bundle {}", bundle.display()))?;
        info!(path = %bundle.display(), "bundle written");
    }

    info!(
        processed = outcome.processed_count(),
        failed = outcome.failed_count(),
        "extraction finished"
    );
    Ok(())
}

fn write_table(args: &ExtractArgs, schema: &ExportSchema, records: &[SubjectRecord]) -> Result<()> {
    let mut writer = open_output(args.output.as_deref())?;
    match args.format {
        OutputFormat::Csv => {
            let mut df = schema.to_dataframe(records)?;
            write_csv(&mut df, &mut writer)?;
        }
        OutputFormat::Parquet => {
            let mut df = schema.to_dataframe(records)?;
            write_parquet(&mut df, &mut writer)?;
        }
        OutputFormat::Json => write_records_json(records, &mut writer)?,
        OutputFormat::Xlsx => write_xlsx(schema, records, &mut writer)?,
    }
    writer.flush().context("failed to flush output")?;
    Ok(())
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create output {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}

fn summary_table(outcome: &BatchOutcome) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["File", "Status", "Scheme", "Message"]);

    for file in &outcome.files {
        let report = &file.report;
        let status = match report.status {
            FileStatus::Processed => "processed",
            FileStatus::Failed => "failed",
        };
        table.add_row(vec![
            report.path.clone(),
            status.to_string(),
            report
                .scheme
                .map(|scheme| scheme.to_string())
                .unwrap_or_default(),
            report.message.clone().unwrap_or_default(),
        ]);
    }

    table
}

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{presets::UTF8_FULL, Table};
use sixmwt_core::aggregates::Bucket;
use sixmwt_core::batch::process_file;
use sixmwt_core::boundaries::INTERVAL_COUNT;
use sixmwt_core::export::KinematicColumn;
use sixmwt_core::SubjectRecord;

use super::{format_value, load_config};

#[derive(Args, Debug)]
pub struct InspectArgs {
    pub file: PathBuf,
    /// TOML config; defaults to $SIXMWT_CONFIG
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub fn run(args: InspectArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let contents =
        fs::read(&args.file).with_context(|| format!("failed to read {}", args.file.display()))?;
    let path = args.file.display().to_string();
    let record = process_file(&path, &contents, &config)
        .with_context(|| format!("failed to extract {path}"))?;

    println!("Source:  {}", record.source());
    println!("Subject: {} {}", record.surname(), record.name());
    println!(
        "Scheme:  {} (marker column {})",
        record.scheme(),
        record.marker_column()
    );
    println!("\n{}", boundary_table(&record));
    println!("\n{}", kinematics_table(&record));
    println!("\n{}", channel_table(&record));
    Ok(())
}

fn boundary_table(record: &SubjectRecord) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Edge", "Row", "Timestamp", "Distance (m)"]);
    for (position, event) in record.boundaries().events().iter().enumerate() {
        table.add_row(vec![
            (position + 1).to_string(),
            event.row_index.to_string(),
            event.timestamp.clone(),
            format_value(event.distance),
        ]);
    }
    table
}

fn kinematics_table(record: &SubjectRecord) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Measure", "Value"]);
    for column in KinematicColumn::all() {
        table.add_row(vec![
            column.header(),
            format_value(column.value(record.kinematics())),
        ]);
    }
    table
}

fn channel_table(record: &SubjectRecord) -> Table {
    let mut header = vec!["Channel".to_string()];
    header.extend((1..=INTERVAL_COUNT).map(|minute| minute.to_string()));
    header.extend(Bucket::ALL.iter().map(|bucket| bucket.to_string()));

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(header);
    for channel in record.channels() {
        let mut row = vec![channel.name().to_string()];
        row.extend(channel.intervals().iter().map(|value| format_value(*value)));
        row.extend(
            Bucket::ALL
                .iter()
                .map(|bucket| format_value(channel.aggregates().get(*bucket))),
        );
        table.add_row(row);
    }
    table
}

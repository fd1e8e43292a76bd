use std::collections::HashSet;
use std::io::{Seek, Write};

use chrono::Utc;
use polars::io::parquet::write::{ParquetCompression, ParquetWriter, StatisticsOptions};
use polars::prelude::{
    Column, CsvWriter, DataFrame, NamedFrom, PlSmallStr, PolarsError, SerWriter, Series,
};
use rust_xlsxwriter::{ColNum, RowNum, Workbook, XlsxError};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::aggregates::Bucket;
use crate::batch::FileReport;
use crate::boundaries::{BOUNDARY_COUNT, INTERVAL_COUNT};
use crate::kinematics::Kinematics;
use crate::record::{ChannelSummary, SubjectRecord};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Polars operation failed: {0}")]
    Polars(#[from] PolarsError),
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("ZIP operation failed: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("XLSX operation failed: {0}")]
    Xlsx(#[from] XlsxError),
    #[error("export column '{0}' appears more than once")]
    DuplicateColumn(String),
    #[error("export does not fit in a worksheet")]
    SheetBounds,
}

const XLSX_SHEET_NAME: &str = "6MWT";

/// Ordering of the per-channel columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnLayout {
    /// `{channel}_1..6` then `{channel}_{bucket}`, channel by channel.
    #[default]
    ByChannel,
    /// All channels for minute 1, then minute 2, ..., then each bucket.
    ByBucket,
}

/// A per-channel value: one of the six minutes or an aggregate bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Minute(usize),
    Bucket(Bucket),
}

impl Slot {
    pub fn all() -> Vec<Slot> {
        (0..INTERVAL_COUNT)
            .map(Slot::Minute)
            .chain(Bucket::ALL.into_iter().map(Slot::Bucket))
            .collect()
    }

    fn suffix(&self) -> String {
        match self {
            Slot::Minute(index) => (index + 1).to_string(),
            Slot::Bucket(bucket) => bucket.as_str().to_string(),
        }
    }

    fn value(&self, summary: &ChannelSummary) -> Option<f64> {
        match self {
            Slot::Minute(index) => summary.intervals().get(*index).copied().flatten(),
            Slot::Bucket(bucket) => summary.aggregates().get(*bucket),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KinematicColumn {
    MinuteDistance(usize),
    PairedDistance(usize),
    TripledDistance(usize),
    TotalDistance,
    TotalSpeed,
    TwoMinuteDistance,
    TwoMinuteSpeed,
    DeclineVsMinute2,
    DeclineVsMinute3,
    DeclineVsMinute1,
}

const PAIRED_HEADERS: [&str; 3] = ["SixMWT_m_first2", "SixMWT_m_second2", "SixMWT_m_third2"];
const TRIPLED_HEADERS: [&str; 2] = ["SixMWT_m_first3", "SixMWT_m_last3"];

impl KinematicColumn {
    pub fn all() -> Vec<KinematicColumn> {
        use KinematicColumn::*;
        let mut columns: Vec<KinematicColumn> = (0..INTERVAL_COUNT).map(MinuteDistance).collect();
        columns.extend((0..PAIRED_HEADERS.len()).map(PairedDistance));
        columns.extend((0..TRIPLED_HEADERS.len()).map(TripledDistance));
        columns.extend([
            TotalDistance,
            TotalSpeed,
            TwoMinuteDistance,
            TwoMinuteSpeed,
            DeclineVsMinute2,
            DeclineVsMinute3,
            DeclineVsMinute1,
        ]);
        columns
    }

    pub fn header(&self) -> String {
        match self {
            KinematicColumn::MinuteDistance(index) => format!("SixMWT_m_{}", index + 1),
            KinematicColumn::PairedDistance(index) => PAIRED_HEADERS[*index].to_string(),
            KinematicColumn::TripledDistance(index) => TRIPLED_HEADERS[*index].to_string(),
            KinematicColumn::TotalDistance => "SixMWT_m_tot".to_string(),
            KinematicColumn::TotalSpeed => "SixMWT_km_h_tot".to_string(),
            KinematicColumn::TwoMinuteDistance => "TwoMWT_m_tot".to_string(),
            KinematicColumn::TwoMinuteSpeed => "TwoMWT_km_h_tot".to_string(),
            KinematicColumn::DeclineVsMinute2 => "DWI_6-2".to_string(),
            KinematicColumn::DeclineVsMinute3 => "DWI_6-3".to_string(),
            KinematicColumn::DeclineVsMinute1 => "DWI_6-1".to_string(),
        }
    }

    pub fn value(&self, kinematics: &Kinematics) -> Option<f64> {
        match self {
            KinematicColumn::MinuteDistance(index) => kinematics.minute_distances[*index],
            KinematicColumn::PairedDistance(index) => kinematics.paired_distances[*index],
            KinematicColumn::TripledDistance(index) => kinematics.tripled_distances[*index],
            KinematicColumn::TotalDistance => kinematics.total_distance,
            KinematicColumn::TotalSpeed => kinematics.total_speed_kmh,
            KinematicColumn::TwoMinuteDistance => kinematics.two_minute_distance,
            KinematicColumn::TwoMinuteSpeed => kinematics.two_minute_speed_kmh,
            KinematicColumn::DeclineVsMinute2 => kinematics.decline_vs_minute2,
            KinematicColumn::DeclineVsMinute3 => kinematics.decline_vs_minute3,
            KinematicColumn::DeclineVsMinute1 => kinematics.decline_vs_minute1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSpec {
    Edge(usize),
    Surname,
    Name,
    Id,
    Kinematic(KinematicColumn),
    Channel { channel: String, slot: Slot },
}

impl ColumnSpec {
    pub fn header(&self) -> String {
        match self {
            ColumnSpec::Edge(index) => format!("Edge_{}", index + 1),
            ColumnSpec::Surname => "Surname".to_string(),
            ColumnSpec::Name => "Name".to_string(),
            ColumnSpec::Id => "ID".to_string(),
            ColumnSpec::Kinematic(column) => column.header(),
            ColumnSpec::Channel { channel, slot } => format!("{channel}_{}", slot.suffix()),
        }
    }

    fn is_text(&self) -> bool {
        matches!(
            self,
            ColumnSpec::Edge(_) | ColumnSpec::Surname | ColumnSpec::Name | ColumnSpec::Id
        )
    }

    /// Cell text for identity and edge columns, `None` for numeric columns.
    pub fn text<'a>(&self, record: &'a SubjectRecord) -> Option<&'a str> {
        match self {
            ColumnSpec::Edge(index) => Some(record.timestamps()[*index]),
            ColumnSpec::Surname => Some(record.surname()),
            ColumnSpec::Name => Some(record.name()),
            ColumnSpec::Id => Some(""),
            ColumnSpec::Kinematic(_) | ColumnSpec::Channel { .. } => None,
        }
    }

    /// Numeric cell value; `None` for nulls and for text columns.
    pub fn number(&self, record: &SubjectRecord) -> Option<f64> {
        match self {
            ColumnSpec::Kinematic(column) => column.value(record.kinematics()),
            ColumnSpec::Channel { channel, slot } => {
                record.channel(channel).and_then(|summary| slot.value(summary))
            }
            _ => None,
        }
    }

    fn build(&self, records: &[SubjectRecord]) -> Column {
        let header = self.header();
        let name = PlSmallStr::from(header.as_str());
        let series = if self.is_text() {
            let values: Vec<&str> = records
                .iter()
                .map(|record| self.text(record).unwrap_or_default())
                .collect();
            Series::new(name, values)
        } else {
            let values: Vec<Option<f64>> =
                records.iter().map(|record| self.number(record)).collect();
            Series::new(name, values)
        };
        series.into()
    }
}

/// Declarative column list of the flattened subject table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSchema {
    layout: ColumnLayout,
    columns: Vec<ColumnSpec>,
}

impl ExportSchema {
    pub fn new<S: AsRef<str>>(layout: ColumnLayout, channels: &[S]) -> Self {
        let mut columns: Vec<ColumnSpec> = (0..BOUNDARY_COUNT).map(ColumnSpec::Edge).collect();
        columns.extend([ColumnSpec::Surname, ColumnSpec::Name, ColumnSpec::Id]);
        columns.extend(KinematicColumn::all().into_iter().map(ColumnSpec::Kinematic));

        let slots = Slot::all();
        let channel_column = |channel: &S, slot: Slot| ColumnSpec::Channel {
            channel: channel.as_ref().to_string(),
            slot,
        };
        match layout {
            ColumnLayout::ByChannel => {
                for channel in channels {
                    columns.extend(slots.iter().map(|slot| channel_column(channel, *slot)));
                }
            }
            ColumnLayout::ByBucket => {
                for slot in &slots {
                    columns.extend(channels.iter().map(|channel| channel_column(channel, *slot)));
                }
            }
        }

        Self { layout, columns }
    }

    /// Schema covering every channel seen in `records`, in first-seen order.
    pub fn for_records(layout: ColumnLayout, records: &[SubjectRecord]) -> Self {
        let mut seen = HashSet::new();
        let channels: Vec<&str> = records
            .iter()
            .flat_map(|record| record.channels().iter().map(ChannelSummary::name))
            .filter(|name| seen.insert(*name))
            .collect();
        Self::new(layout, &channels)
    }

    pub fn layout(&self) -> ColumnLayout {
        self.layout
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn headers(&self) -> Vec<String> {
        self.columns.iter().map(ColumnSpec::header).collect()
    }

    fn check_unique_headers(&self) -> Result<(), ExportError> {
        let mut seen = HashSet::new();
        for header in self.headers() {
            if !seen.insert(header.clone()) {
                return Err(ExportError::DuplicateColumn(header));
            }
        }
        Ok(())
    }

    /// One row per record. Channels a record lacks are null.
    pub fn to_dataframe(&self, records: &[SubjectRecord]) -> Result<DataFrame, ExportError> {
        self.check_unique_headers()?;

        let columns: Vec<Column> = self
            .columns
            .iter()
            .map(|spec| spec.build(records))
            .collect();
        Ok(DataFrame::new(columns)?)
    }
}

pub fn write_csv<W: Write>(df: &mut DataFrame, writer: W) -> Result<(), ExportError> {
    CsvWriter::new(writer).include_header(true).finish(df)?;
    Ok(())
}

pub fn write_parquet<W: Write>(df: &mut DataFrame, writer: W) -> Result<(), ExportError> {
    ParquetWriter::new(writer)
        .with_compression(ParquetCompression::Zstd(None))
        .with_statistics(StatisticsOptions::default())
        .finish(df)?;
    Ok(())
}

/// Single-sheet workbook: the header row, then one row per record. Null
/// values are left as blank cells.
pub fn write_xlsx<W: Write>(
    schema: &ExportSchema,
    records: &[SubjectRecord],
    mut writer: W,
) -> Result<(), ExportError> {
    schema.check_unique_headers()?;

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(XLSX_SHEET_NAME)?;

    for (column, spec) in schema.columns().iter().enumerate() {
        let column = ColNum::try_from(column).map_err(|_| ExportError::SheetBounds)?;
        sheet.write_string(0, column, spec.header())?;

        for (offset, record) in records.iter().enumerate() {
            let row = RowNum::try_from(offset + 1).map_err(|_| ExportError::SheetBounds)?;
            if let Some(text) = spec.text(record).filter(|text| !text.is_empty()) {
                sheet.write_string(row, column, text)?;
            } else if let Some(value) = spec.number(record) {
                sheet.write_number(row, column, value)?;
            }
        }
    }

    let bytes = workbook.save_to_buffer()?;
    writer.write_all(&bytes)?;
    Ok(())
}

pub fn write_records_json<W: Write>(
    records: &[SubjectRecord],
    writer: W,
) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(writer, records)?;
    Ok(())
}

/// Zip archive with the flattened CSV, the full records as JSON and the
/// per-file batch report.
pub fn write_bundle<W: Write + Seek>(
    writer: W,
    schema: &ExportSchema,
    records: &[SubjectRecord],
    reports: &[FileReport],
) -> Result<(), ExportError> {
    let mut df = schema.to_dataframe(records)?;
    let mut csv_bytes = Vec::new();
    write_csv(&mut df, &mut csv_bytes)?;

    let records_bytes = serde_json::to_vec_pretty(records)?;
    let report_bytes = serde_json::to_vec_pretty(&json!({
        "generated_at": Utc::now().to_rfc3339(),
        "layout": schema.layout(),
        "files": reports,
    }))?;

    let mut zip = ZipWriter::new(writer);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    let entries: [(&str, &[u8]); 3] = [
        ("subjects.csv", &csv_bytes),
        ("subjects.json", &records_bytes),
        ("report.json", &report_bytes),
    ];
    for (name, bytes) in entries {
        zip.start_file(name, options)?;
        zip.write_all(bytes)?;
    }
    zip.finish()?;

    Ok(())
}

mod common;

use std::io::{Cursor, Read};

use common::fixture_table;
use polars::prelude::*;
use sixmwt_core::batch::{process_batch, FileInput};
use sixmwt_core::build_subject_record;
use sixmwt_core::config::ExtractionConfig;
use sixmwt_core::export::{
    write_bundle, write_csv, write_parquet, write_xlsx, ColumnLayout, ExportError, ExportSchema,
};
use sixmwt_core::SubjectRecord;

fn both_records() -> Vec<SubjectRecord> {
    let config = ExtractionConfig::default();
    vec![
        build_subject_record("rossi.xml", &fixture_table("walk_start_scheme.xml"), &config)
            .expect("start record"),
        build_subject_record("bianchi.csv", &fixture_table("walk_marker_scheme.csv"), &config)
            .expect("marker record"),
    ]
}

#[test]
fn by_channel_layout_groups_slots_per_channel() {
    let schema = ExportSchema::new(ColumnLayout::ByChannel, &["A", "B"]);
    let headers = schema.headers();

    assert_eq!(headers.len(), 52);
    assert_eq!(&headers[..3], ["Edge_1", "Edge_2", "Edge_3"]);
    assert_eq!(&headers[7..10], ["Surname", "Name", "ID"]);
    assert_eq!(headers[10], "SixMWT_m_1");
    assert_eq!(headers[16], "SixMWT_m_first2");
    assert_eq!(headers[19], "SixMWT_m_first3");
    assert_eq!(headers[21], "SixMWT_m_tot");
    assert_eq!(headers[24], "TwoMWT_km_h_tot");
    assert_eq!(headers[27], "DWI_6-1");
    assert_eq!(headers[28], "A_1");
    assert_eq!(headers[33], "A_6");
    assert_eq!(headers[34], "A_third1");
    assert_eq!(headers[39], "A_total");
    assert_eq!(headers[40], "B_1");
    assert_eq!(headers[51], "B_total");
}

#[test]
fn by_bucket_layout_interleaves_channels() {
    let schema = ExportSchema::new(ColumnLayout::ByBucket, &["A", "B"]);
    let headers = schema.headers();

    assert_eq!(headers.len(), 52);
    assert_eq!(&headers[28..32], ["A_1", "B_1", "A_2", "B_2"]);
    assert_eq!(&headers[40..42], ["A_third1", "B_third1"]);
    assert_eq!(headers[51], "B_total");
}

#[test]
fn dataframe_has_one_row_per_record_with_union_of_channels() {
    let records = both_records();
    let schema = ExportSchema::for_records(ColumnLayout::ByChannel, &records);
    let df = schema.to_dataframe(&records).expect("dataframe");

    assert_eq!(df.height(), 2);
    assert_eq!(df.width(), 28 + 19 * 12);

    let edges = df.column("Edge_1").unwrap().str().unwrap();
    assert_eq!(edges.get(0), Some("00:00:00"));
    assert_eq!(edges.get(1), Some("00:00:20"));

    let surnames = df.column("Surname").unwrap().str().unwrap();
    assert_eq!(surnames.get(0), Some("Rossi"));
    assert_eq!(surnames.get(1), Some("Bianchi"));

    let ids = df.column("ID").unwrap().str().unwrap();
    assert_eq!(ids.get(0), Some(""));

    let totals = df.column("SixMWT_m_tot").unwrap().f64().unwrap();
    assert_eq!(totals.get(0), Some(900.0));
    assert_eq!(totals.get(1), Some(610.0));

    let vo2 = df.column("V'O2_total").unwrap().f64().unwrap();
    assert_eq!(vo2.get(0), Some(2200.0));

    let ratio = df.column("V'E/V'O2_1").unwrap().f64().unwrap();
    assert_eq!(ratio.get(0), None);
    assert!(ratio.get(1).is_some_and(|value| (value - 0.02).abs() < 1e-9));
}

#[test]
fn duplicate_channel_names_are_rejected() {
    let schema = ExportSchema::new(ColumnLayout::ByChannel, &["A", "A"]);
    let err = schema.to_dataframe(&[]).expect_err("duplicate columns");

    assert!(matches!(err, ExportError::DuplicateColumn(ref column) if column == "A_1"));
}

#[test]
fn csv_output_starts_with_edge_headers() {
    let records = both_records();
    let schema = ExportSchema::for_records(ColumnLayout::ByChannel, &records);
    let mut df = schema.to_dataframe(&records).expect("dataframe");

    let mut buffer = Vec::new();
    write_csv(&mut df, &mut buffer).expect("csv");
    let text = String::from_utf8(buffer).expect("utf8");

    assert!(text.starts_with("Edge_1,Edge_2,"));
    assert_eq!(text.lines().count(), 3);
}

#[test]
fn parquet_output_reads_back() {
    let records = both_records();
    let schema = ExportSchema::for_records(ColumnLayout::ByBucket, &records);
    let mut df = schema.to_dataframe(&records).expect("dataframe");

    let mut buffer = Vec::new();
    write_parquet(&mut df, &mut buffer).expect("parquet");
    let read_back = ParquetReader::new(Cursor::new(buffer))
        .finish()
        .expect("read parquet");

    assert_eq!(read_back.shape(), df.shape());
    assert_eq!(
        read_back.get_column_names(),
        df.get_column_names(),
    );
}

#[test]
fn bundle_contains_table_records_and_report() {
    let start = common::fixture("walk_start_scheme.csv");
    let broken = "no markers here";
    let inputs = [
        FileInput {
            path: "rossi.csv",
            contents: start.as_bytes(),
        },
        FileInput {
            path: "broken.csv",
            contents: broken.as_bytes(),
        },
    ];
    let outcome = process_batch(&inputs, &ExtractionConfig::default());
    let records = outcome.records();
    let schema = ExportSchema::for_records(ColumnLayout::ByChannel, &records);

    let mut cursor = Cursor::new(Vec::new());
    write_bundle(&mut cursor, &schema, &records, &outcome.reports()).expect("bundle");

    let mut archive = ::zip::ZipArchive::new(Cursor::new(cursor.into_inner())).expect("zip");
    assert_eq!(archive.len(), 3);

    let mut report = String::new();
    archive
        .by_name("report.json")
        .expect("report entry")
        .read_to_string(&mut report)
        .expect("read report");
    let report: serde_json::Value = serde_json::from_str(&report).expect("report json");

    assert_eq!(report["layout"], "by_channel");
    let files = report["files"].as_array().expect("files");
    assert_eq!(files.len(), 2);
    assert_eq!(files[0]["status"], "processed");
    assert_eq!(files[1]["status"], "failed");

    let mut subjects = String::new();
    archive
        .by_name("subjects.json")
        .expect("subjects entry")
        .read_to_string(&mut subjects)
        .expect("read subjects");
    let subjects: serde_json::Value = serde_json::from_str(&subjects).expect("subjects json");
    assert_eq!(subjects.as_array().map(Vec::len), Some(1));
    assert!(archive.by_name("subjects.csv").is_ok());
}

fn zip_entry(archive: &mut ::zip::ZipArchive<Cursor<Vec<u8>>>, name: &str) -> String {
    let mut text = String::new();
    archive
        .by_name(name)
        .unwrap_or_else(|err| panic!("missing {name}: {err}"))
        .read_to_string(&mut text)
        .expect("read entry");
    text
}

#[test]
fn xlsx_workbook_holds_headers_and_one_row_per_record() {
    let records = both_records();
    let schema = ExportSchema::for_records(ColumnLayout::ByChannel, &records);

    let mut buffer = Vec::new();
    write_xlsx(&schema, &records, &mut buffer).expect("xlsx");
    let mut archive = ::zip::ZipArchive::new(Cursor::new(buffer)).expect("xlsx is a zip");

    let workbook = zip_entry(&mut archive, "xl/workbook.xml");
    assert!(workbook.contains(r#"name="6MWT""#), "{workbook}");

    let strings = zip_entry(&mut archive, "xl/sharedStrings.xml");
    for expected in ["Edge_1", "SixMWT_m_tot", "DWI_6-1", "Rossi", "Bianchi", "00:00:20"] {
        assert!(strings.contains(expected), "missing {expected}");
    }

    let sheet = zip_entry(&mut archive, "xl/worksheets/sheet1.xml");
    assert!(sheet.contains(r#"<row r="3""#));
    assert!(!sheet.contains(r#"<row r="4""#));
    assert!(sheet.contains("<v>900</v>"));
    assert!(sheet.contains("<v>610</v>"));
}

#[test]
fn xlsx_rejects_duplicate_columns() {
    let schema = ExportSchema::new(ColumnLayout::ByBucket, &["A", "A"]);
    let err = write_xlsx(&schema, &[], Vec::new()).expect_err("duplicate columns");

    assert!(matches!(err, ExportError::DuplicateColumn(_)));
}

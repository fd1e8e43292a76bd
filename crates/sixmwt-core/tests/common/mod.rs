#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use sixmwt_parser::{parse_table_file, Table};

/// Builds a table from literal rows; empty strings become absent cells.
pub fn table(rows: &[&[&str]]) -> Table {
    Table::from_rows(rows.iter().map(|row| {
        row.iter()
            .map(|cell| {
                if cell.is_empty() {
                    None
                } else {
                    Some(cell.to_string())
                }
            })
            .collect::<Vec<_>>()
    }))
}

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../sixmwt-parser/tests/data")
        .join(name)
}

pub fn fixture(name: &str) -> String {
    let path = fixture_path(name);
    fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("failed to read fixture {}: {}", path.display(), err))
}

pub fn fixture_table(name: &str) -> Table {
    parse_table_file(&fixture(name)).expect("fixture parse failed")
}

pub fn assert_close(actual: Option<f64>, expected: f64) {
    let value = actual.unwrap_or_else(|| panic!("expected {expected}, got None"));
    assert!(
        (value - expected).abs() < 1e-9,
        "expected {expected}, got {value}"
    );
}

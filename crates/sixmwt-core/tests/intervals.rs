mod common;

use common::{assert_close, table};
use sixmwt_core::boundaries::{extract_boundaries, MarkerScheme};
use sixmwt_core::header::MarkerColumn;
use sixmwt_core::intervals::average_intervals;

fn sample_table() -> sixmwt_parser::Table {
    table(&[
        &["t", "Fase", "Evento", "A", "B"],
        &["00:00", "Rest", "START", "1", ""],
        &["00:20", "Ex", "", "2", ""],
        &["00:40", "Ex", "", "", "x"],
        &["01:00", "Ex", "100", "3", ""],
        &["02:00", "Ex", "200", "5", ""],
        &["03:00", "Ex", "300", "abc", ""],
        &["04:00", "Ex", "400", "7,5", ""],
        &["05:00", "Ex", "500", "", ""],
        &["06:00", "Ex", "600"],
    ])
}

const MARKER: MarkerColumn = MarkerColumn {
    scheme: MarkerScheme::Start,
    index: 2,
};

#[test]
fn averages_skip_missing_and_unreadable_cells() {
    let table = sample_table();
    let boundaries = extract_boundaries(&table, MARKER).expect("boundaries");
    let averages = average_intervals(&table, MARKER.index, &boundaries, 2);

    assert_eq!(averages.len(), 2);
    let a = averages[0];
    assert_close(a[0], 2.0);
    assert_close(a[2], 5.0);
    assert_close(a[3], 7.5);
    assert_close(a[4], 7.5);
}

#[test]
fn shared_boundary_row_counts_in_both_intervals() {
    let table = sample_table();
    let boundaries = extract_boundaries(&table, MARKER).expect("boundaries");
    let averages = average_intervals(&table, MARKER.index, &boundaries, 1);

    // rows 1..=4 and 4..=5 both include the value 3 on row 4
    assert_close(averages[0][0], 2.0);
    assert_close(averages[0][1], 4.0);
}

#[test]
fn interval_without_values_is_null_not_zero() {
    let table = sample_table();
    let boundaries = extract_boundaries(&table, MARKER).expect("boundaries");
    let averages = average_intervals(&table, MARKER.index, &boundaries, 3);

    assert_eq!(averages[0][5], None);
    assert!(averages[1].iter().all(Option::is_none));
    assert!(averages[2].iter().all(Option::is_none));
}

use sixmwt_parser::Table;
use tracing::debug;

use crate::boundaries::{Boundaries, INTERVAL_COUNT};
use crate::values::{mean, parse_decimal};

pub type IntervalAverages = [Option<f64>; INTERVAL_COUNT];

/// Averages `channel_count` channel columns right of the marker column over
/// each boundary-delimited minute.
///
/// Every row of an interval's inclusive range contributes; blank or
/// unreadable cells are left out of both sum and count. Returns one entry per
/// channel in column order.
pub fn average_intervals(
    table: &Table,
    marker_index: usize,
    boundaries: &Boundaries,
    channel_count: usize,
) -> Vec<IntervalAverages> {
    let ranges = boundaries.interval_rows();
    let rows = table.rows();

    (0..channel_count)
        .map(|offset| {
            let column = marker_index + 1 + offset;
            let averages: IntervalAverages = std::array::from_fn(|interval| {
                let range = ranges[interval].clone();
                let values = rows
                    .get(range)
                    .unwrap_or_default()
                    .iter()
                    .map(|row| row.text_at(column).and_then(parse_decimal));
                mean(values)
            });
            debug!(column, ?averages, "interval averages");
            averages
        })
        .collect()
}

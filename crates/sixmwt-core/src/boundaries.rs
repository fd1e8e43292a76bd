use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use sixmwt_parser::{Row, Table};
use tracing::debug;

use crate::error::ExtractionError;
use crate::header::MarkerColumn;
use crate::values::parse_decimal;

pub const BOUNDARY_COUNT: usize = 7;
pub const INTERVAL_COUNT: usize = BOUNDARY_COUNT - 1;

/// Columns between the timestamp and the marker column.
const TIMESTAMP_OFFSET: usize = 2;

const START_TOKEN: &str = "START";
const MARKER_TOKEN: &str = "MARKER";
const STOP_TOKEN: &str = "STOP";

/// How a file annotates the walk. Chosen once from the marker column header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerScheme {
    /// The marker column has no header; `START` and the lap distances appear inline.
    Start,
    /// A `MARKER` header; boundaries open at `START` and continue with numeric markers.
    Marker,
}

impl MarkerScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarkerScheme::Start => "start",
            MarkerScheme::Marker => "marker",
        }
    }

    pub fn header_token(&self) -> &'static str {
        match self {
            MarkerScheme::Start => START_TOKEN,
            MarkerScheme::Marker => MARKER_TOKEN,
        }
    }

    pub fn from_header_token(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.eq_ignore_ascii_case(START_TOKEN) {
            Some(MarkerScheme::Start)
        } else if text.eq_ignore_ascii_case(MARKER_TOKEN) {
            Some(MarkerScheme::Marker)
        } else {
            None
        }
    }

    /// Distance carried by a marker cell, or `None` when the cell does not
    /// open a boundary. `opened` tells whether a start event was collected.
    fn boundary_distance(&self, text: &str, opened: bool) -> Option<f64> {
        let is_start = text.eq_ignore_ascii_case(START_TOKEN);
        match self {
            MarkerScheme::Start => {
                if is_start {
                    Some(0.0)
                } else if text.eq_ignore_ascii_case(STOP_TOKEN) {
                    None
                } else {
                    parse_decimal(text)
                }
            }
            MarkerScheme::Marker => {
                if !opened {
                    is_start.then_some(0.0)
                } else {
                    parse_decimal(text)
                }
            }
        }
    }
}

impl fmt::Display for MarkerScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundaryEvent {
    pub row_index: usize,
    pub timestamp: String,
    pub distance: Option<f64>,
}

impl BoundaryEvent {
    fn read(row: &Row, marker_index: usize, distance: f64) -> Self {
        let timestamp = marker_index
            .checked_sub(TIMESTAMP_OFFSET)
            .and_then(|column| row.text_at(column))
            .unwrap_or_default()
            .to_string();
        Self {
            row_index: row.index(),
            timestamp,
            distance: Some(distance),
        }
    }
}

/// The seven boundary events of one walk, in strictly increasing row order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Boundaries([BoundaryEvent; BOUNDARY_COUNT]);

impl Boundaries {
    pub fn events(&self) -> &[BoundaryEvent; BOUNDARY_COUNT] {
        &self.0
    }

    pub fn timestamps(&self) -> [&str; BOUNDARY_COUNT] {
        std::array::from_fn(|i| self.0[i].timestamp.as_str())
    }

    pub fn distances(&self) -> [Option<f64>; BOUNDARY_COUNT] {
        std::array::from_fn(|i| self.0[i].distance)
    }

    /// Inclusive row range of each one-minute interval. Neighbouring ranges
    /// share their boundary row.
    pub fn interval_rows(&self) -> [RangeInclusive<usize>; INTERVAL_COUNT] {
        std::array::from_fn(|i| self.0[i].row_index..=self.0[i + 1].row_index)
    }
}

pub fn extract_boundaries(
    table: &Table,
    marker: MarkerColumn,
) -> Result<Boundaries, ExtractionError> {
    let mut events: Vec<BoundaryEvent> = Vec::with_capacity(BOUNDARY_COUNT);

    for row in table.rows() {
        if events.len() == BOUNDARY_COUNT {
            break;
        }
        let Some(text) = row.text_at(marker.index) else {
            continue;
        };
        let Some(distance) = marker.scheme.boundary_distance(text, !events.is_empty()) else {
            continue;
        };

        debug!(
            scheme = %marker.scheme,
            row = row.index(),
            distance,
            "boundary marker"
        );
        events.push(BoundaryEvent::read(row, marker.index, distance));
    }

    let found = events.len();
    let events: [BoundaryEvent; BOUNDARY_COUNT] =
        events
            .try_into()
            .map_err(|_| ExtractionError::Boundary {
                scheme: marker.scheme,
                found,
                expected: BOUNDARY_COUNT,
            })?;

    Ok(Boundaries(events))
}

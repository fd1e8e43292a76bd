use serde::Serialize;
use sixmwt_parser::Table;
use tracing::{debug, warn};

use crate::aggregates::Aggregates;
use crate::boundaries::{extract_boundaries, Boundaries, MarkerScheme, BOUNDARY_COUNT};
use crate::channels::{ChannelProfile, RatioChannel};
use crate::config::ExtractionConfig;
use crate::error::ExtractionError;
use crate::header::{locate_marker_column, scan_subject};
use crate::intervals::{average_intervals, IntervalAverages};
use crate::kinematics::Kinematics;
use crate::values::divide;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelSummary {
    name: String,
    derived: bool,
    intervals: IntervalAverages,
    aggregates: Aggregates,
}

impl ChannelSummary {
    fn measured(name: &str, intervals: IntervalAverages) -> Self {
        Self {
            name: name.to_string(),
            derived: false,
            aggregates: Aggregates::from_intervals(&intervals),
            intervals,
        }
    }

    /// Ratio of the numerator's averages to the denominator's, taken after
    /// averaging, never row by row.
    fn ratio(ratio: &RatioChannel, numerator: &Self, denominator: &Self) -> Self {
        Self {
            name: ratio.name.clone(),
            derived: true,
            intervals: std::array::from_fn(|i| {
                divide(numerator.intervals[i], denominator.intervals[i])
            }),
            aggregates: Aggregates::from_fn(|bucket| {
                divide(
                    numerator.aggregates.get(bucket),
                    denominator.aggregates.get(bucket),
                )
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_derived(&self) -> bool {
        self.derived
    }

    pub fn intervals(&self) -> &IntervalAverages {
        &self.intervals
    }

    pub fn aggregates(&self) -> &Aggregates {
        &self.aggregates
    }
}

/// Everything extracted from one walk-test export. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectRecord {
    source: String,
    scheme: MarkerScheme,
    marker_column: usize,
    surname: String,
    name: String,
    boundaries: Boundaries,
    channels: Vec<ChannelSummary>,
    kinematics: Kinematics,
}

impl SubjectRecord {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn scheme(&self) -> MarkerScheme {
        self.scheme
    }

    pub fn marker_column(&self) -> usize {
        self.marker_column
    }

    pub fn surname(&self) -> &str {
        &self.surname
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn boundaries(&self) -> &Boundaries {
        &self.boundaries
    }

    pub fn timestamps(&self) -> [&str; BOUNDARY_COUNT] {
        self.boundaries.timestamps()
    }

    pub fn distances(&self) -> [Option<f64>; BOUNDARY_COUNT] {
        self.boundaries.distances()
    }

    pub fn channels(&self) -> &[ChannelSummary] {
        &self.channels
    }

    pub fn channel(&self, name: &str) -> Option<&ChannelSummary> {
        self.channels.iter().find(|channel| channel.name == name)
    }

    pub fn kinematics(&self) -> &Kinematics {
        &self.kinematics
    }
}

/// Runs header scan, boundary extraction, interval averaging, aggregation and
/// kinematics over one table. `source` only labels the result.
pub fn build_subject_record(
    source: &str,
    table: &Table,
    config: &ExtractionConfig,
) -> Result<SubjectRecord, ExtractionError> {
    let identity = scan_subject(table);
    let marker = locate_marker_column(table)?;
    let boundaries = extract_boundaries(table, marker)?;
    let profile = config.profile(marker.scheme);

    debug!(
        source,
        scheme = %marker.scheme,
        marker_column = marker.index,
        channels = profile.channel_count(),
        "boundaries located"
    );

    let averages = average_intervals(table, marker.index, &boundaries, profile.channel_count());
    let channels = summarize_channels(source, profile, averages);
    let kinematics = Kinematics::from_distances(&boundaries.distances());

    Ok(SubjectRecord {
        source: source.to_string(),
        scheme: marker.scheme,
        marker_column: marker.index,
        surname: identity.surname,
        name: identity.name,
        boundaries,
        channels,
        kinematics,
    })
}

fn summarize_channels(
    source: &str,
    profile: &ChannelProfile,
    averages: Vec<IntervalAverages>,
) -> Vec<ChannelSummary> {
    let mut channels: Vec<ChannelSummary> = profile
        .channels
        .iter()
        .zip(averages)
        .map(|(name, intervals)| ChannelSummary::measured(name, intervals))
        .collect();

    let mut derived = Vec::with_capacity(profile.ratios.len());
    for ratio in &profile.ratios {
        let numerator = channels.iter().find(|c| c.name == ratio.numerator);
        let denominator = channels.iter().find(|c| c.name == ratio.denominator);
        match (numerator, denominator) {
            (Some(numerator), Some(denominator)) => {
                derived.push(ChannelSummary::ratio(ratio, numerator, denominator));
            }
            _ => warn!(
                source,
                ratio = %ratio.name,
                "ratio operands are not measured channels; skipping"
            ),
        }
    }
    channels.extend(derived);

    channels
}

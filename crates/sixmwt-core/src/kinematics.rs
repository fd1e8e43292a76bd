use serde::Serialize;

use crate::boundaries::{BOUNDARY_COUNT, INTERVAL_COUNT};
use crate::values::{divide, percent_change, subtract};

/// Metres over a six-minute walk to km/h: (D / 1000) / (6 / 60).
const SIX_MINUTE_SPEED_DIVISOR: f64 = 100.0;
/// Metres over two minutes to km/h: (D / 1000) / (2 / 60) = D * 30 / 1000.
const TWO_MINUTE_SPEED_NUMERATOR: f64 = 30.0;
const METRES_PER_KILOMETRE: f64 = 1000.0;

/// Distances, speeds and decline indices derived from the seven cumulative
/// distance readings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Kinematics {
    pub minute_distances: [Option<f64>; INTERVAL_COUNT],
    pub paired_distances: [Option<f64>; 3],
    pub tripled_distances: [Option<f64>; 2],
    pub total_distance: Option<f64>,
    pub total_speed_kmh: Option<f64>,
    pub two_minute_distance: Option<f64>,
    pub two_minute_speed_kmh: Option<f64>,
    pub decline_vs_minute2: Option<f64>,
    pub decline_vs_minute3: Option<f64>,
    pub decline_vs_minute1: Option<f64>,
}

impl Kinematics {
    pub fn from_distances(m: &[Option<f64>; BOUNDARY_COUNT]) -> Self {
        let minute_distances: [Option<f64>; INTERVAL_COUNT] =
            std::array::from_fn(|i| subtract(m[i + 1], m[i]));
        let paired_distances = [subtract(m[2], m[0]), subtract(m[4], m[2]), subtract(m[6], m[4])];
        let tripled_distances = [subtract(m[3], m[0]), subtract(m[6], m[3])];
        let total_distance = subtract(m[6], m[0]);
        let two_minute_distance = paired_distances[0];

        let [d1, d2, d3, _, _, d6] = minute_distances;

        Self {
            minute_distances,
            paired_distances,
            tripled_distances,
            total_distance,
            total_speed_kmh: divide(total_distance, Some(SIX_MINUTE_SPEED_DIVISOR)),
            two_minute_distance,
            two_minute_speed_kmh: two_minute_distance
                .map(|d| d * TWO_MINUTE_SPEED_NUMERATOR / METRES_PER_KILOMETRE),
            decline_vs_minute2: percent_change(d2, d6),
            decline_vs_minute3: percent_change(d3, d6),
            decline_vs_minute1: percent_change(d1, d6),
        }
    }
}

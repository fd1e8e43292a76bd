use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::intervals::IntervalAverages;
use crate::values::mean;

/// Summary groupings of the six interval averages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    Third1,
    Third2,
    Third3,
    Half1,
    Half2,
    Total,
}

impl Bucket {
    pub const ALL: [Bucket; 6] = [
        Bucket::Third1,
        Bucket::Third2,
        Bucket::Third3,
        Bucket::Half1,
        Bucket::Half2,
        Bucket::Total,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::Third1 => "third1",
            Bucket::Third2 => "third2",
            Bucket::Third3 => "third3",
            Bucket::Half1 => "half1",
            Bucket::Half2 => "half2",
            Bucket::Total => "total",
        }
    }

    /// Zero-based interval indices covered by the bucket.
    pub fn intervals(&self) -> Range<usize> {
        match self {
            Bucket::Third1 => 0..2,
            Bucket::Third2 => 2..4,
            Bucket::Third3 => 4..6,
            Bucket::Half1 => 0..3,
            Bucket::Half2 => 3..6,
            Bucket::Total => 0..6,
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-channel bucket values. Each interval average weighs the same no
/// matter how many samples it came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Aggregates {
    pub third1: Option<f64>,
    pub third2: Option<f64>,
    pub third3: Option<f64>,
    pub half1: Option<f64>,
    pub half2: Option<f64>,
    pub total: Option<f64>,
}

impl Aggregates {
    pub fn from_intervals(averages: &IntervalAverages) -> Self {
        Self::from_fn(|bucket| mean(averages[bucket.intervals()].iter().copied()))
    }

    pub fn from_fn<F>(mut value: F) -> Self
    where
        F: FnMut(Bucket) -> Option<f64>,
    {
        Self {
            third1: value(Bucket::Third1),
            third2: value(Bucket::Third2),
            third3: value(Bucket::Third3),
            half1: value(Bucket::Half1),
            half2: value(Bucket::Half2),
            total: value(Bucket::Total),
        }
    }

    pub fn get(&self, bucket: Bucket) -> Option<f64> {
        match bucket {
            Bucket::Third1 => self.third1,
            Bucket::Third2 => self.third2,
            Bucket::Third3 => self.third3,
            Bucket::Half1 => self.half1,
            Bucket::Half2 => self.half2,
            Bucket::Total => self.total,
        }
    }
}

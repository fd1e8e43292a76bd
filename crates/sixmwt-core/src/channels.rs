use std::collections::HashSet;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::boundaries::MarkerScheme;

const START_SCHEME_CHANNELS: [&str; 17] = [
    "V'O2",
    "V'O2/kg",
    "V'E",
    "RER",
    "FC",
    "CHO",
    "FAT",
    "EE",
    "EECHO",
    "EEFAT",
    "METS",
    "V'CO2",
    "V'E/V'CO2",
    "BF",
    "EE/BSA",
    "EE/kg",
    "EE/kg/magra",
];

const MARKER_SCHEME_EXTRA_CHANNELS: [&str; 1] = ["SpO2"];

/// A channel computed as the aggregate of `numerator` over the aggregate of
/// `denominator`, interval by interval and bucket by bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatioChannel {
    pub name: String,
    pub numerator: String,
    pub denominator: String,
}

impl RatioChannel {
    pub fn new(
        name: impl Into<String>,
        numerator: impl Into<String>,
        denominator: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            numerator: numerator.into(),
            denominator: denominator.into(),
        }
    }
}

/// Measured channels, in column order right of the marker column, plus the
/// ratio channels derived from them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelProfile {
    pub channels: Vec<String>,
    #[serde(default)]
    pub ratios: Vec<RatioChannel>,
}

static START_PROFILE: Lazy<ChannelProfile> = Lazy::new(|| ChannelProfile {
    channels: START_SCHEME_CHANNELS.iter().map(|name| name.to_string()).collect(),
    ratios: Vec::new(),
});

static MARKER_PROFILE: Lazy<ChannelProfile> = Lazy::new(|| ChannelProfile {
    channels: START_SCHEME_CHANNELS
        .iter()
        .chain(MARKER_SCHEME_EXTRA_CHANNELS.iter())
        .map(|name| name.to_string())
        .collect(),
    ratios: vec![RatioChannel::new("V'E/V'O2", "V'E", "V'O2")],
});

impl ChannelProfile {
    pub fn default_for(scheme: MarkerScheme) -> &'static ChannelProfile {
        match scheme {
            MarkerScheme::Start => &START_PROFILE,
            MarkerScheme::Marker => &MARKER_PROFILE,
        }
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.channels.is_empty() {
            return Err("profile must list at least one channel".to_string());
        }

        let mut seen = HashSet::new();
        let names = self
            .channels
            .iter()
            .chain(self.ratios.iter().map(|ratio| &ratio.name));
        for name in names {
            if name.trim().is_empty() {
                return Err("channel names must not be blank".to_string());
            }
            if !seen.insert(name.as_str()) {
                return Err(format!("channel '{name}' is listed twice"));
            }
        }

        for ratio in &self.ratios {
            for operand in [&ratio.numerator, &ratio.denominator] {
                if !self.channels.contains(operand) {
                    return Err(format!(
                        "ratio '{}' refers to unknown channel '{operand}'",
                        ratio.name
                    ));
                }
            }
        }

        Ok(())
    }
}

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::boundaries::MarkerScheme;
use crate::channels::ChannelProfile;
use crate::export::ColumnLayout;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid {scheme} channel profile: {message}")]
    InvalidProfile {
        scheme: MarkerScheme,
        message: String,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    export: ExportSettings,
    #[serde(default)]
    schemes: SchemeSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SchemeSection {
    start: Option<ChannelProfile>,
    marker: Option<ChannelProfile>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportSettings {
    pub layout: ColumnLayout,
}

/// Channel profiles per marker scheme and export defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionConfig {
    pub export: ExportSettings,
    start_profile: ChannelProfile,
    marker_profile: ChannelProfile,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            export: ExportSettings::default(),
            start_profile: ChannelProfile::default_for(MarkerScheme::Start).clone(),
            marker_profile: ChannelProfile::default_for(MarkerScheme::Marker).clone(),
        }
    }
}

impl ExtractionConfig {
    /// Missing sections keep the built-in defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(content)?;
        let defaults = Self::default();
        let config = Self {
            export: file.export,
            start_profile: file.schemes.start.unwrap_or(defaults.start_profile),
            marker_profile: file.schemes.marker.unwrap_or(defaults.marker_profile),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn with_profile(
        mut self,
        scheme: MarkerScheme,
        profile: ChannelProfile,
    ) -> Result<Self, ConfigError> {
        match scheme {
            MarkerScheme::Start => self.start_profile = profile,
            MarkerScheme::Marker => self.marker_profile = profile,
        }
        self.validate()?;
        Ok(self)
    }

    pub fn profile(&self, scheme: MarkerScheme) -> &ChannelProfile {
        match scheme {
            MarkerScheme::Start => &self.start_profile,
            MarkerScheme::Marker => &self.marker_profile,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for scheme in [MarkerScheme::Start, MarkerScheme::Marker] {
            self.profile(scheme)
                .validate()
                .map_err(|message| ConfigError::InvalidProfile { scheme, message })?;
        }
        Ok(())
    }
}

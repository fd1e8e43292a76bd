pub mod extract;
pub mod inspect;

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sixmwt_core::config::ExtractionConfig;
use tracing::info;

const CONFIG_ENV: &str = "SIXMWT_CONFIG";

/// `--config` wins over `SIXMWT_CONFIG`; neither means built-in profiles.
pub fn load_config(path: Option<&Path>) -> Result<ExtractionConfig> {
    let path = path
        .map(Path::to_path_buf)
        .or_else(|| env::var_os(CONFIG_ENV).map(PathBuf::from));

    let Some(path) = path else {
        return Ok(ExtractionConfig::default());
    };

    let config = ExtractionConfig::load(&path)
        .with_context(|| format!("failed to load config {}", path.display()))?;
    info!(path = %path.display(), "loaded extraction config");
    Ok(config)
}

pub fn format_value(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{value:.2}"),
        None => "-".to_string(),
    }
}

pub mod catalog;
pub mod config;
pub mod estimate;

use anyhow::Result;
use roomcraft_infrastructure::ConfigService;
use std::path::PathBuf;

/// Config service for `--config`, or the default location.
pub fn config_service(path: Option<PathBuf>) -> Result<ConfigService> {
    Ok(match path {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::default_location()?,
    })
}

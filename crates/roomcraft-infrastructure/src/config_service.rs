//! Configuration service implementation.
//!
//! Loads the [`DesignConfig`] from `config.toml`, falling back to the
//! built-in defaults when the file does not exist.

use crate::paths::RoomcraftPaths;
use roomcraft_core::config::DesignConfig;
use roomcraft_core::error::{Result, RoomcraftError};
use std::path::{Path, PathBuf};

/// Configuration service that reads the workflow configuration from disk.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    /// Creates a service reading the default location
    /// (`<config_dir>/roomcraft/config.toml`).
    pub fn default_location() -> Result<Self> {
        Ok(Self::with_path(RoomcraftPaths::config_file()?))
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the configuration. A missing file yields the defaults; an
    /// unreadable or malformed one is an error.
    pub async fn load(&self) -> Result<DesignConfig> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(
                    "No config at {}, using built-in defaults",
                    self.path.display()
                );
                return Ok(DesignConfig::default());
            }
            Err(err) => return Err(err.into()),
        };

        let config: DesignConfig = toml::from_str(&content)?;
        validate(&config)?;
        tracing::info!(
            "Loaded config from {} ({} room types, {} themes)",
            self.path.display(),
            config.room_types.len(),
            config.themes.len()
        );
        Ok(config)
    }

    /// Writes `config` as TOML, creating parent directories as needed.
    pub async fn save(&self, config: &DesignConfig) -> Result<()> {
        validate(config)?;
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = toml::to_string_pretty(config)?;
        tokio::fs::write(&self.path, content).await?;
        Ok(())
    }
}

fn validate(config: &DesignConfig) -> Result<()> {
    let cap = config.max_room_usage_percent;
    if !cap.is_finite() || cap <= 0.0 || cap > 100.0 {
        return Err(RoomcraftError::config(format!(
            "max_room_usage_percent must be within (0, 100], got {cap}"
        )));
    }

    let bounds = config.estimate_bounds;
    if [bounds.max_width, bounds.max_depth, bounds.max_height]
        .iter()
        .any(|b| !b.is_finite() || *b <= 0.0)
    {
        return Err(RoomcraftError::config(
            "estimate_bounds must all be positive numbers",
        ));
    }

    if config.room_types.is_empty() || config.themes.is_empty() {
        return Err(RoomcraftError::config(
            "At least one room type and one theme must be configured",
        ));
    }

    if let Some(theme) = config.themes.iter().find(|t| t.name != t.name.to_uppercase()) {
        return Err(RoomcraftError::config(format!(
            "Theme names must be upper-case: '{}'",
            theme.name
        )));
    }

    Ok(())
}

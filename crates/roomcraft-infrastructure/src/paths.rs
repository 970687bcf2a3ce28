//! Path resolution for roomcraft configuration files.
//!
//! ```text
//! ~/.config/roomcraft/        # Config directory (platform dependent)
//! └── config.toml             # Workflow configuration
//! ```

use roomcraft_core::error::{Result, RoomcraftError};
use std::path::PathBuf;

const APP_DIR: &str = "roomcraft";

pub struct RoomcraftPaths;

impl RoomcraftPaths {
    /// Returns the roomcraft configuration directory (e.g. `~/.config/roomcraft/`).
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| RoomcraftError::config("Cannot find configuration directory"))
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }
}

//! Tracing subscriber setup.

use roomcraft_core::error::{Result, RoomcraftError};
use tracing_subscriber::EnvFilter;

/// Installs a fmt subscriber writing to stderr.
///
/// The filter comes from `RUST_LOG` and defaults to `info`. Calling this
/// more than once is an error; the first subscriber stays installed.
pub fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| RoomcraftError::internal(format!("Failed to initialize tracing: {e}")))
}

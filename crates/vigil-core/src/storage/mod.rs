mod config;
mod profile_store;

pub use config::{Config, SpeechConfig};
pub use profile_store::ProfileStore;

use std::path::PathBuf;

use crate::error::Result;

/// Returns `~/.config/vigil[-dev]/` based on VIGIL_ENV.
///
/// Set VIGIL_ENV=dev to use a separate development data directory.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("VIGIL_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("vigil-dev")
    } else {
        base_dir.join("vigil")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

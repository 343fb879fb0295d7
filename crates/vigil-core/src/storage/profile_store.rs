//! JSON profile persistence.

use std::path::{Path, PathBuf};

use tracing::warn;

use super::data_dir;
use crate::error::{Result, StoreError};
use crate::profile::Profile;

/// Reads and writes the profile file.
///
/// Loads never fail: a missing or corrupt file logs a warning and yields
/// the default profile, so the engine always starts from a valid state.
/// Saves surface their errors so shells can report them.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location, `~/.config/vigil/profile.json`.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(data_dir()?.join("profile.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the profile, or the default when the file is missing or
    /// unreadable.
    pub fn load(&self) -> Profile {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Profile::default();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "profile unreadable, starting fresh");
                return Profile::default();
            }
        };
        match serde_json::from_str(&content) {
            Ok(profile) => profile,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "profile corrupt, starting fresh");
                Profile::default()
            }
        }
    }

    /// Persist the profile.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, profile: &Profile) -> Result<(), StoreError> {
        let content =
            serde_json::to_string_pretty(profile).map_err(|e| StoreError::WriteFailed {
                path: self.path.clone(),
                message: e.to_string(),
            })?;
        std::fs::write(&self.path, content).map_err(|e| StoreError::WriteFailed {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        Ok(())
    }
}

//! Core error types for vigil-core.
//!
//! This module defines the error hierarchy using thiserror. Runtime paths
//! that must not fail (alert delivery, profile loading) log and degrade
//! instead; these types cover the paths that legitimately surface errors
//! to callers.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for vigil-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Message catalog errors
    #[error("Message catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Profile store errors
    #[error("Profile store error: {0}")]
    Store(#[from] StoreError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Message catalog errors.
///
/// A missing or empty entry is a configuration error surfaced to the
/// caller, never a silently dropped alert.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The persona is not defined in the catalog
    #[error("Unknown persona: {0}")]
    UnknownPersona(String),

    /// The persona lacks an entry for this key
    #[error("Persona '{persona}' has no message for '{key}'")]
    MissingMessage { persona: String, key: String },

    /// The persona maps this key to empty text
    #[error("Persona '{persona}' has an empty message for '{key}'")]
    EmptyMessage { persona: String, key: String },
}

/// Profile snapshot store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to read the profile file
    #[error("Failed to read profile from {path}: {message}")]
    ReadFailed { path: PathBuf, message: String },

    /// Failed to write the profile file
    #[error("Failed to write profile to {path}: {message}")]
    WriteFailed { path: PathBuf, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

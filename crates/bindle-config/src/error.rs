//! Configuration error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from loading or validating build configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    #[error("config file not found: {}\n\nHint: create a bindle.toml or pass --config <path>", .0.display())]
    NotFound(PathBuf),

    /// The merged configuration failed to deserialize.
    #[error("invalid configuration: {0}\n\nHint: check bindle.toml syntax and field types")]
    Invalid(String),

    /// A field holds a value the build cannot work with.
    #[error("invalid value for '{field}': {value}\n\nHint: {hint}")]
    InvalidValue {
        /// Name of the offending field.
        field: String,
        /// The rejected value.
        value: String,
        /// What a correct value looks like.
        hint: String,
    },

    /// I/O error while reading a config file.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using [`ConfigError`].
pub type Result<T, E = ConfigError> = std::result::Result<T, E>;

//! Error handling for the bindle CLI.
//!
//! One top-level [`CliError`] with automatic conversions from the domain
//! crates, converted to a miette report at the very top of `main`.

use bindle_bundler::BundlerError;
use bindle_config::ConfigError;
use bindle_pipeline::PipelineError;
use thiserror::Error;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration loading or validation failed
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The pipeline rejected its setup or a unit failed mid-run
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Bundling failed before the pipeline ran
    #[error("Bundler error: {0}")]
    Bundler(#[from] BundlerError),

    /// File watching errors
    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O errors from file system operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A composed task panicked or was cancelled
    #[error("Task '{name}' failed: {message}")]
    Task {
        /// Name of the failing task
        name: String,
        /// Join failure description
        message: String,
    },
}

/// Result type alias using [`CliError`].
pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Convert a [`CliError`] to a miette report for terminal rendering.
pub fn cli_error_to_miette(err: CliError) -> miette::Report {
    match err {
        CliError::Pipeline(PipelineError::Unit {
            ref stage,
            ref unit,
            index,
            ..
        }) => miette::miette!(
            "{err}\n\nHint: unit '{unit}' at position {index} of stage '{stage}' rejected the stream"
        ),
        other => miette::miette!("{other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn config_error_converts() {
        let err: CliError = ConfigError::NotFound(PathBuf::from("bindle.toml")).into();
        assert!(matches!(err, CliError::Config(_)));
        assert!(err.to_string().contains("bindle.toml"));
    }

    #[test]
    fn bundler_error_converts() {
        let err: CliError = BundlerError::EntryNotFound(PathBuf::from("ui.js")).into();
        assert!(matches!(err, CliError::Bundler(_)));
    }

    #[test]
    fn task_error_carries_the_name() {
        let err = CliError::Task {
            name: "scripts".to_string(),
            message: "panicked".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("scripts"));
        assert!(msg.contains("panicked"));
    }
}

//! Error types for bundling and unit processing.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the bundler collaborator and the processing units.
#[derive(Debug, Error)]
pub enum BundlerError {
    /// An entry point file does not exist.
    #[error("entry point not found: {}\n\nHint: check 'entries' in bindle.toml or the --entry argument", .0.display())]
    EntryNotFound(PathBuf),

    /// A relative `require` could not be resolved to a file.
    #[error("failed to resolve module '{module}' imported from {}\n\nHint: only relative requires are followed; check the path and extension", .importer.display())]
    ResolutionFailed {
        /// The specifier that could not be resolved.
        module: String,
        /// The file that required it.
        importer: PathBuf,
    },

    /// A source file failed to parse.
    #[error("parse error in {file}: {message}")]
    Parse {
        /// File that failed to parse.
        file: String,
        /// Parser diagnostics, joined.
        message: String,
    },

    /// An inline source map could not be decoded.
    #[error("source map error: {0}")]
    SourceMap(String),

    /// A record path would escape the destination directory.
    #[error("invalid output path: {0}")]
    InvalidOutputPath(String),

    /// Writing an output file failed.
    #[error("failed to write output: {0}\n\nHint: check destination directory permissions")]
    WriteFailure(String),

    /// I/O errors from file system operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using [`BundlerError`].
pub type Result<T, E = BundlerError> = std::result::Result<T, E>;

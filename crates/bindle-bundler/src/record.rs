//! The stream item model: raw bytes and file-like records.

use std::path::{Path, PathBuf};

/// An addressable file-like record flowing through the pipeline.
///
/// The analog of a vinyl file: a relative destination path plus contents.
/// Source-map state rides along so the `sourcemaps:*` and `minify` stages
/// can cooperate without a side channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Destination path, relative to whatever `dest` unit writes it.
    pub path: PathBuf,
    /// File contents.
    pub contents: Vec<u8>,
    /// Current source map as JSON text, if one is being carried.
    pub sourcemap: Option<String>,
    /// Whether the `sourcemaps:init` stage enabled map tracking.
    pub track_sourcemaps: bool,
}

impl Record {
    /// Create a record with no source-map state.
    pub fn new(path: impl Into<PathBuf>, contents: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            contents,
            sourcemap: None,
            track_sourcemaps: false,
        }
    }

    /// File name component of the record path.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Contents as UTF-8 text, if valid.
    pub fn contents_utf8(&self) -> Option<&str> {
        std::str::from_utf8(&self.contents).ok()
    }
}

/// One item in the build pipeline.
///
/// The bundler emits `Bytes` chunks (a raw byte stream) for single-entry
/// bundles; the `vinyl` stage buffers them into a single named `File`
/// record. Factored bundles arrive as pre-formed `File` records. Units that
/// only understand files pass `Bytes` through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Chunk {
    /// Raw bundle output, not yet addressable.
    Bytes(Vec<u8>),
    /// A named file-like record.
    File(Record),
}

impl Chunk {
    /// Borrow the record if this chunk is a file.
    pub fn as_file(&self) -> Option<&Record> {
        match self {
            Chunk::File(record) => Some(record),
            Chunk::Bytes(_) => None,
        }
    }

    /// Consume the chunk, returning the record if it is a file.
    pub fn into_file(self) -> Option<Record> {
        match self {
            Chunk::File(record) => Some(record),
            Chunk::Bytes(_) => None,
        }
    }

    /// UTF-8 view of the payload, whichever variant it is.
    pub fn text(&self) -> Option<&str> {
        match self {
            Chunk::Bytes(bytes) => std::str::from_utf8(bytes).ok(),
            Chunk::File(record) => record.contents_utf8(),
        }
    }
}

impl From<Record> for Chunk {
    fn from(record: Record) -> Self {
        Chunk::File(record)
    }
}

/// Build a file chunk in one call; used all over the tests.
pub fn file_chunk(path: impl AsRef<Path>, contents: &str) -> Chunk {
    Chunk::File(Record::new(
        path.as_ref().to_path_buf(),
        contents.as_bytes().to_vec(),
    ))
}

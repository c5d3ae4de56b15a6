//! Source-map initialization and writing.

use std::path::PathBuf;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use bindle_pipeline::Unit;

use crate::error::BundlerError;
use crate::record::{Chunk, Record};

const INLINE_PREFIX: &str = "//# sourceMappingURL=data:application/json";

/// Enables source-map tracking on file records.
///
/// If a record's contents end with an inline `sourceMappingURL` comment
/// (a bundler-provided map), the comment is stripped and the decoded map is
/// carried on the record. Records without one are still marked as tracking,
/// so a later `minify` unit knows to generate a map.
pub struct SourceMapInit;

impl SourceMapInit {
    fn extract_inline(record: &mut Record) -> anyhow::Result<()> {
        let Some(text) = record.contents_utf8() else {
            return Ok(());
        };
        let Some(at) = text.rfind(INLINE_PREFIX) else {
            return Ok(());
        };
        let comment = text[at..].trim_end();
        let Some(b64) = comment.split("base64,").nth(1) else {
            return Ok(());
        };
        let decoded = BASE64
            .decode(b64.trim())
            .map_err(|e| BundlerError::SourceMap(format!("bad inline map encoding: {e}")))?;
        let map = String::from_utf8(decoded)
            .map_err(|e| BundlerError::SourceMap(format!("inline map is not UTF-8: {e}")))?;
        // Materialize before assigning; both fields borrow from `text`.
        let head = text[..at].trim_end().as_bytes().to_vec();

        record.sourcemap = Some(map);
        record.contents = head;
        Ok(())
    }
}

#[async_trait]
impl Unit<Chunk> for SourceMapInit {
    fn name(&self) -> &str {
        "sourcemaps-init"
    }

    async fn process(&mut self, item: Chunk) -> anyhow::Result<Vec<Chunk>> {
        let out = match item {
            bytes @ Chunk::Bytes(_) => bytes,
            Chunk::File(mut record) => {
                Self::extract_inline(&mut record)?;
                record.track_sourcemaps = true;
                Chunk::File(record)
            }
        };
        Ok(vec![out])
    }
}

/// Where [`SourceMapWrite`] puts the finished map.
enum WriteMode {
    /// Base64 data-URL comment appended to the record itself (dev builds;
    /// keeps DevTools happy when files are loaded from extension URLs).
    Inline,
    /// Sibling `.map` record under a relative directory, plus a pointer
    /// comment (production builds).
    External(PathBuf),
}

/// Writes the carried source map in the configured form.
///
/// Records carrying no map pass through unchanged, whatever the mode.
pub struct SourceMapWrite {
    mode: WriteMode,
}

impl SourceMapWrite {
    /// Inline data-URL mode.
    pub fn inline() -> Self {
        Self {
            mode: WriteMode::Inline,
        }
    }

    /// External mode: maps land under `dir`, relative to the record's
    /// destination (e.g. `../sourcemaps`).
    pub fn external(dir: impl Into<PathBuf>) -> Self {
        Self {
            mode: WriteMode::External(dir.into()),
        }
    }
}

#[async_trait]
impl Unit<Chunk> for SourceMapWrite {
    fn name(&self) -> &str {
        "sourcemaps-write"
    }

    async fn process(&mut self, item: Chunk) -> anyhow::Result<Vec<Chunk>> {
        let Chunk::File(mut record) = item else {
            return Ok(vec![item]);
        };
        let Some(map) = record.sourcemap.take() else {
            return Ok(vec![Chunk::File(record)]);
        };

        match &self.mode {
            WriteMode::Inline => {
                let encoded = BASE64.encode(map.as_bytes());
                let mut contents = record.contents;
                contents.extend_from_slice(
                    format!("\n{INLINE_PREFIX};charset=utf-8;base64,{encoded}\n").as_bytes(),
                );
                record.contents = contents;
                Ok(vec![Chunk::File(record)])
            }
            WriteMode::External(dir) => {
                let map_name = format!("{}.map", record.file_name());
                let map_path = dir.join(&map_name);
                let pointer = format!(
                    "\n//# sourceMappingURL={}\n",
                    map_path.to_string_lossy().replace('\\', "/")
                );
                record.contents.extend_from_slice(pointer.as_bytes());

                let map_record = Record::new(map_path, map.into_bytes());
                Ok(vec![Chunk::File(record), Chunk::File(map_record)])
            }
        }
    }
}

//! Conversion of a raw byte stream into a named file record.

use async_trait::async_trait;
use bindle_pipeline::Unit;

use crate::record::{Chunk, Record};

/// Buffers raw byte chunks and emits one named [`Record`] on flush.
///
/// Pre-formed file records (factored bundles) pass straight through. The
/// buffer drains on every flush, so the unit is safe to re-run in watch
/// mode.
pub struct VinylSource {
    dest_name: String,
    buf: Vec<u8>,
    saw_bytes: bool,
}

impl VinylSource {
    /// Name the buffered record will carry, e.g. `"background.js"`.
    pub fn new(dest_name: impl Into<String>) -> Self {
        Self {
            dest_name: dest_name.into(),
            buf: Vec::new(),
            saw_bytes: false,
        }
    }
}

#[async_trait]
impl Unit<Chunk> for VinylSource {
    fn name(&self) -> &str {
        "vinyl-source"
    }

    async fn process(&mut self, item: Chunk) -> anyhow::Result<Vec<Chunk>> {
        match item {
            Chunk::Bytes(bytes) => {
                self.saw_bytes = true;
                self.buf.extend_from_slice(&bytes);
                Ok(Vec::new())
            }
            file @ Chunk::File(_) => Ok(vec![file]),
        }
    }

    async fn flush(&mut self) -> anyhow::Result<Vec<Chunk>> {
        if !self.saw_bytes {
            return Ok(Vec::new());
        }
        self.saw_bytes = false;
        let contents = std::mem::take(&mut self.buf);
        Ok(vec![Chunk::File(Record::new(
            self.dest_name.clone(),
            contents,
        ))])
    }
}

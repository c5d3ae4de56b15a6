//! Record path rewriting.

use std::path::PathBuf;

use async_trait::async_trait;
use bindle_pipeline::Unit;

use crate::record::Chunk;

type PathFn = Box<dyn Fn(&std::path::Path) -> PathBuf + Send>;

/// Rewrites record paths before they reach the destination.
pub struct Rename {
    apply: PathFn,
}

impl Rename {
    /// Rename unit driven by an arbitrary path function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&std::path::Path) -> PathBuf + Send + 'static,
    {
        Self { apply: Box::new(f) }
    }

    /// Drops directory components, keeping only the file name.
    pub fn flatten() -> Self {
        Self::new(|path| {
            path.file_name()
                .map(PathBuf::from)
                .unwrap_or_else(|| path.to_path_buf())
        })
    }
}

#[async_trait]
impl Unit<Chunk> for Rename {
    fn name(&self) -> &str {
        "rename"
    }

    async fn process(&mut self, item: Chunk) -> anyhow::Result<Vec<Chunk>> {
        let out = match item {
            bytes @ Chunk::Bytes(_) => bytes,
            Chunk::File(mut record) => {
                record.path = (self.apply)(&record.path);
                Chunk::File(record)
            }
        };
        Ok(vec![out])
    }
}

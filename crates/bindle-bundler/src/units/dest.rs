//! Terminal write unit.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use async_trait::async_trait;
use bindle_pipeline::Unit;
use path_clean::PathClean as _;
use tokio::fs;
use tracing::debug;

use crate::error::BundlerError;
use crate::record::Chunk;

/// Writes file records to an output directory and passes them downstream.
///
/// Writes are atomic: contents land in a `.tmp` sibling first and are
/// renamed into place, so a crashed build never leaves a truncated bundle
/// for the extension to load.
pub struct Dest {
    dir: PathBuf,
    root: PathBuf,
}

impl Dest {
    /// Destination rooted at `dir`; records may not escape it.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let root = dir.clone();
        Self { dir, root }
    }

    /// Destination at `dir` whose records may resolve anywhere under
    /// `root`. This is how relative source-map paths like
    /// `../sourcemaps/ui.js.map` stay inside the dist tree while leaving
    /// the platform directory.
    pub fn contained_in(dir: impl Into<PathBuf>, root: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            root: root.into(),
        }
    }

    fn resolve(&self, record_path: &Path) -> anyhow::Result<PathBuf> {
        if record_path.as_os_str().is_empty() {
            return Err(BundlerError::InvalidOutputPath("empty path".into()).into());
        }
        if record_path.to_string_lossy().contains('\0') {
            return Err(
                BundlerError::InvalidOutputPath("path contains a null byte".into()).into(),
            );
        }
        if record_path.is_absolute() {
            return Err(BundlerError::InvalidOutputPath(format!(
                "absolute path '{}' not allowed",
                record_path.display()
            ))
            .into());
        }

        let resolved = self.dir.join(record_path).clean();
        let root = self.root.clean();
        if !resolved.starts_with(&root) {
            return Err(BundlerError::InvalidOutputPath(format!(
                "'{}' escapes the output root '{}'",
                record_path.display(),
                root.display()
            ))
            .into());
        }
        Ok(resolved)
    }

    async fn write(&self, path: &Path, contents: &[u8]) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("cannot create '{}'", parent.display()))?;
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let tmp = path.with_file_name(format!("{name}.tmp"));
        fs::write(&tmp, contents)
            .await
            .map_err(|e| BundlerError::WriteFailure(format!("{}: {e}", tmp.display())))?;
        fs::rename(&tmp, path)
            .await
            .map_err(|e| BundlerError::WriteFailure(format!("{}: {e}", path.display())))?;
        debug!(path = %path.display(), bytes = contents.len(), "wrote output");
        Ok(())
    }
}

#[async_trait]
impl Unit<Chunk> for Dest {
    fn name(&self) -> &str {
        "dest"
    }

    async fn process(&mut self, item: Chunk) -> anyhow::Result<Vec<Chunk>> {
        if let Chunk::File(record) = &item {
            let path = self.resolve(&record.path)?;
            self.write(&path, &record.contents).await?;
        }
        Ok(vec![item])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::file_chunk;

    #[tokio::test]
    async fn writes_records_and_passes_them_on() {
        let dir = tempfile::tempdir().unwrap();
        let mut unit = Dest::new(dir.path());
        let input = file_chunk("ui.js", "var a = 1;");
        let out = unit.process(input.clone()).await.unwrap();
        assert_eq!(out, vec![input]);

        let written = std::fs::read_to_string(dir.path().join("ui.js")).unwrap();
        assert_eq!(written, "var a = 1;");
    }

    #[tokio::test]
    async fn creates_intermediate_directories() {
        let dir = tempfile::tempdir().unwrap();
        let mut unit = Dest::new(dir.path());
        unit.process(file_chunk("nested/deep/file.js", "x"))
            .await
            .unwrap();
        assert!(dir.path().join("nested/deep/file.js").exists());
    }

    #[tokio::test]
    async fn rejects_escape_via_dot_dot() {
        let dir = tempfile::tempdir().unwrap();
        let mut unit = Dest::new(dir.path());
        let err = unit
            .process(file_chunk("../outside.js", "x"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("escapes"));
    }

    #[tokio::test]
    async fn rejects_absolute_paths() {
        let dir = tempfile::tempdir().unwrap();
        let mut unit = Dest::new(dir.path());
        let err = unit
            .process(file_chunk("/etc/passwd", "x"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("absolute"));
    }

    #[tokio::test]
    async fn contained_in_allows_sibling_directories() {
        let root = tempfile::tempdir().unwrap();
        let platform = root.path().join("chrome");
        let mut unit = Dest::contained_in(&platform, root.path());

        unit.process(file_chunk("../sourcemaps/ui.js.map", "{}"))
            .await
            .unwrap();
        assert!(root.path().join("sourcemaps/ui.js.map").exists());

        let err = unit
            .process(file_chunk("../../outside.js", "x"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("escapes"));
    }

    #[tokio::test]
    async fn bytes_pass_through_unwritten() {
        let dir = tempfile::tempdir().unwrap();
        let mut unit = Dest::new(dir.path());
        let input = Chunk::Bytes(b"raw".to_vec());
        let out = unit.process(input.clone()).await.unwrap();
        assert_eq!(out, vec![input]);
        assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
    }
}

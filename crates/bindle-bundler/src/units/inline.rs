//! Inline `fs.readFileSync` calls as string literals (brfs analog).

use std::path::PathBuf;
use std::sync::OnceLock;

use anyhow::Context as _;
use async_trait::async_trait;
use bindle_pipeline::Unit;
use regex::Regex;

use crate::record::Chunk;

fn read_call_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"fs\.readFileSync\(\s*['"]([^'"]+)['"]\s*(?:,\s*['"]utf-?8['"]\s*)?\)"#)
            .expect("static regex")
    })
}

/// Replaces `fs.readFileSync('path')` calls with the file's contents as a
/// string literal, so the bundle carries no runtime file-system dependency.
///
/// Paths are resolved against the configured root. A missing file fails the
/// run; silently shipping an empty inline would hide a real build problem.
pub struct InlineFileRead {
    root: PathBuf,
}

impl InlineFileRead {
    /// Inline unit resolving paths against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    async fn apply(&self, text: &str) -> anyhow::Result<String> {
        // Collect matches first; the replacement needs async file reads.
        let matches: Vec<(std::ops::Range<usize>, String)> = read_call_re()
            .captures_iter(text)
            .map(|caps| {
                let whole = caps.get(0).expect("match");
                (whole.range(), caps[1].to_string())
            })
            .collect();
        if matches.is_empty() {
            return Ok(text.to_string());
        }

        let mut out = String::with_capacity(text.len());
        let mut cursor = 0;
        for (range, rel_path) in matches {
            let path = self.root.join(&rel_path);
            let contents = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("cannot inline file '{}'", path.display()))?;
            out.push_str(&text[cursor..range.start]);
            out.push_str(&serde_json::to_string(&contents)?);
            cursor = range.end;
        }
        out.push_str(&text[cursor..]);
        Ok(out)
    }
}

#[async_trait]
impl Unit<Chunk> for InlineFileRead {
    fn name(&self) -> &str {
        "inline-file-read"
    }

    async fn process(&mut self, item: Chunk) -> anyhow::Result<Vec<Chunk>> {
        let out = match item {
            Chunk::Bytes(bytes) => match String::from_utf8(bytes) {
                Ok(text) => Chunk::Bytes(self.apply(&text).await?.into_bytes()),
                Err(e) => Chunk::Bytes(e.into_bytes()),
            },
            Chunk::File(mut record) => {
                if let Some(text) = record.contents_utf8() {
                    record.contents = self.apply(text).await?.into_bytes();
                }
                Chunk::File(record)
            }
        };
        Ok(vec![out])
    }
}

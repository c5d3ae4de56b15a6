//! Module-graph side artifact.

use std::path::PathBuf;

use anyhow::Context as _;
use async_trait::async_trait;
use bindle_pipeline::Unit;
use tokio::fs;
use tracing::debug;

use crate::graph::ModuleGraph;
use crate::record::Chunk;

/// Passthrough unit that dumps the module graph as pretty JSON on flush.
///
/// The graph is captured at construction and kept across runs, so watch
/// rebuilds refresh the artifact rather than losing it.
pub struct DepsDump {
    path: PathBuf,
    graph: ModuleGraph,
}

impl DepsDump {
    /// Dump `graph` to `path` whenever the pipeline flushes.
    pub fn new(path: impl Into<PathBuf>, graph: ModuleGraph) -> Self {
        Self {
            path: path.into(),
            graph,
        }
    }
}

#[async_trait]
impl Unit<Chunk> for DepsDump {
    fn name(&self) -> &str {
        "deps-dump"
    }

    async fn process(&mut self, item: Chunk) -> anyhow::Result<Vec<Chunk>> {
        Ok(vec![item])
    }

    async fn flush(&mut self) -> anyhow::Result<Vec<Chunk>> {
        let json = serde_json::to_string_pretty(&self.graph)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("cannot create '{}'", parent.display()))?;
            }
        }
        fs::write(&self.path, json)
            .await
            .with_context(|| format!("cannot write dependency dump '{}'", self.path.display()))?;
        debug!(path = %self.path.display(), modules = self.graph.len(), "wrote dependency dump");
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ModuleInfo;
    use crate::record::file_chunk;

    fn sample_graph() -> ModuleGraph {
        let mut graph = ModuleGraph::default();
        graph.insert(
            "./ui.js",
            ModuleInfo {
                deps: vec!["./lib/util.js".to_string()],
                size: 120,
            },
        );
        graph.insert(
            "./lib/util.js",
            ModuleInfo {
                deps: Vec::new(),
                size: 40,
            },
        );
        graph
    }

    #[tokio::test]
    async fn flush_writes_the_graph() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deps.json");
        let mut unit = DepsDump::new(&path, sample_graph());

        let input = file_chunk("ui.js", "x");
        assert_eq!(unit.process(input.clone()).await.unwrap(), vec![input]);
        assert!(unit.flush().await.unwrap().is_empty());

        let written: ModuleGraph =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, sample_graph());
    }

    #[tokio::test]
    async fn graph_survives_a_second_flush() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deps.json");
        let mut unit = DepsDump::new(&path, sample_graph());

        unit.flush().await.unwrap();
        std::fs::remove_file(&path).unwrap();
        unit.flush().await.unwrap();
        assert!(path.exists());
    }
}

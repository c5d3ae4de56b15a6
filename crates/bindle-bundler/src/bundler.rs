//! The source-reading collaborator boundary.
//!
//! The pipeline does not care how bundles are produced; it consumes whatever
//! chunk snapshot a [`Bundler`] emits. Watch mode simply calls
//! [`Bundler::bundle`] again for a fresh snapshot.
//!
//! [`ConcatBundler`] is the in-tree implementation: it follows relative
//! `require('./…')` edges from each entry, concatenates module sources in
//! dependency-first order, and records the module graph. Real module
//! resolution and transpilation semantics are deliberately out of scope.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use path_clean::PathClean;
use regex::Regex;
use std::sync::OnceLock;

use crate::error::{BundlerError, Result};
use crate::graph::{ModuleGraph, ModuleInfo};
use crate::record::{Chunk, Record};

/// One bundling snapshot: the chunk stream plus the recorded module graph.
pub struct BundleOutput {
    /// Items to feed into the pipeline's `bundler` stage.
    pub chunks: Vec<Chunk>,
    /// Dependency graph across every module the snapshot pulled in.
    pub graph: ModuleGraph,
}

/// A source-reading collaborator producing bundle snapshots.
#[async_trait]
pub trait Bundler: Send + Sync {
    /// Produce a fresh snapshot of the bundle.
    async fn bundle(&self) -> Result<BundleOutput>;
}

/// A walked module, in dependency-first order.
struct Module {
    id: String,
    source: String,
    deps: Vec<String>,
}

/// Simple concatenating bundler over relative `require` edges.
///
/// Single-entry bundles emit one [`Chunk::Bytes`] per module so the `vinyl`
/// stage has something to buffer. With [`ConcatBundler::factored`] enabled
/// and several entries, modules reachable from more than one entry are
/// split into a shared `common.js` record and each entry becomes its own
/// pre-formed [`Chunk::File`].
pub struct ConcatBundler {
    root: PathBuf,
    entries: Vec<String>,
    factor: bool,
}

impl ConcatBundler {
    /// Bundler over `entries`, resolved relative to `root`.
    pub fn new(root: impl Into<PathBuf>, entries: Vec<String>) -> Self {
        Self {
            root: root.into().clean(),
            entries,
            factor: false,
        }
    }

    /// Enable shared-module factoring across entries.
    pub fn factored(mut self, factor: bool) -> Self {
        self.factor = factor;
        self
    }

    /// Walk one entry, appending modules dependency-first.
    fn walk_entry(
        &self,
        entry: &str,
        modules: &mut Vec<Module>,
        visited: &mut HashSet<PathBuf>,
    ) -> Result<Vec<String>> {
        let entry_path = self.root.join(entry).clean();
        if !entry_path.exists() {
            return Err(BundlerError::EntryNotFound(entry_path));
        }
        let mut reachable = Vec::new();
        self.walk(&entry_path, modules, visited, &mut reachable)?;
        Ok(reachable)
    }

    fn walk(
        &self,
        path: &Path,
        modules: &mut Vec<Module>,
        visited: &mut HashSet<PathBuf>,
        reachable: &mut Vec<String>,
    ) -> Result<()> {
        let id = self.module_id(path);
        reachable.push(id.clone());
        if !visited.insert(path.to_path_buf()) {
            return Ok(());
        }

        let source = std::fs::read_to_string(path)?;
        let mut deps = Vec::new();
        let specs: Vec<String> = require_re()
            .captures_iter(&source)
            .map(|cap| cap[1].to_string())
            .collect();
        for spec in specs {
            let resolved = resolve(path, &spec).ok_or_else(|| BundlerError::ResolutionFailed {
                module: spec.clone(),
                importer: path.to_path_buf(),
            })?;
            if !resolved.exists() {
                return Err(BundlerError::ResolutionFailed {
                    module: spec,
                    importer: path.to_path_buf(),
                });
            }
            deps.push(self.module_id(&resolved));
            // Dependencies come first so the concatenation defines before use.
            self.walk(&resolved, modules, visited, reachable)?;
        }

        modules.push(Module { id, source, deps });
        Ok(())
    }

    fn module_id(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/")
    }
}

#[async_trait]
impl Bundler for ConcatBundler {
    async fn bundle(&self) -> Result<BundleOutput> {
        let mut modules = Vec::new();
        let mut visited = HashSet::new();
        let mut per_entry: Vec<(String, Vec<String>)> = Vec::new();

        for entry in &self.entries {
            let reachable = self.walk_entry(entry, &mut modules, &mut visited)?;
            per_entry.push((entry.clone(), reachable));
        }

        let mut graph = ModuleGraph::new();
        for module in &modules {
            graph.insert(
                module.id.clone(),
                ModuleInfo {
                    deps: module.deps.clone(),
                    size: module.source.len() as u64,
                },
            );
        }

        let chunks = if self.factor && self.entries.len() > 1 {
            factor_chunks(&modules, &per_entry)
        } else {
            // One raw byte chunk per module; the vinyl stage buffers them
            // into a single named record.
            modules
                .iter()
                .map(|m| Chunk::Bytes(format!("{}\n", m.source).into_bytes()))
                .collect()
        };

        tracing::debug!(
            modules = modules.len(),
            chunks = chunks.len(),
            "bundle snapshot ready"
        );
        Ok(BundleOutput { chunks, graph })
    }
}

/// Split modules into per-entry records plus a shared `common.js`.
fn factor_chunks(modules: &[Module], per_entry: &[(String, Vec<String>)]) -> Vec<Chunk> {
    // Count how many entries reach each module.
    let mut owners: HashMap<&str, usize> = HashMap::new();
    for (_, reachable) in per_entry {
        let unique: HashSet<&str> = reachable.iter().map(String::as_str).collect();
        for id in unique {
            *owners.entry(id).or_insert(0) += 1;
        }
    }

    let source_of: HashMap<&str, &str> = modules
        .iter()
        .map(|m| (m.id.as_str(), m.source.as_str()))
        .collect();

    let mut chunks = Vec::new();

    // Shared modules, in global walk order.
    let common: Vec<&str> = modules
        .iter()
        .map(|m| m.id.as_str())
        .filter(|id| owners.get(id).copied().unwrap_or(0) > 1)
        .collect();
    if !common.is_empty() {
        let contents = concat(&common, &source_of);
        chunks.push(Chunk::File(Record::new("common.js", contents)));
    }

    // Per-entry records hold only the modules exclusive to that entry,
    // preserving walk order.
    for (entry, reachable) in per_entry {
        let reachable_set: HashSet<&str> = reachable.iter().map(String::as_str).collect();
        let own: Vec<&str> = modules
            .iter()
            .map(|m| m.id.as_str())
            .filter(|id| {
                reachable_set.contains(id) && owners.get(id).copied().unwrap_or(0) == 1
            })
            .collect();
        let contents = concat(&own, &source_of);
        let name = Path::new(entry)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| entry.clone());
        chunks.push(Chunk::File(Record::new(name, contents)));
    }

    chunks
}

fn concat(ids: &[&str], source_of: &HashMap<&str, &str>) -> Vec<u8> {
    let mut out = String::new();
    for id in ids {
        if let Some(source) = source_of.get(id) {
            out.push_str(source);
            out.push('\n');
        }
    }
    out.into_bytes()
}

/// Resolve a relative specifier against the importing file.
fn resolve(importer: &Path, spec: &str) -> Option<PathBuf> {
    let base = importer.parent()?;
    let mut resolved = base.join(spec).clean();
    if resolved.extension().is_none() {
        resolved.set_extension("js");
    }
    Some(resolved)
}

fn require_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"require\(\s*['"](\.\.?/[^'"]+)['"]\s*\)"#).expect("static regex")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, name: &str, contents: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    #[tokio::test]
    async fn single_entry_emits_deps_first() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "util.js", "var util = 1;");
        write(dir.path(), "main.js", "require('./util')\nvar main = util;");

        let bundler = ConcatBundler::new(dir.path(), vec!["main.js".to_string()]);
        let output = bundler.bundle().await.unwrap();

        let joined: String = output
            .chunks
            .iter()
            .filter_map(|c| c.text().map(str::to_string))
            .collect();
        let util_at = joined.find("var util").unwrap();
        let main_at = joined.find("var main").unwrap();
        assert!(util_at < main_at, "dependency must precede dependent");

        assert_eq!(output.graph.len(), 2);
        assert_eq!(
            output.graph.modules["main.js"].deps,
            vec!["util.js".to_string()]
        );
    }

    #[tokio::test]
    async fn missing_entry_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let bundler = ConcatBundler::new(dir.path(), vec!["nope.js".to_string()]);
        let Err(err) = bundler.bundle().await else {
            panic!("missing entry was bundled");
        };
        assert!(matches!(err, BundlerError::EntryNotFound(_)));
    }

    #[tokio::test]
    async fn unresolvable_require_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "main.js", "require('./ghost')");

        let bundler = ConcatBundler::new(dir.path(), vec!["main.js".to_string()]);
        let Err(err) = bundler.bundle().await else {
            panic!("unresolvable require was bundled");
        };
        assert!(matches!(err, BundlerError::ResolutionFailed { .. }));
    }

    #[tokio::test]
    async fn circular_requires_terminate() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.js", "require('./b')\nvar a = 1;");
        write(dir.path(), "b.js", "require('./a')\nvar b = 1;");

        let bundler = ConcatBundler::new(dir.path(), vec!["a.js".to_string()]);
        let output = bundler.bundle().await.unwrap();
        assert_eq!(output.graph.len(), 2);
    }

    #[tokio::test]
    async fn factoring_splits_shared_modules() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "shared.js", "var shared = 1;");
        write(dir.path(), "ui.js", "require('./shared')\nvar ui = 1;");
        write(dir.path(), "background.js", "require('./shared')\nvar bg = 1;");

        let bundler = ConcatBundler::new(
            dir.path(),
            vec!["ui.js".to_string(), "background.js".to_string()],
        )
        .factored(true);
        let output = bundler.bundle().await.unwrap();

        let names: Vec<String> = output
            .chunks
            .iter()
            .filter_map(|c| c.as_file().map(Record::file_name))
            .collect();
        assert_eq!(names, vec!["common.js", "ui.js", "background.js"]);

        let common = output.chunks[0].as_file().unwrap();
        let common_text = common.contents_utf8().unwrap();
        assert!(common_text.contains("var shared"));

        let ui = output.chunks[1].as_file().unwrap();
        let ui_text = ui.contents_utf8().unwrap();
        assert!(ui_text.contains("var ui"));
        assert!(!ui_text.contains("var shared"));
    }
}

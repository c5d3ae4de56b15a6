//! Pipeline assembly for the extension bundles.
//!
//! Every bundle flavor shares the same stage skeleton; what differs is
//! which units each configurator appends. Configurators run in a fixed
//! order: shared defaults, then per-bundle wiring, then destinations.

use std::path::Path;

use bindle_bundler::units::{
    Dest, EnvSubstitute, InlineFileRead, Minify, MinifyLevel, Rename, SourceMapInit,
    SourceMapWrite, VinylSource,
};
use bindle_bundler::{Bundler as _, Chunk, ConcatBundler};
use bindle_config::BuildConfig;
use bindle_pipeline::{Pipeline, PipelineBuilder, PipelineError};
use tracing::{debug, info};

use crate::error::Result;

/// The fixed stage skeleton every bundle pipeline declares.
pub const STAGE_LABELS: [&str; 6] = [
    "bundler",
    "vinyl",
    "sourcemaps:init",
    "minify",
    "sourcemaps:write",
    "dest",
];

/// What to bundle and how the chunks arrive.
#[derive(Debug, Clone)]
pub struct BundlePlan {
    name: String,
    entries: Vec<String>,
    factored: bool,
}

impl BundlePlan {
    /// The factored bundle group: shared modules split into `common.js`,
    /// records arrive pre-formed.
    pub fn factored(config: &BuildConfig) -> Self {
        Self {
            name: "scripts".to_string(),
            entries: config.entries.clone(),
            factored: true,
        }
    }

    /// A single-entry bundle; raw bytes are buffered into one named record.
    pub fn single(entry: &str) -> Self {
        Self {
            name: entry.to_string(),
            entries: vec![entry.to_string()],
            factored: false,
        }
    }

    /// Name of the record a single-entry bundle produces.
    fn dest_name(&self) -> String {
        Path::new(&self.name)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.name.clone())
    }
}

/// One bundle's bundler plus its frozen pipeline.
///
/// Watch mode keeps runners alive across rebuilds: each run takes a fresh
/// bundler snapshot and re-drives the same pipeline.
pub struct BundleRunner {
    name: String,
    bundler: ConcatBundler,
    pipeline: Pipeline<Chunk>,
}

impl BundleRunner {
    /// Assemble the pipeline for `plan` under `config`.
    pub fn new(config: &BuildConfig, plan: BundlePlan) -> Result<Self> {
        let bundler = ConcatBundler::new(&config.src_dir, plan.entries.clone())
            .factored(plan.factored);
        let pipeline = build_pipeline(config, &plan)?;
        debug!(bundle = %plan.name, units = pipeline.unit_count(), "pipeline assembled");
        Ok(Self {
            name: plan.name,
            bundler,
            pipeline,
        })
    }

    /// The bundle's name, used in logs.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Take a fresh bundle snapshot and drive it through the pipeline.
    pub async fn run_once(&mut self) -> Result<()> {
        let output = self.bundler.bundle().await?;
        let written = self.pipeline.run_iter(output.chunks).await?;
        info!(bundle = %self.name, records = written.len(), "bundle built");
        Ok(())
    }
}

/// The three runners of a standard build: the factored script group plus
/// the inpage/contentscript pair.
pub fn standard_runners(config: &BuildConfig) -> Result<Vec<BundleRunner>> {
    Ok(vec![
        BundleRunner::new(config, BundlePlan::factored(config))?,
        BundleRunner::new(config, BundlePlan::single(&config.inpage))?,
        BundleRunner::new(config, BundlePlan::single(&config.contentscript))?,
    ])
}

fn build_pipeline(config: &BuildConfig, plan: &BundlePlan) -> Result<Pipeline<Chunk>> {
    let pipeline = PipelineBuilder::new(STAGE_LABELS)?
        .configure(|b| defaults(b, config))?
        .configure(|b| per_bundle(b, config, plan))?
        .configure(|b| destinations(b, config))?
        .build();
    Ok(pipeline)
}

/// Shared wiring for every bundle: env substitution and file inlining on
/// the bundler stage, minification and the source-map sink by mode.
fn defaults(
    b: &mut PipelineBuilder<Chunk>,
    config: &BuildConfig,
) -> std::result::Result<(), PipelineError> {
    b.stage("bundler")?
        .push(EnvSubstitute::new(config.env_table()))
        .push(InlineFileRead::new(&config.src_dir));

    // Dev keeps readable output but still needs a codegen pass so tracked
    // records pick up a source map for the inline writer.
    let level = if config.dev {
        MinifyLevel::None
    } else {
        MinifyLevel::Identifiers
    };
    b.stage("minify")?
        .push(Minify::new(level).reserved(config.reserved_names.clone()));

    if config.dev {
        b.stage("sourcemaps:write")?.push(SourceMapWrite::inline());
    } else {
        b.stage("sourcemaps:write")?
            .push(SourceMapWrite::external(&config.sourcemap_dir));
    }
    Ok(())
}

/// Per-bundle wiring: how chunks become records.
fn per_bundle(
    b: &mut PipelineBuilder<Chunk>,
    _config: &BuildConfig,
    plan: &BundlePlan,
) -> std::result::Result<(), PipelineError> {
    if plan.factored {
        // Records arrive pre-formed; drop any directory components so
        // every platform gets flat file names.
        b.stage("vinyl")?.push(Rename::flatten());
    } else {
        b.stage("vinyl")?.push(VinylSource::new(plan.dest_name()));
    }
    b.stage("sourcemaps:init")?.push(SourceMapInit);
    Ok(())
}

/// One destination per platform, fanned out under the dist root.
fn destinations(
    b: &mut PipelineBuilder<Chunk>,
    config: &BuildConfig,
) -> std::result::Result<(), PipelineError> {
    for platform in &config.platforms {
        // External source maps resolve to ../sourcemaps relative to the
        // platform directory, so containment is checked against dist.
        b.stage("dest")?.push(Dest::contained_in(
            config.platform_dir(platform),
            &config.dist_dir,
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn dev_config(src: &Path, dist: &Path) -> BuildConfig {
        BuildConfig {
            dev: true,
            src_dir: src.to_path_buf(),
            dist_dir: dist.to_path_buf(),
            platforms: vec!["chrome".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn dev_pipeline_carries_a_codegen_pass() {
        let config = dev_config(Path::new("app"), Path::new("dist"));
        let plan = BundlePlan::single("inpage.js");
        let pipeline = build_pipeline(&config, &plan).unwrap();
        // env + inline + vinyl + init + codegen + write + 1 dest
        assert_eq!(pipeline.unit_count(), 7);
    }

    #[test]
    fn prod_pipeline_adds_minify_and_fans_out() {
        let config = BuildConfig {
            src_dir: PathBuf::from("app"),
            ..Default::default()
        };
        let plan = BundlePlan::factored(&config);
        let pipeline = build_pipeline(&config, &plan).unwrap();
        // env + inline + rename + init + minify + write + 2 dests
        assert_eq!(pipeline.unit_count(), 8);
    }

    #[tokio::test]
    async fn runner_writes_per_platform_output() {
        let src = tempfile::tempdir().unwrap();
        let dist = tempfile::tempdir().unwrap();
        std::fs::write(src.path().join("inpage.js"), "var page = 1;").unwrap();

        let mut config = dev_config(src.path(), dist.path());
        config.platforms = vec!["chrome".to_string(), "firefox".to_string()];

        let mut runner = BundleRunner::new(&config, BundlePlan::single("inpage.js")).unwrap();
        runner.run_once().await.unwrap();

        for platform in ["chrome", "firefox"] {
            let out = dist.path().join(platform).join("inpage.js");
            let text = std::fs::read_to_string(&out).unwrap();
            assert!(text.contains("var page = 1;"), "missing output for {platform}");
        }
    }

    #[tokio::test]
    async fn runner_rebuild_reflects_source_changes() {
        let src = tempfile::tempdir().unwrap();
        let dist = tempfile::tempdir().unwrap();
        std::fs::write(src.path().join("inpage.js"), "var rev = 1;").unwrap();

        let config = dev_config(src.path(), dist.path());
        let mut runner = BundleRunner::new(&config, BundlePlan::single("inpage.js")).unwrap();

        runner.run_once().await.unwrap();
        std::fs::write(src.path().join("inpage.js"), "var rev = 2;").unwrap();
        runner.run_once().await.unwrap();

        let text = std::fs::read_to_string(dist.path().join("chrome/inpage.js")).unwrap();
        assert!(text.contains("var rev = 2;"));
    }
}

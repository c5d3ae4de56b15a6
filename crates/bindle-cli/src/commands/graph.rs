//! Dependency-graph dump without bundle output.

use bindle_bundler::units::DepsDump;
use bindle_bundler::{Bundler as _, Chunk, ConcatBundler};
use bindle_config::BuildConfig;
use bindle_pipeline::PipelineBuilder;

use crate::bundles::STAGE_LABELS;
use crate::cli::GraphArgs;
use crate::error::Result;
use crate::ui;

/// Execute the graph command.
///
/// Runs a factored bundling pass with no destinations; the only unit on
/// the pipeline is the graph dump, so nothing lands in dist except the
/// JSON artifact.
pub async fn execute(args: GraphArgs) -> Result<()> {
    let config = BuildConfig::load(args.config.as_deref(), None)?;
    config.validate()?;

    let out_path = args
        .out
        .unwrap_or_else(|| config.dist_dir.join("deps.json"));

    let bundler = ConcatBundler::new(&config.src_dir, config.entries.clone()).factored(true);
    let output = bundler.bundle().await?;
    let modules = output.graph.len();

    let mut pipeline = PipelineBuilder::<Chunk>::new(STAGE_LABELS)?
        .configure(|b| {
            b.stage("dest")?
                .push(DepsDump::new(&out_path, output.graph.clone()));
            Ok(())
        })?
        .build();
    pipeline.run_iter(output.chunks).await?;

    ui::success(&format!(
        "Wrote dependency graph ({modules} modules) to {}",
        out_path.display()
    ));
    Ok(())
}

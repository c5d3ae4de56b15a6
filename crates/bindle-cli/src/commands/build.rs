//! One-shot build of all bundles.

use std::time::Instant;

use bindle_config::BuildConfig;

use crate::bundles::{BundlePlan, BundleRunner};
use crate::cli::BuildArgs;
use crate::error::Result;
use crate::tasks::{compose_parallel, compose_series, Task};
use crate::ui;

/// Execute the build command.
///
/// The factored script group builds in parallel with the content-script
/// pair; within the pair, inpage builds first so the content script can
/// inline it.
pub async fn execute(args: BuildArgs) -> Result<()> {
    let mut config = BuildConfig::load(args.config.as_deref(), None)?;
    config.dev |= args.dev;
    config.test |= args.test;
    config.validate()?;

    let mode = match (config.dev, config.test) {
        (true, true) => "test-dev",
        (true, false) => "dev",
        (false, true) => "test",
        (false, false) => "production",
    };
    ui::info(&format!(
        "Building bundles for {} ({mode})",
        config.platforms.join(", ")
    ));

    let started = Instant::now();

    let mut scripts = BundleRunner::new(&config, BundlePlan::factored(&config))?;
    let mut inpage = BundleRunner::new(&config, BundlePlan::single(&config.inpage))?;
    let mut contentscript = BundleRunner::new(&config, BundlePlan::single(&config.contentscript))?;

    compose_parallel(vec![
        Task::new("scripts", async move { scripts.run_once().await }),
        Task::new("contentscript", async move {
            compose_series(vec![
                Task::new("inpage", async move { inpage.run_once().await }),
                Task::new("contentscript", async move {
                    contentscript.run_once().await
                }),
            ])
            .await
        }),
    ])
    .await?;

    ui::success(&format!(
        "Build complete in {} → {}",
        ui::format_duration(started.elapsed()),
        config.dist_dir.display()
    ));
    Ok(())
}

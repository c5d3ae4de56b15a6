//! Development build with file watching.

use std::sync::Arc;

use bindle_config::BuildConfig;
use tokio::signal;
use tracing::error;

use crate::bundles::{standard_runners, BundleRunner};
use crate::cli::WatchArgs;
use crate::error::Result;
use crate::livereload::{self, LogReload};
use crate::ui;
use crate::watcher::FileWatcher;

/// Execute the watch command.
///
/// Builds once in dev mode, then rebuilds every bundle on each source
/// change. A failing rebuild rings the terminal bell and is logged; the
/// watcher keeps running so the next save gets another chance.
pub async fn execute(args: WatchArgs) -> Result<()> {
    let mut config = BuildConfig::load(args.config.as_deref(), None)?;
    config.dev = true;
    config.test |= args.test;
    config.validate()?;

    let mut runners = standard_runners(&config)?;

    ui::info("Performing initial build...");
    if let Err(e) = rebuild_all(&mut runners).await {
        // The initial build may fail on a broken tree; watch anyway.
        report_failure(&e);
        ui::warning("Initial build failed; waiting for the next change");
    } else {
        ui::success("Initial build complete");
    }

    let (watcher, mut change_rx) = FileWatcher::new(config.src_dir.clone(), args.debounce)?;
    ui::info(&format!(
        "Watching for changes in: {}",
        watcher.root().display()
    ));

    let reload_handle = if config.livereload.enabled {
        Some(livereload::spawn(
            config.dist_dir.clone(),
            config.livereload.delay(),
            Arc::new(LogReload),
        ))
    } else {
        None
    };

    ui::info("Press Ctrl+C to stop");
    loop {
        tokio::select! {
            Some(change) = change_rx.recv() => {
                ui::info(&format!("Change detected: {}", change.path().display()));
                match rebuild_all(&mut runners).await {
                    Ok(()) => ui::success("Rebuild complete"),
                    Err(e) => report_failure(&e),
                }
            }
            _ = signal::ctrl_c() => {
                ui::info("Stopping watch mode");
                break;
            }
        }
    }

    if let Some(handle) = reload_handle {
        handle.abort();
    }
    Ok(())
}

async fn rebuild_all(runners: &mut [BundleRunner]) -> Result<()> {
    for runner in runners.iter_mut() {
        runner.run_once().await?;
    }
    Ok(())
}

/// Audible bell plus error output; watch mode never dies on a build error.
fn report_failure(err: &crate::error::CliError) {
    if ui::is_terminal() {
        eprint!("\x07");
    }
    error!(error = %err, "rebuild failed");
    ui::error(&format!("Rebuild failed: {err}"));
}

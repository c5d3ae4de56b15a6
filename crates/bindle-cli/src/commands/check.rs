//! Configuration loading and validation.

use bindle_config::BuildConfig;

use crate::cli::CheckArgs;
use crate::error::Result;
use crate::ui;

/// Execute the check command.
pub async fn execute(args: CheckArgs) -> Result<()> {
    let config = BuildConfig::load(args.config.as_deref(), None)?;
    config.validate()?;

    ui::success("Configuration is valid");
    ui::info(&format!("Source directory: {}", config.src_dir.display()));
    ui::info(&format!("Dist directory:   {}", config.dist_dir.display()));
    ui::info(&format!("Platforms:        {}", config.platforms.join(", ")));
    ui::info(&format!(
        "Entries:          {} (+ {}, {})",
        config.entries.join(", "),
        config.inpage,
        config.contentscript
    ));
    ui::info(&format!(
        "Environment:      {}",
        config.environment().as_str()
    ));
    if config.livereload.enabled {
        ui::info(&format!(
            "Live reload:      enabled, {}ms delay",
            config.livereload.delay_ms
        ));
    }
    Ok(())
}

//! Logging setup on the `tracing` ecosystem.
//!
//! Verbosity is driven by the global CLI flags, with `RUST_LOG` as the
//! escape hatch for custom filters.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber.
///
/// Call once at startup, before any logging occurs.
///
/// # Verbosity
///
/// 1. `--verbose`: debug level for bindle crates
/// 2. `--quiet`: errors only
/// 3. `RUST_LOG` environment variable, when set
/// 4. Default: info level for bindle crates
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let filter = if verbose {
        EnvFilter::new("bindle_cli=debug,bindle_pipeline=debug,bindle_bundler=debug,bindle_config=debug")
    } else if quiet {
        EnvFilter::new("bindle_cli=error,bindle_pipeline=error,bindle_bundler=error,bindle_config=error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("bindle_cli=info,bindle_pipeline=info,bindle_bundler=info,bindle_config=info")
        })
    };

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    // The subscriber is global and can only be installed once per process,
    // so these only exercise filter construction.

    #[test]
    fn verbose_filter_parses() {
        let _ = EnvFilter::new("bindle_cli=debug,bindle_pipeline=debug");
    }

    #[test]
    fn quiet_filter_parses() {
        let _ = EnvFilter::new("bindle_cli=error");
    }
}

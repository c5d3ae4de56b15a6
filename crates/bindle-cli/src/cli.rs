//! Command-line interface definition.
//!
//! Defines the CLI structure with clap's derive macros.
//!
//! # Command Structure
//!
//! - `bindle build` - one-shot build of all bundles
//! - `bindle watch` - dev build with file watching and optional live reload
//! - `bindle graph` - write the module dependency graph without bundles
//! - `bindle check` - load and validate configuration

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Bindle - browser-extension build orchestrator
#[derive(Parser, Debug)]
#[command(
    name = "bindle",
    version,
    about = "Build orchestrator for browser-extension bundles",
    long_about = "Bindle drives extension bundles through a staged pipeline:\n\
                  bundling, env substitution, minification, source maps, and\n\
                  per-platform output, with watch mode for development."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build all bundles once
    ///
    /// Runs the factored bundle group and the content-script pair through
    /// the full pipeline and writes per-platform output.
    Build(BuildArgs),

    /// Build in development mode and rebuild on source changes
    ///
    /// Errors during a rebuild are reported and the watcher keeps running.
    Watch(WatchArgs),

    /// Write the module dependency graph as JSON
    ///
    /// Performs a factored bundling pass with no output destinations and
    /// dumps the recorded graph, for packaging analysis.
    Graph(GraphArgs),

    /// Load and validate configuration
    Check(CheckArgs),
}

/// Arguments for the build command
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Development build: no minification, inline source maps
    #[arg(long)]
    pub dev: bool,

    /// Test build: sets the IN_TEST flag in injected variables
    #[arg(long)]
    pub test: bool,

    /// Path to the configuration file (default: bindle.toml if present)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Arguments for the watch command
#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Test build: sets the IN_TEST flag in injected variables
    #[arg(long)]
    pub test: bool,

    /// Debounce window for file-change events, in milliseconds
    #[arg(long, default_value_t = 300, value_name = "MS")]
    pub debounce: u64,

    /// Path to the configuration file (default: bindle.toml if present)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Arguments for the graph command
#[derive(Args, Debug)]
pub struct GraphArgs {
    /// Where to write the dependency graph (default: <dist_dir>/deps.json)
    #[arg(short, long, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Path to the configuration file (default: bindle.toml if present)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to the configuration file (default: bindle.toml if present)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

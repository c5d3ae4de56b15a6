//! Bindle CLI - browser-extension build orchestrator.
//!
//! This crate wires the labeled staged pipeline from `bindle-pipeline` and
//! the processing units from `bindle-bundler` into a command-line build
//! tool for extension bundles.
//!
//! # Architecture
//!
//! - [`cli`] - clap argument definitions
//! - [`commands`] - one module per subcommand (build, watch, graph, check)
//! - [`bundles`] - pipeline assembly: which units go on which stage for
//!   which bundle flavor
//! - [`tasks`] - named task composition (series / parallel)
//! - [`watcher`] - debounced file watching for watch mode
//! - [`livereload`] - delayed output-directory watching
//! - [`error`] - CLI error hierarchy with hint-bearing messages
//! - [`logger`] / [`ui`] - tracing setup and terminal status output

pub mod bundles;
pub mod cli;
pub mod commands;
pub mod error;
pub mod livereload;
pub mod logger;
pub mod tasks;
pub mod ui;
pub mod watcher;

pub use error::{CliError, Result};

//! Command implementations.
//!
//! Each subcommand lives in its own module and exposes an `execute`
//! function taking the parsed arguments.

pub mod build;
pub mod check;
pub mod graph;
pub mod watch;

pub use build::execute as build_execute;
pub use check::execute as check_execute;
pub use graph::execute as graph_execute;
pub use watch::execute as watch_execute;

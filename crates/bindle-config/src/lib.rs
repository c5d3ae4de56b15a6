//! Build configuration for the bindle extension bundler.
//!
//! Configuration is an immutable value built once by merging sources in
//! priority order (defaults < `bindle.toml` < `BINDLE_*` environment
//! variables < CLI overrides) and then threaded by reference through the
//! build. No setup step mutates it after the merge.

mod config;
mod error;
mod loading;

pub use config::{BuildConfig, Environment, LiveReloadConfig};
pub use error::{ConfigError, Result};

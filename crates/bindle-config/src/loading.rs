//! Configuration loading and source merging.
//!
//! Priority order: CLI overrides > `BINDLE_*` environment variables >
//! `bindle.toml` > built-in defaults. The result is extracted once into an
//! immutable [`BuildConfig`].

use std::path::Path;

use figment::{
    providers::{Env, Format as _, Serialized, Toml},
    Figment,
};

use crate::config::BuildConfig;
use crate::error::{ConfigError, Result};

/// Default config file name looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "bindle.toml";

impl BuildConfig {
    /// Load configuration from all sources.
    ///
    /// `config_path` forces a specific file; when `None`, `bindle.toml` is
    /// used if it exists. `overrides` is the caller's already-parsed CLI
    /// layer and wins over everything else.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] when an explicitly requested file
    /// is missing, and [`ConfigError::Invalid`] when the merged sources do
    /// not deserialize into a [`BuildConfig`].
    pub fn load(config_path: Option<&Path>, overrides: Option<BuildConfig>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(BuildConfig::default()));

        match config_path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                figment = figment.merge(Toml::file(path));
            }
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    tracing::debug!(path = %default_path.display(), "loading config file");
                    figment = figment.merge(Toml::file(default_path));
                }
            }
        }

        // Environment variables: BINDLE_DEV, BINDLE_DIST__DIR, ...
        figment = figment.merge(Env::prefixed("BINDLE_").split("__"));

        if let Some(overrides) = overrides {
            figment = figment.merge(Serialized::defaults(overrides));
        }

        figment
            .extract()
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}

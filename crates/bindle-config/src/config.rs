//! The `BuildConfig` value and its derived environment table.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Live-reload settings for watch mode.
///
/// The delay is how long watch mode waits after starting before it begins
/// observing the destination directory. The original behavior this replaces
/// used a hardcoded timer with no completion signal from the first build;
/// the delay is configurable here, but it is still a heuristic, not a
/// completion signal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LiveReloadConfig {
    /// Whether to notify a live-reload listener on output changes.
    pub enabled: bool,
    /// Milliseconds to wait before watching the destination directory.
    pub delay_ms: u64,
}

impl Default for LiveReloadConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            delay_ms: 75_000,
        }
    }
}

impl LiveReloadConfig {
    /// The configured delay as a [`Duration`].
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Environment slug injected into bundles as `BINDLE_ENVIRONMENT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Testing,
    Production,
    ReleaseCandidate,
    Staging,
    PullRequest,
    Other,
}

impl Environment {
    /// The string form substituted into sources.
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Testing => "testing",
            Environment::Production => "production",
            Environment::ReleaseCandidate => "release-candidate",
            Environment::Staging => "staging",
            Environment::PullRequest => "pull-request",
            Environment::Other => "other",
        }
    }
}

/// Immutable configuration for one build invocation.
///
/// Mode is a pair of flags mirroring the four bundle flavors: production
/// (neither set), dev, test, and test-dev (both set).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Development mode: unminified output, inline source maps, live reload.
    pub dev: bool,
    /// Test mode: sets the `IN_TEST` flag for injected variables.
    pub test: bool,

    /// Directory holding the extension's script sources.
    pub src_dir: PathBuf,
    /// Root destination directory; platforms fan out beneath it.
    pub dist_dir: PathBuf,
    /// Platform subdirectories to write each artifact to.
    pub platforms: Vec<String>,

    /// Entry points for the factored bundle group (ui, background).
    pub entries: Vec<String>,
    /// Content-script entry, built after `inpage`.
    pub contentscript: String,
    /// Inpage entry, built first so it can be inserted into the content script.
    pub inpage: String,

    /// Extra variables passed through to source substitution.
    pub env: BTreeMap<String, String>,
    /// Identifiers the minifier must not mangle.
    pub reserved_names: Vec<String>,
    /// Where external source maps land, relative to each platform directory.
    pub sourcemap_dir: PathBuf,

    /// Live-reload settings for watch mode.
    pub livereload: LiveReloadConfig,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            dev: false,
            test: false,
            src_dir: PathBuf::from("app/scripts"),
            dist_dir: PathBuf::from("dist"),
            platforms: vec!["chrome".to_string(), "firefox".to_string()],
            entries: vec!["ui.js".to_string(), "background.js".to_string()],
            contentscript: "contentscript.js".to_string(),
            inpage: "inpage.js".to_string(),
            env: BTreeMap::new(),
            reserved_names: Vec::new(),
            sourcemap_dir: PathBuf::from("../sourcemaps"),
            livereload: LiveReloadConfig::default(),
        }
    }
}

impl BuildConfig {
    /// Sanity-check the merged configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for empty platform or entry
    /// lists; every build needs at least one of each.
    pub fn validate(&self) -> Result<()> {
        if self.platforms.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "platforms".to_string(),
                value: "[]".to_string(),
                hint: "list at least one platform directory, e.g. [\"chrome\"]".to_string(),
            });
        }
        if self.entries.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "entries".to_string(),
                value: "[]".to_string(),
                hint: "list the factored entry points, e.g. [\"ui.js\", \"background.js\"]"
                    .to_string(),
            });
        }
        Ok(())
    }

    /// Environment slug for this build.
    ///
    /// Reads the CI branch variables the release flow exports; callers that
    /// need determinism use [`BuildConfig::environment_from`] directly.
    pub fn environment(&self) -> Environment {
        let branch = std::env::var("CI_BRANCH").ok();
        let pull_request = std::env::var("CI_PULL_REQUEST").is_ok();
        self.environment_from(branch.as_deref(), pull_request)
    }

    /// Pure environment derivation from mode flags and CI facts.
    pub fn environment_from(&self, branch: Option<&str>, pull_request: bool) -> Environment {
        if self.dev {
            return Environment::Development;
        }
        if self.test {
            return Environment::Testing;
        }
        match branch {
            Some("master") | Some("main") => Environment::Production,
            Some(b) if is_version_branch(b) => Environment::ReleaseCandidate,
            Some("develop") => Environment::Staging,
            _ if pull_request => Environment::PullRequest,
            _ => Environment::Other,
        }
    }

    /// The variable table substituted into sources by the env unit.
    ///
    /// Mode-derived variables come first; the configured passthrough table
    /// is layered on top and may override them.
    pub fn env_table(&self) -> BTreeMap<String, String> {
        let mut table = BTreeMap::new();
        table.insert("BINDLE_DEBUG".to_string(), self.dev.to_string());
        table.insert(
            "BINDLE_ENVIRONMENT".to_string(),
            self.environment().as_str().to_string(),
        );
        table.insert(
            "NODE_ENV".to_string(),
            if self.dev { "development" } else { "production" }.to_string(),
        );
        table.insert("IN_TEST".to_string(), self.test.to_string());
        for (key, value) in &self.env {
            table.insert(key.clone(), value.clone());
        }
        table
    }

    /// Destination directory for one platform.
    pub fn platform_dir(&self, platform: &str) -> PathBuf {
        self.dist_dir.join(platform)
    }
}

/// Matches release branches starting with `Version-vX.Y.Z`; a suffix after
/// the patch number (`Version-v1.2.3-rc1`) still counts.
fn is_version_branch(branch: &str) -> bool {
    let Some(rest) = branch.strip_prefix("Version-v") else {
        return false;
    };
    let mut parts = rest.splitn(3, '.');
    let (Some(major), Some(minor), Some(patch)) = (parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    let numeric = |p: &str| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit());
    numeric(major) && numeric(minor) && patch.bytes().next().is_some_and(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = BuildConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.dev);
        assert!(!config.test);
        assert_eq!(config.platforms, vec!["chrome", "firefox"]);
    }

    #[test]
    fn empty_platforms_rejected() {
        let config = BuildConfig {
            platforms: Vec::new(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("platforms"));
    }

    #[test]
    fn environment_prefers_mode_flags() {
        let dev = BuildConfig {
            dev: true,
            ..Default::default()
        };
        assert_eq!(
            dev.environment_from(Some("master"), false),
            Environment::Development
        );

        let test = BuildConfig {
            test: true,
            ..Default::default()
        };
        assert_eq!(test.environment_from(None, false), Environment::Testing);
    }

    #[test]
    fn environment_from_branch() {
        let config = BuildConfig::default();
        assert_eq!(
            config.environment_from(Some("master"), false),
            Environment::Production
        );
        assert_eq!(
            config.environment_from(Some("Version-v1.2.3"), false),
            Environment::ReleaseCandidate
        );
        assert_eq!(
            config.environment_from(Some("Version-v1.2.3-rc1"), false),
            Environment::ReleaseCandidate
        );
        assert_eq!(
            config.environment_from(Some("develop"), false),
            Environment::Staging
        );
        assert_eq!(
            config.environment_from(Some("feature/x"), true),
            Environment::PullRequest
        );
        assert_eq!(config.environment_from(None, false), Environment::Other);
    }

    #[test]
    fn version_branch_detection() {
        assert!(is_version_branch("Version-v10.2.0"));
        assert!(is_version_branch("Version-v1.2.3-rc1"));
        assert!(!is_version_branch("Version-v10.2"));
        assert!(!is_version_branch("Version-vX.2.0"));
        assert!(!is_version_branch("Version-v1.2.x"));
        assert!(!is_version_branch("release"));
    }

    #[test]
    fn env_table_reflects_mode() {
        let mut config = BuildConfig {
            dev: true,
            ..Default::default()
        };
        config
            .env
            .insert("API_KEY".to_string(), "abc".to_string());

        let table = config.env_table();
        assert_eq!(table["BINDLE_DEBUG"], "true");
        assert_eq!(table["NODE_ENV"], "development");
        assert_eq!(table["IN_TEST"], "false");
        assert_eq!(table["API_KEY"], "abc");
    }

    #[test]
    fn passthrough_env_overrides_derived() {
        let mut config = BuildConfig::default();
        config
            .env
            .insert("NODE_ENV".to_string(), "staging".to_string());
        assert_eq!(config.env_table()["NODE_ENV"], "staging");
    }

    #[test]
    fn platform_dir_joins_dist() {
        let config = BuildConfig::default();
        assert_eq!(config.platform_dir("chrome"), PathBuf::from("dist/chrome"));
    }
}

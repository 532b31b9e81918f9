//! Configuration structs, loaded from the environment once at startup.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::env_keys;
use super::loader::{env_bool, env_optional, env_or, load_dotenv};

/// Default branch when `SKYHOOK_BUNDLE_BRANCH` is unset.
pub const DEFAULT_BRANCH: &str = "main";
/// Default archive endpoint base.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";
/// Default local overlay file name.
pub const DEFAULT_OVERLAY_FILE: &str = "config.js";
/// Default program used to launch the bundle.
pub const DEFAULT_RUNNER: &str = "node";
/// Default entry point expected at the bundle root.
pub const DEFAULT_ENTRY_POINT: &str = "index.js";

/// Errors raised while building [`Config`]. All of them are fatal before
/// any network call is made.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing or empty credential: set SKYHOOK_TOKEN")]
    MissingCredential,

    #[error("missing required variable {0}")]
    MissingVar(&'static str),

    #[error("cannot locate the supervisor executable")]
    ExeLocation(#[source] io::Error),
}

/// Identifies which remote archive to fetch. Immutable for the process
/// lifetime.
#[derive(Debug, Clone)]
pub struct BundleDescriptor {
    pub owner: String,
    pub name: String,
    pub branch: String,
}

/// Immutable process configuration, built once in `main` and passed by
/// reference into every component.
#[derive(Debug, Clone)]
pub struct Config {
    /// Credential sent as the `Authorization: token ...` header.
    pub token: String,
    pub bundle: BundleDescriptor,
    /// Base URL of the archive endpoint.
    pub api_base: String,
    /// Scratch area, wiped and recreated at the start of every run.
    pub staging_dir: PathBuf,
    /// Canonical location of the unpacked bundle: `<staging>/<name>-<branch>`.
    pub target_dir: PathBuf,
    /// Operator-owned overlay file beside the supervisor executable.
    pub overlay_source: PathBuf,
    /// File name the overlay is copied to inside the bundle root.
    pub overlay_file: String,
    pub runner: String,
    pub entry_point: String,
}

impl Config {
    /// Build the configuration from the environment, anchoring all paths
    /// at the supervisor executable's own directory.
    pub fn from_env() -> Result<Self, ConfigError> {
        let exe = std::env::current_exe().map_err(ConfigError::ExeLocation)?;
        let base = exe.parent().ok_or_else(|| {
            ConfigError::ExeLocation(io::Error::new(
                io::ErrorKind::NotFound,
                "executable has no parent directory",
            ))
        })?;
        Self::from_env_with_base(base)
    }

    /// Same as [`Config::from_env`], with an explicit base directory.
    pub fn from_env_with_base(base: &Path) -> Result<Self, ConfigError> {
        load_dotenv();

        let token = env_optional(env_keys::SKYHOOK_TOKEN)
            .ok_or(ConfigError::MissingCredential)?;
        let owner = env_optional(env_keys::SKYHOOK_BUNDLE_OWNER)
            .ok_or(ConfigError::MissingVar(env_keys::SKYHOOK_BUNDLE_OWNER))?;
        let name = env_optional(env_keys::SKYHOOK_BUNDLE_NAME)
            .ok_or(ConfigError::MissingVar(env_keys::SKYHOOK_BUNDLE_NAME))?;
        let branch = env_or(env_keys::SKYHOOK_BUNDLE_BRANCH, || DEFAULT_BRANCH.into());

        // Staging is nested under a tool-private directory so the wipe at
        // the start of a run can never touch anything beside the binary.
        let staging_dir = base.join(".skyhook").join("cache").join("staging");
        let target_dir = staging_dir.join(format!("{}-{}", name, branch));
        let overlay_file = env_or(env_keys::SKYHOOK_OVERLAY_FILE, || {
            DEFAULT_OVERLAY_FILE.into()
        });
        let overlay_source = base.join(&overlay_file);

        Ok(Self {
            token,
            bundle: BundleDescriptor { owner, name, branch },
            api_base: env_or(env_keys::SKYHOOK_API_BASE, || DEFAULT_API_BASE.into()),
            staging_dir,
            target_dir,
            overlay_source,
            overlay_file,
            runner: env_or(env_keys::SKYHOOK_RUNNER, || DEFAULT_RUNNER.into()),
            entry_point: env_or(env_keys::SKYHOOK_ENTRY_POINT, || {
                DEFAULT_ENTRY_POINT.into()
            }),
        })
    }
}

/// Logging configuration, resolved once per process.
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub quiet: bool,
    pub log_level: String,
    pub log_json: bool,
}

impl ObservabilityConfig {
    pub fn from_env() -> &'static Self {
        use std::sync::OnceLock;
        static CACHE: OnceLock<ObservabilityConfig> = OnceLock::new();
        CACHE.get_or_init(|| {
            load_dotenv();
            Self {
                quiet: env_bool(env_keys::observability::SKYHOOK_QUIET, false),
                log_level: env_or(env_keys::observability::SKYHOOK_LOG_LEVEL, || {
                    "info".to_string()
                }),
                log_json: env_bool(env_keys::observability::SKYHOOK_LOG_JSON, false),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::loader::{remove_env_var, set_env_var, ScopedEnvGuard};

    // Single test so the fixed SKYHOOK_* keys are never mutated from two
    // threads at once.
    #[test]
    fn config_from_env() {
        let _t = ScopedEnvGuard(env_keys::SKYHOOK_TOKEN);
        let _o = ScopedEnvGuard(env_keys::SKYHOOK_BUNDLE_OWNER);
        let _n = ScopedEnvGuard(env_keys::SKYHOOK_BUNDLE_NAME);
        let base = std::path::Path::new("/opt/skyhook");

        remove_env_var(env_keys::SKYHOOK_TOKEN);
        let err = Config::from_env_with_base(base).unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredential));

        set_env_var(env_keys::SKYHOOK_TOKEN, "t0k3n");
        let err = Config::from_env_with_base(base).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingVar(env_keys::SKYHOOK_BUNDLE_OWNER)
        ));

        set_env_var(env_keys::SKYHOOK_BUNDLE_OWNER, "acme");
        set_env_var(env_keys::SKYHOOK_BUNDLE_NAME, "widget");
        let cfg = Config::from_env_with_base(base).unwrap();
        assert_eq!(cfg.token, "t0k3n");
        assert_eq!(cfg.bundle.owner, "acme");
        assert_eq!(cfg.bundle.branch, DEFAULT_BRANCH);
        assert_eq!(cfg.api_base, DEFAULT_API_BASE);
        assert_eq!(
            cfg.staging_dir,
            base.join(".skyhook").join("cache").join("staging")
        );
        assert_eq!(cfg.target_dir, cfg.staging_dir.join("widget-main"));
        assert_eq!(cfg.overlay_source, base.join("config.js"));
        assert_eq!(cfg.runner, DEFAULT_RUNNER);
        assert_eq!(cfg.entry_point, DEFAULT_ENTRY_POINT);
    }
}

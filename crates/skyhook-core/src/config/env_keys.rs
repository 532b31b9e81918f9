//! Environment variable key constants.

/// Bearer-style credential for the bundle endpoint. Required, non-empty.
pub const SKYHOOK_TOKEN: &str = "SKYHOOK_TOKEN";

/// Account that owns the remote bundle repository. Required.
pub const SKYHOOK_BUNDLE_OWNER: &str = "SKYHOOK_BUNDLE_OWNER";

/// Name of the remote bundle repository. Required.
pub const SKYHOOK_BUNDLE_NAME: &str = "SKYHOOK_BUNDLE_NAME";

/// Branch or ref to fetch. Defaults to `main`.
pub const SKYHOOK_BUNDLE_BRANCH: &str = "SKYHOOK_BUNDLE_BRANCH";

/// Base URL of the archive endpoint. Defaults to the GitHub API.
pub const SKYHOOK_API_BASE: &str = "SKYHOOK_API_BASE";

/// File name of the local configuration overlay. Defaults to `config.js`.
pub const SKYHOOK_OVERLAY_FILE: &str = "SKYHOOK_OVERLAY_FILE";

/// Program used to launch the bundle entry point. Defaults to `node`.
pub const SKYHOOK_RUNNER: &str = "SKYHOOK_RUNNER";

/// Entry point file expected at the bundle root. Defaults to `index.js`.
pub const SKYHOOK_ENTRY_POINT: &str = "SKYHOOK_ENTRY_POINT";

/// Observability and logging.
pub mod observability {
    pub const SKYHOOK_QUIET: &str = "SKYHOOK_QUIET";
    pub const SKYHOOK_LOG_LEVEL: &str = "SKYHOOK_LOG_LEVEL";
    pub const SKYHOOK_LOG_JSON: &str = "SKYHOOK_LOG_JSON";
}

//! Unified configuration layer.
//!
//! All environment variable reads live in this module; the rest of the
//! workspace receives an immutable [`Config`] built once at startup and
//! never touches `std::env::var` directly.
//!
//! - `loader`: env_or / env_optional / env_bool helpers, `.env` loading
//! - `schema`: [`Config`], [`BundleDescriptor`], [`ObservabilityConfig`]
//! - `env_keys`: `SKYHOOK_*` key constants

pub mod env_keys;
pub mod loader;
pub mod schema;

pub use loader::{env_bool, env_optional, env_or, load_dotenv};
pub use loader::{remove_env_var, set_env_var, ScopedEnvGuard};
pub use schema::{BundleDescriptor, Config, ConfigError, ObservabilityConfig};

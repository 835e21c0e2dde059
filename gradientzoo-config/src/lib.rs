//! Configuration loading for the Gradientzoo edge server.
//!
//! Values are layered: an optional `gradientzoo.toml`, then the process
//! environment (after an optional `.env` file), then whatever overrides the
//! binary applies from its command line. The loader returns the composed
//! [`Config`] together with non-fatal [`ConfigWarnings`] for the caller to
//! log. Filesystem checks ([`apply_guard_rails`]) run on the final config,
//! after the caller's overrides.

pub mod loader;
pub mod models;
pub mod validation;

pub use loader::{ConfigLoad, ConfigLoader, ConfigLoaderOptions, error::ConfigLoadError};
pub use models::{
    AssetsConfig, BasicCredentials, Config, ConfigMetadata, ProxyConfig,
    ProxyTarget, ServerConfig,
    sources::{EnvConfig, FileConfig},
};
pub use validation::{ConfigWarning, ConfigWarnings, apply_guard_rails};

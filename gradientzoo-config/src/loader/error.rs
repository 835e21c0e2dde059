use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("configuration file missing: {path}")]
    MissingConfig { path: PathBuf },
    #[error("failed to read configuration {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to read secret file {path}")]
    SecretFileIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(
        "basic auth {field} is not configured; set BASIC_AUTH_{env_suffix} or auth.{field}"
    )]
    MissingCredentials {
        field: &'static str,
        env_suffix: &'static str,
    },
    #[error("basic auth username must not contain ':'")]
    InvalidUsername,
    #[error("invalid API proxy target {host}:{port}")]
    InvalidProxyTarget {
        host: String,
        port: u16,
        #[source]
        source: url::ParseError,
    },
    #[error(transparent)]
    EnvFile(#[from] dotenvy::Error),
}

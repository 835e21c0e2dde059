pub mod sources;

use std::{
    fmt,
    path::{Path, PathBuf},
};

use url::Url;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_STATIC_DIR: &str = "dist";
pub const DEFAULT_INDEX_FILE: &str = "index.html";

/// Fully resolved edge server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub assets: AssetsConfig,
    pub proxy: ProxyConfig,
    pub auth: BasicCredentials,
    pub metadata: ConfigMetadata,
}

impl Config {
    pub fn static_dir(&self) -> &Path {
        &self.assets.static_dir
    }

    pub fn index_file(&self) -> &Path {
        &self.assets.index_file
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone)]
pub struct AssetsConfig {
    /// Served under `/static`.
    pub static_dir: PathBuf,
    /// Single-page-application shell.
    pub index_file: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// `None` leaves `/api` unroutable; every request there fails with 502.
    pub target: Option<ProxyTarget>,
    /// Drop the `/api` mount prefix before forwarding.
    pub strip_prefix: bool,
}

/// Address of the backend API service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyTarget {
    pub host: String,
    pub port: u16,
}

impl ProxyTarget {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn base_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&format!("http://{}:{}", self.host, self.port))
    }
}

impl fmt::Display for ProxyTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "http://{}:{}", self.host, self.port)
    }
}

/// The shared username/password pair gating the site.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

impl BasicCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConfigMetadata {
    pub config_path: Option<PathBuf>,
    pub env_file_loaded: bool,
}

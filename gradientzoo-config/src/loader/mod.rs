pub mod error;

use std::{
    fs,
    path::{Path, PathBuf},
};

use error::ConfigLoadError;

use crate::{
    models::{
        AssetsConfig, BasicCredentials, Config, ConfigMetadata,
        DEFAULT_HOST, DEFAULT_INDEX_FILE, DEFAULT_PORT, DEFAULT_STATIC_DIR,
        ProxyConfig, ProxyTarget, ServerConfig,
        sources::{EnvConfig, FileAuthConfig, FileConfig, FileProxyConfig},
    },
    validation::ConfigWarnings,
};

const DEFAULT_CONFIG_LOCATIONS: [&str; 2] =
    ["gradientzoo.toml", "config/gradientzoo.toml"];

#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
    /// Use these values instead of reading the process environment. No
    /// `.env` file is loaded in that case.
    pub env: Option<EnvConfig>,
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    pub fn with_env(mut self, env: EnvConfig) -> Self {
        self.options.env = Some(env);
        self
    }

    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let (env_config, env_file_loaded) = match &self.options.env {
            Some(env) => (env.clone(), false),
            None => {
                let loaded = self.load_env_file()?;
                (EnvConfig::gather(), loaded)
            }
        };

        let (file_config, config_path) = self.load_file_config(&env_config)?;

        let (config, warnings) =
            compose_config(file_config, env_config, config_path, env_file_loaded)?;

        Ok(ConfigLoad { config, warnings })
    }

    fn load_env_file(&self) -> Result<bool, ConfigLoadError> {
        let result = match &self.options.env_file {
            Some(path) => dotenvy::from_path(path).map(|_| true),
            None => dotenvy::dotenv().map(|_| true),
        };
        match result {
            Ok(loaded) => Ok(loaded),
            Err(dotenvy::Error::Io(_)) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    fn load_file_config(
        &self,
        env_config: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        let explicit = self
            .options
            .config_path
            .clone()
            .or_else(|| env_config.config_path.clone());

        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigLoadError::MissingConfig { path });
                }
                path
            }
            None => match DEFAULT_CONFIG_LOCATIONS
                .iter()
                .map(PathBuf::from)
                .find(|candidate| candidate.exists())
            {
                Some(path) => path,
                None => return Ok((None, None)),
            },
        };

        let contents =
            fs::read_to_string(&path).map_err(|source| ConfigLoadError::Io {
                path: path.clone(),
                source,
            })?;
        let file_config: FileConfig =
            toml::from_str(&contents).map_err(|source| ConfigLoadError::Parse {
                path: path.clone(),
                source,
            })?;

        Ok((Some(file_config), Some(path)))
    }
}

fn compose_config(
    file_config: Option<FileConfig>,
    env: EnvConfig,
    config_path: Option<PathBuf>,
    env_file_loaded: bool,
) -> Result<(Config, ConfigWarnings), ConfigLoadError> {
    let mut warnings = ConfigWarnings::default();

    if file_config.is_none() {
        warnings.push_with_hint(
            "No gradientzoo.toml detected; falling back to environment variables",
            "Create gradientzoo.toml or pass --config to use a file",
        );
    }

    let FileConfig {
        server: file_server,
        assets: file_assets,
        proxy: file_proxy,
        auth: file_auth,
    } = file_config.unwrap_or_default();

    let server = ServerConfig {
        host: env
            .server_host
            .clone()
            .or(file_server.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string()),
        port: env.server_port.or(file_server.port).unwrap_or(DEFAULT_PORT),
    };

    let assets = AssetsConfig {
        static_dir: env
            .static_dir
            .clone()
            .or(file_assets.static_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR)),
        index_file: env
            .index_file
            .clone()
            .or(file_assets.index_file)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_INDEX_FILE)),
    };

    let proxy = resolve_proxy(&env, file_proxy, &mut warnings)?;
    let auth = resolve_credentials(&env, file_auth)?;

    let config = Config {
        server,
        assets,
        proxy,
        auth,
        metadata: ConfigMetadata {
            config_path,
            env_file_loaded,
        },
    };

    Ok((config, warnings))
}

fn resolve_proxy(
    env: &EnvConfig,
    file_proxy: FileProxyConfig,
    warnings: &mut ConfigWarnings,
) -> Result<ProxyConfig, ConfigLoadError> {
    if let Some(raw) = &env.api_port_invalid {
        warnings.push(format!(
            "GRADIENTZOO_API_SVC_SERVICE_PORT={raw} is not a valid port"
        ));
    }

    let host = env.api_host.clone().or(file_proxy.host);
    let port = env.api_port.or(file_proxy.port);

    let target = match (host, port) {
        (Some(host), Some(port)) => {
            let target = ProxyTarget::new(host, port);
            target.base_url().map_err(|source| {
                ConfigLoadError::InvalidProxyTarget {
                    host: target.host.clone(),
                    port,
                    source,
                }
            })?;
            Some(target)
        }
        (host, port) => {
            let detail = match (host, port) {
                (Some(_), None) => "API proxy host is set but its port is not",
                (None, Some(_)) => "API proxy port is set but its host is not",
                _ => "No API proxy target configured",
            };
            warnings.push_with_hint(
                format!("{detail}; requests under /api will fail with 502"),
                "Set GRADIENTZOO_API_SVC_SERVICE_HOST and GRADIENTZOO_API_SVC_SERVICE_PORT",
            );
            None
        }
    };

    Ok(ProxyConfig {
        target,
        strip_prefix: env
            .proxy_strip_prefix
            .or(file_proxy.strip_prefix)
            .unwrap_or(true),
    })
}

fn resolve_credentials(
    env: &EnvConfig,
    file_auth: FileAuthConfig,
) -> Result<BasicCredentials, ConfigLoadError> {
    let username = env
        .basic_auth_username
        .clone()
        .or(file_auth.username.clone().filter(|value| !value.trim().is_empty()))
        .ok_or(ConfigLoadError::MissingCredentials {
            field: "username",
            env_suffix: "USERNAME",
        })?;
    if username.contains(':') {
        return Err(ConfigLoadError::InvalidUsername);
    }

    let password = resolve_password(env, &file_auth)?.ok_or(
        ConfigLoadError::MissingCredentials {
            field: "password",
            env_suffix: "PASSWORD",
        },
    )?;

    Ok(BasicCredentials { username, password })
}

fn resolve_password(
    env: &EnvConfig,
    file_auth: &FileAuthConfig,
) -> Result<Option<String>, ConfigLoadError> {
    if let Some(password) = env.basic_auth_password.clone() {
        return Ok(Some(password));
    }

    if let Some(path) = env.basic_auth_password_file.as_ref()
        && let Some(secret) = read_secret_file(path)?
    {
        return Ok(Some(secret));
    }

    if let Some(password) =
        file_auth.password.clone().filter(|value| !value.is_empty())
    {
        return Ok(Some(password));
    }

    if let Some(path) = file_auth.password_file.as_ref() {
        return read_secret_file(path);
    }

    Ok(None)
}

fn read_secret_file(path: &Path) -> Result<Option<String>, ConfigLoadError> {
    let contents =
        fs::read_to_string(path).map_err(|source| ConfigLoadError::SecretFileIo {
            path: path.to_path_buf(),
            source,
        })?;
    let trimmed = contents.trim();
    if trimmed.is_empty() {
        Ok(None)
    } else {
        Ok(Some(trimmed.to_string()))
    }
}

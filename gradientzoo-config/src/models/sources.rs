use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub server: FileServerConfig,
    #[serde(default)]
    pub assets: FileAssetsConfig,
    #[serde(default)]
    pub proxy: FileProxyConfig,
    #[serde(default)]
    pub auth: FileAuthConfig,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileServerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileAssetsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub static_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_file: Option<PathBuf>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileProxyConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strip_prefix: Option<bool>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileAuthConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_file: Option<PathBuf>,
}

/// Environment-derived configuration values.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub config_path: Option<PathBuf>,
    pub server_host: Option<String>,
    pub server_port: Option<u16>,
    pub static_dir: Option<PathBuf>,
    pub index_file: Option<PathBuf>,
    pub api_host: Option<String>,
    pub api_port: Option<u16>,
    /// Raw port value that failed to parse, kept for the warning.
    pub api_port_invalid: Option<String>,
    pub proxy_strip_prefix: Option<bool>,
    pub basic_auth_username: Option<String>,
    pub basic_auth_password: Option<String>,
    pub basic_auth_password_file: Option<PathBuf>,
}

impl EnvConfig {
    pub fn gather() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut env_config = Self::default();

        env_config.config_path =
            non_empty(&lookup, "GRADIENTZOO_CONFIG").map(PathBuf::from);
        env_config.server_host = non_empty(&lookup, "SERVER_HOST");
        env_config.server_port = lookup("SERVER_PORT")
            .and_then(|s| s.trim().parse().ok());
        env_config.static_dir =
            non_empty(&lookup, "STATIC_DIR").map(PathBuf::from);
        env_config.index_file =
            non_empty(&lookup, "INDEX_FILE").map(PathBuf::from);

        env_config.api_host =
            non_empty(&lookup, "GRADIENTZOO_API_SVC_SERVICE_HOST");
        if let Some(raw) = non_empty(&lookup, "GRADIENTZOO_API_SVC_SERVICE_PORT") {
            match raw.parse() {
                Ok(port) => env_config.api_port = Some(port),
                Err(_) => env_config.api_port_invalid = Some(raw),
            }
        }
        env_config.proxy_strip_prefix =
            parse_bool(lookup("PROXY_STRIP_PREFIX"));

        env_config.basic_auth_username =
            non_empty(&lookup, "BASIC_AUTH_USERNAME");
        env_config.basic_auth_password = lookup("BASIC_AUTH_PASSWORD")
            .filter(|value| !value.is_empty());
        env_config.basic_auth_password_file =
            non_empty(&lookup, "BASIC_AUTH_PASSWORD_FILE").map(PathBuf::from);

        env_config
    }
}

fn non_empty<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|raw| raw.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_bool(raw: Option<String>) -> Option<bool> {
    raw.and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> EnvConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EnvConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn reads_kubernetes_service_variables() {
        let env = env(&[
            ("GRADIENTZOO_API_SVC_SERVICE_HOST", "10.3.240.12"),
            ("GRADIENTZOO_API_SVC_SERVICE_PORT", "8000"),
        ]);
        assert_eq!(env.api_host.as_deref(), Some("10.3.240.12"));
        assert_eq!(env.api_port, Some(8000));
        assert!(env.api_port_invalid.is_none());
    }

    #[test]
    fn keeps_unparseable_api_port_for_reporting() {
        let env = env(&[("GRADIENTZOO_API_SVC_SERVICE_PORT", "tcp://10.0.0.1:80")]);
        assert_eq!(env.api_port, None);
        assert_eq!(env.api_port_invalid.as_deref(), Some("tcp://10.0.0.1:80"));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let env = env(&[
            ("SERVER_HOST", "  "),
            ("BASIC_AUTH_USERNAME", ""),
            ("BASIC_AUTH_PASSWORD", ""),
        ]);
        assert!(env.server_host.is_none());
        assert!(env.basic_auth_username.is_none());
        assert!(env.basic_auth_password.is_none());
    }

    #[test]
    fn parses_boolean_switches() {
        assert_eq!(
            env(&[("PROXY_STRIP_PREFIX", "off")]).proxy_strip_prefix,
            Some(false)
        );
        assert_eq!(
            env(&[("PROXY_STRIP_PREFIX", "YES")]).proxy_strip_prefix,
            Some(true)
        );
        assert_eq!(
            env(&[("PROXY_STRIP_PREFIX", "maybe")]).proxy_strip_prefix,
            None
        );
    }

    #[test]
    fn file_config_rejects_unknown_keys() {
        let parsed: Result<FileConfig, _> = toml::from_str("[server]\nprot = 1\n");
        assert!(parsed.is_err());
    }
}

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args as ClapArgs, Parser};
use gradientzoo_config::{
    Config, ConfigLoad, ConfigLoader, ConfigWarnings, apply_guard_rails,
};
use gradientzoo_edge::{AppState, server};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "gradientzoo-edge")]
#[command(
    about = "Serves the Gradientzoo web client: static assets, API proxy and the basic-auth protected app shell"
)]
struct Cli {
    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(ClapArgs, Debug, Clone)]
struct ServeArgs {
    /// Path to gradientzoo.toml
    #[arg(short, long, env = "GRADIENTZOO_CONFIG")]
    config: Option<PathBuf>,

    /// Path to a .env file (defaults to ./.env when present)
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Server port (overrides config)
    #[arg(short, long, env = "SERVER_PORT")]
    port: Option<u16>,

    /// Server host (overrides config)
    #[arg(long, env = "SERVER_HOST")]
    host: Option<String>,

    /// Directory served under /static (overrides config)
    #[arg(long, env = "STATIC_DIR")]
    static_dir: Option<PathBuf>,

    /// Application shell returned for every other path (overrides config)
    #[arg(long, env = "INDEX_FILE")]
    index_file: Option<PathBuf>,
}

impl ServeArgs {
    fn apply(&self, config: &mut Config) {
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(host) = self.host.clone() {
            config.server.host = host;
        }
        if let Some(dir) = self.static_dir.clone() {
            config.assets.static_dir = dir;
        }
        if let Some(file) = self.index_file.clone() {
            config.assets.index_file = file;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = load_runtime_config(&cli.serve)?;
    let state =
        AppState::new(config).context("failed to build the API proxy client")?;

    server::serve(state).await
}

fn load_runtime_config(args: &ServeArgs) -> anyhow::Result<Config> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = args.config.clone() {
        loader = loader.with_config_path(path);
    }
    if let Some(path) = args.env_file.clone() {
        loader = loader.with_env_file(path);
    }

    let load = loader.load().context("failed to load configuration")?;
    let (config, warnings) = finalize_config(args, load);

    if config.metadata.env_file_loaded {
        info!("loaded .env file");
    }
    if let Some(path) = &config.metadata.config_path {
        info!(path = %path.display(), "configuration file loaded");
    }

    log_warnings(&warnings);

    match &config.proxy.target {
        Some(target) => info!(
            %target,
            strip_prefix = config.proxy.strip_prefix,
            "proxying /api"
        ),
        None => warn!("API proxy disabled; /api requests will fail"),
    }
    info!(
        static_dir = %config.static_dir().display(),
        index_file = %config.index_file().display(),
        "serving assets"
    );

    Ok(config)
}

/// Applies command line overrides, then checks the assets the final config
/// points at.
fn finalize_config(args: &ServeArgs, load: ConfigLoad) -> (Config, ConfigWarnings) {
    let ConfigLoad {
        mut config,
        mut warnings,
    } = load;

    args.apply(&mut config);
    warnings.extend(apply_guard_rails(&config));

    (config, warnings)
}

fn log_warnings(warnings: &ConfigWarnings) {
    for warning in warnings.iter() {
        match &warning.hint {
            Some(hint) => {
                warn!(message = %warning.message, hint = %hint, "configuration warning")
            }
            None => {
                warn!(message = %warning.message, "configuration warning")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gradientzoo_config::EnvConfig;
    use std::{collections::HashMap, fs, path::Path};

    fn env(pairs: &[(&str, String)]) -> EnvConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        EnvConfig::from_lookup(|name| map.get(name).cloned())
    }

    fn args() -> ServeArgs {
        ServeArgs {
            config: None,
            env_file: None,
            port: None,
            host: None,
            static_dir: None,
            index_file: None,
        }
    }

    fn load_from(dir: &Path, extra: &[(&str, String)]) -> ConfigLoad {
        let mut vars = vec![
            ("STATIC_DIR", dir.join("dist").display().to_string()),
            ("INDEX_FILE", dir.join("index.html").display().to_string()),
            ("BASIC_AUTH_USERNAME", "ericflo".to_string()),
            ("BASIC_AUTH_PASSWORD", "s3cret".to_string()),
        ];
        vars.extend(extra.iter().cloned());
        ConfigLoader::new().with_env(env(&vars)).load().unwrap()
    }

    #[test]
    fn command_line_overrides_environment() {
        let dir = tempfile::tempdir().unwrap();
        let load = load_from(
            dir.path(),
            &[
                ("SERVER_PORT", "5000".to_string()),
                ("SERVER_HOST", "10.0.0.1".to_string()),
            ],
        );
        let serve = ServeArgs {
            port: Some(8080),
            ..args()
        };

        let (config, _) = finalize_config(&serve, load);

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "10.0.0.1");
    }

    #[test]
    fn asset_warnings_follow_command_line_paths() {
        let dir = tempfile::tempdir().unwrap();
        let build = dir.path().join("build");
        fs::create_dir_all(&build).unwrap();
        fs::write(build.join("index.html"), "<html></html>").unwrap();

        let serve = ServeArgs {
            static_dir: Some(build.clone()),
            index_file: Some(build.join("index.html")),
            ..args()
        };
        let (config, warnings) = finalize_config(&serve, load_from(dir.path(), &[]));

        assert_eq!(config.static_dir(), build.as_path());
        assert!(!warnings.contains("static asset directory"), "{warnings:?}");
        assert!(!warnings.contains("application shell"), "{warnings:?}");
    }

    #[test]
    fn missing_override_paths_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("dist")).unwrap();
        fs::write(dir.path().join("index.html"), "<html></html>").unwrap();

        let serve = ServeArgs {
            static_dir: Some(dir.path().join("missing")),
            ..args()
        };
        let (_, warnings) = finalize_config(&serve, load_from(dir.path(), &[]));

        assert!(warnings.contains("missing does not exist"), "{warnings:?}");
        assert!(!warnings.contains("application shell"), "{warnings:?}");
    }
}

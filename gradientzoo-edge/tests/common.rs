use std::{fs, net::SocketAddr, path::PathBuf};

use axum::{
    Json, Router,
    body::Bytes,
    extract::Request,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use axum_test::TestServer;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use gradientzoo_config::{
    AssetsConfig, BasicCredentials, Config, ConfigMetadata, ProxyConfig,
    ProxyTarget, ServerConfig,
};
use gradientzoo_edge::{AppState, create_app};
use serde_json::json;
use tempfile::TempDir;
use tokio::net::TcpListener;

pub const USERNAME: &str = "ericflo";
pub const PASSWORD: &str = "correct horse";
pub const SHELL_HTML: &str = "<!doctype html><html><head><title>Gradientzoo</title></head><body><div id=\"root\"></div><script src=\"/static/app.js\"></script></body></html>";
pub const APP_JS: &str = "window.__GRADIENTZOO__ = { mount: function () { return 'mounted'; } };\n";

// Code is used by test modules, but not in this scope
#[allow(unused)]
#[derive(Debug)]
pub struct Fixture {
    pub dir: TempDir,
    pub config: Config,
}

#[allow(unused)]
impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let static_dir = dir.path().join("dist");
        fs::create_dir_all(&static_dir).expect("create dist");
        fs::write(static_dir.join("app.js"), APP_JS).expect("write app.js");
        let index_file = dir.path().join("index.html");
        fs::write(&index_file, SHELL_HTML).expect("write index.html");

        let config = Config {
            server: ServerConfig {
                host: "127.0.0.1".into(),
                port: 0,
            },
            assets: AssetsConfig {
                static_dir,
                index_file,
            },
            proxy: ProxyConfig {
                target: None,
                strip_prefix: true,
            },
            auth: BasicCredentials::new(USERNAME, PASSWORD),
            metadata: ConfigMetadata::default(),
        };

        Self { dir, config }
    }

    pub fn with_upstream(mut self, addr: SocketAddr) -> Self {
        self.config.proxy.target =
            Some(ProxyTarget::new(addr.ip().to_string(), addr.port()));
        self
    }

    pub fn index_path(&self) -> PathBuf {
        self.config.assets.index_file.clone()
    }

    pub fn state(&self) -> AppState {
        AppState::new(self.config.clone()).expect("app state")
    }

    pub fn server(&self) -> TestServer {
        TestServer::builder()
            .http_transport()
            .build(create_app(self.state()))
            .expect("test server")
    }
}

#[allow(unused)]
pub fn basic(user: &str, pass: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{user}:{pass}")))
}

#[allow(unused)]
pub fn valid_auth() -> String {
    basic(USERNAME, PASSWORD)
}

#[allow(unused)]
async fn echo(req: Request) -> impl IntoResponse {
    let headers: HeaderMap = req.headers().clone();
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(str::to_string);
    let body: Bytes = axum::body::to_bytes(req.into_body(), usize::MAX)
        .await
        .unwrap_or_default();
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    (
        StatusCode::CREATED,
        [("x-upstream", "echo")],
        Json(json!({
            "method": method,
            "path": path,
            "query": query,
            "x_test": header("x-test"),
            "authorization": header("authorization"),
            "body": String::from_utf8_lossy(&body),
        })),
    )
}

/// Starts an upstream API stand-in that echoes what it received.
#[allow(unused)]
pub async fn spawn_upstream() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind upstream");
    let addr = listener.local_addr().expect("upstream addr");
    let app = Router::new().fallback(echo);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// An address nothing listens on.
#[allow(unused)]
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    addr
}

//! Reverse proxy for the backend API.
//!
//! Everything under [`API_PREFIX`] is forwarded to the configured API
//! service: same method, headers (minus hop-by-hop ones), query and body.
//! The upstream status, headers and body are streamed back unchanged.

use std::io;

use axum::{
    Router,
    body::{Body, Bytes, HttpBody},
    extract::{Request, State},
    http::{HeaderMap, Response, header},
    response::IntoResponse,
    routing::any,
};
use futures_util::StreamExt;
use gradientzoo_config::ProxyConfig;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, error};
use url::Url;

use crate::{errors::AppError, infra::app_state::AppState};

pub const API_PREFIX: &str = "/api";

const BODY_CHANNEL_CAPACITY: usize = 8;

const HOP_BY_HOP: [header::HeaderName; 7] = [
    header::CONNECTION,
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("no API proxy target is configured")]
    NoTarget,

    #[error("invalid upstream URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("upstream request failed: {0}")]
    Upstream(#[source] reqwest::Error),
}

impl From<ProxyError> for AppError {
    fn from(err: ProxyError) -> Self {
        AppError::bad_gateway(match err {
            ProxyError::NoTarget => "API proxy target is not configured",
            _ => "Bad Gateway",
        })
    }
}

/// Forwards requests to the API service.
#[derive(Debug, Clone)]
pub struct ApiProxy {
    client: reqwest::Client,
    base_url: Option<Url>,
    strip_prefix: bool,
}

impl ApiProxy {
    pub fn new(base_url: Option<Url>, strip_prefix: bool) -> Result<Self, ProxyError> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .no_proxy()
            .build()
            .map_err(ProxyError::Client)?;

        Ok(Self {
            client,
            base_url,
            strip_prefix,
        })
    }

    pub fn from_config(config: &ProxyConfig) -> Result<Self, ProxyError> {
        let base_url = config
            .target
            .as_ref()
            .map(|target| target.base_url())
            .transpose()?;
        Self::new(base_url, config.strip_prefix)
    }

    pub fn is_configured(&self) -> bool {
        self.base_url.is_some()
    }

    /// Maps an incoming path and query onto the upstream service.
    pub fn upstream_url(
        &self,
        path: &str,
        query: Option<&str>,
    ) -> Result<Url, ProxyError> {
        let mut url = self.base_url.clone().ok_or(ProxyError::NoTarget)?;

        let forwarded = if self.strip_prefix {
            match path.strip_prefix(API_PREFIX) {
                Some("") => "/",
                Some(rest) if rest.starts_with('/') => rest,
                _ => path,
            }
        } else {
            path
        };

        url.set_path(forwarded);
        url.set_query(query.filter(|q| !q.is_empty()));
        Ok(url)
    }

    pub async fn forward(&self, req: Request) -> Result<Response<Body>, ProxyError> {
        let url = self.upstream_url(req.uri().path(), req.uri().query())?;
        let (parts, body) = req.into_parts();

        debug!(method = %parts.method, %url, "proxying API request");

        let has_body =
            !body.is_end_stream() && body.size_hint().exact() != Some(0);

        let mut headers = parts.headers;
        strip_hop_by_hop(&mut headers);

        let mut builder = self
            .client
            .request(parts.method, url)
            .headers(headers);

        if has_body {
            builder = builder.body(stream_body(body));
        }

        let upstream = builder.send().await.map_err(ProxyError::Upstream)?;

        let status = upstream.status();
        let mut response_headers = upstream.headers().clone();
        strip_hop_by_hop(&mut response_headers);

        let mut response =
            Response::new(Body::from_stream(upstream.bytes_stream()));
        *response.status_mut() = status;
        *response.headers_mut() = response_headers;
        Ok(response)
    }
}

fn strip_hop_by_hop(headers: &mut HeaderMap) {
    // Headers named in `Connection` are hop-by-hop as well.
    let named: Vec<String> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(|name| name.trim().to_ascii_lowercase())
        .filter(|name| !name.is_empty())
        .collect();

    for name in HOP_BY_HOP {
        headers.remove(name);
    }
    headers.remove("keep-alive");
    for name in named {
        headers.remove(name.as_str());
    }
}

/// Pumps the incoming body into a channel so the upstream request can
/// stream it without buffering.
fn stream_body(body: Body) -> reqwest::Body {
    let (tx, rx) = mpsc::channel::<Result<Bytes, io::Error>>(BODY_CHANNEL_CAPACITY);

    tokio::spawn(async move {
        let mut stream = body.into_data_stream();
        while let Some(chunk) = stream.next().await {
            let item = chunk.map_err(io::Error::other);
            let failed = item.is_err();
            if tx.send(item).await.is_err() || failed {
                break;
            }
        }
    });

    reqwest::Body::wrap_stream(ReceiverStream::new(rx))
}

pub async fn proxy_api(
    State(state): State<AppState>,
    req: Request,
) -> Response<Body> {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    match state.proxy.forward(req).await {
        Ok(response) => response,
        Err(err) => {
            error!(error = %err, %method, %path, "proxy error");
            AppError::from(err).into_response()
        }
    }
}

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(API_PREFIX, any(proxy_api))
        .route("/api/", any(proxy_api))
        .route("/api/{*path}", any(proxy_api))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, StatusCode};

    fn proxy(strip_prefix: bool) -> ApiProxy {
        let base = Url::parse("http://10.0.0.7:8000").unwrap();
        ApiProxy::new(Some(base), strip_prefix).unwrap()
    }

    #[test]
    fn strips_mount_prefix() {
        let proxy = proxy(true);
        let url = |p: &str, q: Option<&str>| proxy.upstream_url(p, q).unwrap().to_string();

        assert_eq!(url("/api/models", None), "http://10.0.0.7:8000/models");
        assert_eq!(
            url("/api/models/alice", Some("page=2&sort=new")),
            "http://10.0.0.7:8000/models/alice?page=2&sort=new"
        );
        assert_eq!(url("/api", None), "http://10.0.0.7:8000/");
        assert_eq!(url("/api/", None), "http://10.0.0.7:8000/");
        assert_eq!(url("/api", Some("")), "http://10.0.0.7:8000/");
    }

    #[test]
    fn keeps_prefix_when_configured() {
        let url = proxy(false)
            .upstream_url("/api/models", Some("page=2"))
            .unwrap();
        assert_eq!(url.as_str(), "http://10.0.0.7:8000/api/models?page=2");
    }

    #[test]
    fn unconfigured_proxy_has_no_upstream() {
        let proxy = ApiProxy::new(None, true).unwrap();
        assert!(!proxy.is_configured());
        assert!(matches!(
            proxy.upstream_url("/api/models", None),
            Err(ProxyError::NoTarget)
        ));
    }

    #[test]
    fn removes_hop_by_hop_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive, x-trace"));
        headers.insert("keep-alive", HeaderValue::from_static("timeout=5"));
        headers.insert("x-trace", HeaderValue::from_static("1"));
        headers.insert(header::TRANSFER_ENCODING, HeaderValue::from_static("chunked"));
        headers.insert(header::HOST, HeaderValue::from_static("gradientzoo.com"));
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Token abc"));

        strip_hop_by_hop(&mut headers);

        assert_eq!(headers.len(), 2);
        assert!(headers.contains_key(header::HOST));
        assert!(headers.contains_key(header::AUTHORIZATION));
    }

    #[test]
    fn errors_map_to_bad_gateway() {
        let err = AppError::from(ProxyError::NoTarget);
        assert_eq!(err.status, StatusCode::BAD_GATEWAY);
    }
}

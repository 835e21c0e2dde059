//! HTTP basic authentication middleware
//!
//! Guards everything mounted behind it with a single username/password pair:
//! - missing `Authorization` header: 401 plus a `WWW-Authenticate` challenge
//! - header that is not `Basic base64(user:pass)`: 400
//! - wrong credentials: 401 plus the challenge
//!
//! Credentials are reduced to SHA-256 digests and compared with
//! `constant_time_eq`, so the comparison time does not depend on where the
//! supplied value first differs.

use axum::{
    body::Body,
    extract::Request,
    http::{HeaderValue, Response, StatusCode, header},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use constant_time_eq::constant_time_eq;
use gradientzoo_config::BasicCredentials;
use sha2::{Digest, Sha256};
use std::{
    fmt,
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};
use tower::{Layer, Service};
use tracing::{debug, warn};

pub const DEFAULT_REALM: &str = "Authorization Required";

type Sha256Digest = [u8; 32];

fn digest(value: &[u8]) -> Sha256Digest {
    Sha256::digest(value).into()
}

/// Outcome of checking one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthCheck {
    Granted,
    Missing,
    Malformed,
    Rejected,
}

/// Layer for basic auth middleware
#[derive(Clone)]
pub struct BasicAuthLayer {
    username: Sha256Digest,
    password: Sha256Digest,
    challenge: HeaderValue,
}

impl fmt::Debug for BasicAuthLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuthLayer")
            .field("challenge", &self.challenge)
            .finish_non_exhaustive()
    }
}

impl BasicAuthLayer {
    pub fn new(credentials: &BasicCredentials) -> Self {
        Self::with_realm(credentials, DEFAULT_REALM)
    }

    pub fn with_realm(credentials: &BasicCredentials, realm: &str) -> Self {
        let challenge = HeaderValue::from_str(&format!(
            "Basic realm=\"{}\"",
            realm.replace('"', "")
        ))
        .unwrap_or_else(|_| {
            HeaderValue::from_static("Basic realm=\"Authorization Required\"")
        });

        Self {
            username: digest(credentials.username.as_bytes()),
            password: digest(credentials.password.as_bytes()),
            challenge,
        }
    }

    /// Checks a raw `Authorization` header value.
    pub fn check(&self, authorization: Option<&HeaderValue>) -> AuthCheck {
        let Some(value) = authorization else {
            return AuthCheck::Missing;
        };
        let Some((user, pass)) = parse_basic(value) else {
            return AuthCheck::Malformed;
        };

        let user_ok = constant_time_eq(&digest(user.as_bytes()), &self.username);
        let pass_ok = constant_time_eq(&digest(pass.as_bytes()), &self.password);
        // Both digests are always compared.
        if user_ok & pass_ok {
            AuthCheck::Granted
        } else {
            AuthCheck::Rejected
        }
    }
}

/// Splits `Basic <base64(user:pass)>` into its parts. The header must be
/// exactly the `Basic` scheme, one space and the encoded pair; the password
/// may itself contain colons.
fn parse_basic(value: &HeaderValue) -> Option<(String, String)> {
    let raw = value.to_str().ok()?;
    let mut parts = raw.split(' ');
    let (Some(scheme), Some(encoded), None) = (parts.next(), parts.next(), parts.next())
    else {
        return None;
    };
    if scheme != "Basic" {
        return None;
    }

    let decoded = STANDARD.decode(encoded).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, pass) = decoded.split_once(':')?;
    Some((user.to_string(), pass.to_string()))
}

impl<S> Layer<S> for BasicAuthLayer {
    type Service = BasicAuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        debug!("installing basic auth middleware layer");
        BasicAuthMiddleware {
            inner,
            auth: self.clone(),
        }
    }
}

/// Basic auth middleware
#[derive(Clone)]
pub struct BasicAuthMiddleware<S> {
    inner: S,
    auth: BasicAuthLayer,
}

impl<S> fmt::Debug for BasicAuthMiddleware<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuthMiddleware")
            .field("auth", &self.auth)
            .finish_non_exhaustive()
    }
}

impl<S> BasicAuthMiddleware<S> {
    fn unauthorized(&self) -> Response<Body> {
        let mut response = Response::new(Body::from("Unauthorized"));
        *response.status_mut() = StatusCode::UNAUTHORIZED;
        response
            .headers_mut()
            .insert(header::WWW_AUTHENTICATE, self.auth.challenge.clone());
        response
    }

    fn bad_request() -> Response<Body> {
        let mut response = Response::new(Body::from("Bad Request"));
        *response.status_mut() = StatusCode::BAD_REQUEST;
        response
    }
}

impl<S> Service<Request<Body>> for BasicAuthMiddleware<S>
where
    S: Service<Request<Body>, Response = Response<Body>>
        + Send
        + Clone
        + 'static,
    S::Future: Send + 'static,
{
    type Response = Response<Body>;
    type Error = S::Error;
    type Future = Pin<
        Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(
        &mut self,
        cx: &mut Context<'_>,
    ) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        match self.auth.check(req.headers().get(header::AUTHORIZATION)) {
            AuthCheck::Granted => {
                // The ready service goes to this call; keep a fresh clone.
                let clone = self.inner.clone();
                let mut inner = std::mem::replace(&mut self.inner, clone);
                Box::pin(async move { inner.call(req).await })
            }
            AuthCheck::Missing => {
                debug!(path = %req.uri().path(), "request without credentials");
                let response = self.unauthorized();
                Box::pin(async move { Ok::<_, S::Error>(response) })
            }
            AuthCheck::Rejected => {
                warn!(path = %req.uri().path(), "rejected basic auth credentials");
                let response = self.unauthorized();
                Box::pin(async move { Ok::<_, S::Error>(response) })
            }
            AuthCheck::Malformed => {
                debug!(path = %req.uri().path(), "malformed authorization header");
                let response = Self::bad_request();
                Box::pin(async move { Ok::<_, S::Error>(response) })
            }
        }
    }
}

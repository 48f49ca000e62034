//! HTTP Basic authentication guard.
//!
//! # Security Features
//!
//! - **Constant-time comparison**: Prevents timing attacks on credential checks
//! - **Pluggable verification**: Credentials are checked through [`CredentialVerifier`]
//! - **Challenge header**: 401 responses carry `WWW-Authenticate: Basic realm="..."`
//!
//! # Usage
//!
//! The accepted pair defaults to `user` / `password` and can be overridden:
//!
//! ```bash
//! AUTH_USERNAME=alice AUTH_PASSWORD=s3cret cargo run
//! ```
//!
//! Clients provide the pair with the standard header:
//!
//! ```bash
//! curl -u alice:s3cret -X POST \
//!   "http://localhost:5000/client/acme?start_date=01-01-2024&end_date=31-01-2024" \
//!   -H 'Content-Type: application/json' -d '{"date":"15-01-2024","amount":42}'
//! ```

use std::fmt;
use std::sync::Arc;

use axum::body::Body;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderValue, Request};
use base64::{Engine, engine::general_purpose::STANDARD as B64};
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use super::guard::RequestGuard;
use crate::error::{AppError, AppResult};

/// Authorization scheme accepted by this guard.
pub const BASIC_SCHEME: &str = "Basic";

/// Capability that decides whether a username/password pair is accepted.
///
/// Swapping the implementation (e.g. for a secret-store lookup) does not
/// change where authentication runs in the guard chain.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, username: &str, password: &str) -> bool;
}

/// Verifier that accepts exactly one configured username/password pair.
#[derive(Clone)]
pub struct StaticCredentials {
    username: String,
    password: String,
}

impl StaticCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl CredentialVerifier for StaticCredentials {
    fn verify(&self, username: &str, password: &str) -> bool {
        // Both halves are always compared so timing does not reveal which one failed
        let user_ok = username.as_bytes().ct_eq(self.username.as_bytes());
        let pass_ok = password.as_bytes().ct_eq(self.password.as_bytes());
        (user_ok & pass_ok).into()
    }
}

impl fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Username/password pair decoded from an `Authorization: Basic` header.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Decode a Basic `Authorization` header value.
///
/// The scheme is matched case-insensitively. The password is everything
/// after the first `:` and may itself contain colons. Returns `None` for
/// any other scheme, invalid base64, non-UTF-8 content or a missing colon.
pub fn parse_basic_credentials(header: &HeaderValue) -> Option<BasicCredentials> {
    let value = header.to_str().ok()?;
    let (scheme, encoded) = value.trim().split_once(' ')?;

    if !scheme.eq_ignore_ascii_case(BASIC_SCHEME) {
        return None;
    }

    let decoded = B64.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;

    Some(BasicCredentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}

/// Basic authentication guard.
///
/// First stage of the chain: on a missing, malformed or rejected
/// `Authorization` header the request is answered with 401 and nothing
/// downstream runs.
#[derive(Clone)]
pub struct BasicAuth {
    verifier: Arc<dyn CredentialVerifier>,
    realm: Arc<str>,
}

impl BasicAuth {
    /// Create a new Basic auth guard.
    ///
    /// # Arguments
    ///
    /// * `verifier` - Decides which credentials are accepted
    /// * `realm` - Realm advertised in the `WWW-Authenticate` challenge
    pub fn new(verifier: Arc<dyn CredentialVerifier>, realm: impl Into<Arc<str>>) -> Self {
        Self {
            verifier,
            realm: realm.into(),
        }
    }

    fn unauthorized(&self) -> AppError {
        AppError::Unauthorized {
            realm: self.realm.to_string(),
        }
    }
}

impl RequestGuard for BasicAuth {
    const NAME: &'static str = "auth";

    async fn check(&self, req: Request<Body>) -> AppResult<Request<Body>> {
        let Some(header) = req.headers().get(AUTHORIZATION) else {
            warn!(path = %req.uri().path(), "Missing credentials");
            return Err(self.unauthorized());
        };

        let Some(credentials) = parse_basic_credentials(header) else {
            warn!(path = %req.uri().path(), "Malformed Authorization header");
            return Err(self.unauthorized());
        };

        if !self
            .verifier
            .verify(&credentials.username, &credentials.password)
        {
            warn!(path = %req.uri().path(), "Invalid credentials provided");
            return Err(self.unauthorized());
        }

        debug!("Basic authentication successful");
        Ok(req)
    }
}

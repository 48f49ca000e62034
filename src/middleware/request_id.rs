//! Request ID middleware for log correlation.
//!
//! Every request gets an ID: the caller's `X-Request-Id` when present and
//! non-empty, otherwise a fresh UUIDv4. The ID is stored in the request
//! extensions as [`RequestId`], recorded on the current span, and echoed on
//! the response, including guard rejections.
//!
//! ```bash
//! curl -H "X-Request-Id: my-correlation-id" -u user:password -X POST ...
//! ```

use std::fmt;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::header::HeaderValue;
use axum::http::{Request, Response};
use tower::{Layer, Service};
use tracing::{Span, debug};
use uuid::Uuid;

/// Header name for request ID.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Correlation ID attached to a single request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestId(HeaderValue);

impl RequestId {
    /// Take the ID from the request headers or generate a new one.
    pub fn from_request<B>(req: &Request<B>) -> Self {
        req.headers()
            .get(REQUEST_ID_HEADER)
            .filter(|v| !v.is_empty() && v.to_str().is_ok())
            .cloned()
            .map(Self)
            .unwrap_or_else(Self::generate)
    }

    /// Generate a fresh UUIDv4 ID.
    pub fn generate() -> Self {
        let id = Uuid::new_v4().to_string();
        // A hyphenated UUID is always a valid header value
        Self(HeaderValue::from_str(&id).unwrap_or_else(|_| HeaderValue::from_static("unknown")))
    }

    pub fn header_value(&self) -> &HeaderValue {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        self.0.to_str().unwrap_or("unknown")
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request ID layer for Tower middleware stack.
#[derive(Clone, Default)]
pub struct RequestIdLayer;

impl RequestIdLayer {
    /// Create a new request ID layer.
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for RequestIdLayer {
    type Service = RequestIdService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestIdService { inner }
    }
}

/// Request ID service wrapper.
#[derive(Clone)]
pub struct RequestIdService<S> {
    inner: S,
}

impl<S> Service<Request<Body>> for RequestIdService<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response<Body>;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let request_id = RequestId::from_request(&req);

        req.headers_mut()
            .insert(REQUEST_ID_HEADER, request_id.header_value().clone());
        req.extensions_mut().insert(request_id.clone());

        Span::current().record("request_id", request_id.as_str());
        debug!(request_id = %request_id, "Processing request");

        let mut inner = self.inner.clone();

        Box::pin(async move {
            let mut response = inner.call(req).await?;
            response
                .headers_mut()
                .insert(REQUEST_ID_HEADER, request_id.header_value().clone());
            Ok(response)
        })
    }
}

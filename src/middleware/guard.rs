//! Generic Tower layer for request guards.
//!
//! A guard inspects the in-flight request and either hands it (possibly
//! enriched with validated data in its extensions) to the next service, or
//! ends processing with an [`AppError`] response. Stacking several
//! [`GuardLayer`]s gives an ordered chain in which the first failing guard
//! answers the request and no later guard or handler runs.
//!
//! ```text
//! Request → BasicAuth → QueryGuard → PayloadGuard → Handler
//!              ↓            ↓             ↓
//!             401          422         422 / 413
//! ```

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::{Request, Response};
use axum::response::IntoResponse;
use tower::{Layer, Service};
use tracing::{debug, warn};

use crate::error::AppResult;

/// A single stage in the guard chain.
pub trait RequestGuard: Clone + Send + Sync + 'static {
    /// Short name used in log output.
    const NAME: &'static str;

    /// Inspect the request, returning it to continue or an error to short-circuit.
    fn check(
        &self,
        req: Request<Body>,
    ) -> impl Future<Output = AppResult<Request<Body>>> + Send;
}

/// Layer that runs a [`RequestGuard`] before the inner service.
#[derive(Clone)]
pub struct GuardLayer<G> {
    guard: G,
}

impl<G> GuardLayer<G> {
    /// Wrap a guard as a Tower layer.
    pub fn new(guard: G) -> Self {
        Self { guard }
    }
}

impl<S, G: Clone> Layer<S> for GuardLayer<G> {
    type Service = GuardService<S, G>;

    fn layer(&self, inner: S) -> Self::Service {
        GuardService {
            inner,
            guard: self.guard.clone(),
        }
    }
}

/// Service wrapper produced by [`GuardLayer`].
#[derive(Clone)]
pub struct GuardService<S, G> {
    inner: S,
    guard: G,
}

impl<S, G> Service<Request<Body>> for GuardService<S, G>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send,
    G: RequestGuard,
{
    type Response = Response<Body>;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let guard = self.guard.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let path = req.uri().path().to_owned();

            match guard.check(req).await {
                Ok(req) => {
                    debug!(guard = G::NAME, path = %path, "Guard passed");
                    inner.call(req).await
                }
                Err(err) => {
                    warn!(guard = G::NAME, path = %path, reason = %err, "Request rejected");
                    Ok(err.into_response())
                }
            }
        })
    }
}

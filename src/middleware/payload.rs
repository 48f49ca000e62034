//! JSON body guard.
//!
//! Buffers the whole body (bounded by the configured limit), validates it and
//! rebuilds the request so the handler still sees the original bytes.

use std::error::Error as StdError;

use axum::body::Body;
use axum::http::Request;
use axum::http::header::CONTENT_TYPE;
use http_body_util::LengthLimitError;
use tracing::{debug, warn};

use super::guard::RequestGuard;
use crate::error::{AppError, AppResult};
use crate::validation::validate_payload;

/// Third and last stage of the chain.
///
/// On success the validated [`ClientPayload`](crate::models::ClientPayload)
/// is stored in the request extensions for the handler.
#[derive(Clone, Copy, Debug)]
pub struct PayloadGuard {
    max_body_size: usize,
}

impl PayloadGuard {
    /// Create a guard that reads at most `max_body_size` bytes.
    pub fn new(max_body_size: usize) -> Self {
        Self { max_body_size }
    }
}

impl RequestGuard for PayloadGuard {
    const NAME: &'static str = "payload";

    async fn check(&self, req: Request<Body>) -> AppResult<Request<Body>> {
        let (mut parts, body) = req.into_parts();

        let bytes = axum::body::to_bytes(body, self.max_body_size)
            .await
            .map_err(|e| {
                if exceeded_length_limit(&e) {
                    warn!(limit = self.max_body_size, "Request body over limit");
                    AppError::PayloadTooLarge
                } else {
                    warn!(error = %e, "Failed to read request body");
                    AppError::InvalidJsonPayload
                }
            })?;

        // A non-UTF-8 Content-Type can never name JSON
        let content_type = parts
            .headers
            .get(CONTENT_TYPE)
            .map(|v| v.to_str().unwrap_or_default());

        let payload = validate_payload(content_type, &bytes)?;
        debug!(date = %payload.date, amount = %payload.amount, "Payload valid");

        parts.extensions.insert(payload);
        Ok(Request::from_parts(parts, Body::from(bytes)))
    }
}

/// Whether a body read failed because the size limit was hit, as opposed to
/// the client stream breaking off.
fn exceeded_length_limit(err: &axum::Error) -> bool {
    let mut source: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(e) = source {
        if e.is::<LengthLimitError>() {
            return true;
        }
        source = e.source();
    }
    false
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::io;

    use axum::body::Bytes;
    use serde_json::Number;

    use super::*;
    use crate::models::ClientPayload;

    fn request(content_type: Option<&str>, body: &'static str) -> Request<Body> {
        let mut builder = Request::builder().method("POST").uri("/client/a");
        if let Some(ct) = content_type {
            builder = builder.header(CONTENT_TYPE, ct);
        }
        builder.body(Body::from(body)).unwrap()
    }

    #[tokio::test]
    async fn test_inserts_payload_and_keeps_body() {
        let raw = r#"{"date":"25-12-2024","amount":42}"#;
        let req = PayloadGuard::new(1024)
            .check(request(Some("application/json"), raw))
            .await
            .unwrap();

        let payload = req.extensions().get::<ClientPayload>().unwrap().clone();
        assert_eq!(payload.date, "25-12-2024");
        assert_eq!(payload.amount, Number::from(42));

        let body = axum::body::to_bytes(req.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], raw.as_bytes());
    }

    #[tokio::test]
    async fn test_body_over_limit() {
        let result = PayloadGuard::new(8)
            .check(request(
                Some("application/json"),
                r#"{"date":"25-12-2024","amount":42}"#,
            ))
            .await;
        assert!(matches!(result, Err(AppError::PayloadTooLarge)));
    }

    #[tokio::test]
    async fn test_empty_body_is_invalid_json() {
        let result = PayloadGuard::new(1024)
            .check(request(Some("application/json"), ""))
            .await;
        assert!(matches!(result, Err(AppError::InvalidJsonPayload)));
    }

    #[tokio::test]
    async fn test_form_content_type_is_invalid_json() {
        let result = PayloadGuard::new(1024)
            .check(request(
                Some("application/x-www-form-urlencoded"),
                "date=25-12-2024&amount=42",
            ))
            .await;
        assert!(matches!(result, Err(AppError::InvalidJsonPayload)));
    }

    #[tokio::test]
    async fn test_string_amount() {
        let result = PayloadGuard::new(1024)
            .check(request(
                Some("application/json"),
                r#"{"date":"25-12-2024","amount":"100"}"#,
            ))
            .await;
        assert!(matches!(result, Err(AppError::InvalidAmount)));
    }

    #[tokio::test]
    async fn test_missing_content_type_is_invalid_json() {
        let result = PayloadGuard::new(1024)
            .check(request(None, r#"{"date":"25-12-2024","amount":1}"#))
            .await;
        assert!(matches!(result, Err(AppError::InvalidJsonPayload)));
    }

    #[tokio::test]
    async fn test_interrupted_body_is_not_too_large() {
        let chunks: Vec<Result<Bytes, io::Error>> = vec![
            Ok(Bytes::from_static(b"{\"date\":")),
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset")),
        ];
        let req = Request::builder()
            .method("POST")
            .uri("/client/a")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from_stream(futures::stream::iter(chunks)))
            .unwrap();

        let result = PayloadGuard::new(1024).check(req).await;
        assert!(matches!(result, Err(AppError::InvalidJsonPayload)));
    }
}

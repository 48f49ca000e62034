//! Query-parameter guard for the `start_date`/`end_date` range.

use axum::body::Body;
use axum::extract::Query;
use axum::http::Request;
use tracing::debug;

use super::guard::RequestGuard;
use crate::error::AppResult;
use crate::validation::validate_query_params;

/// Second stage of the chain.
///
/// On success the validated [`DateRange`](crate::models::DateRange) is
/// stored in the request extensions for the handler.
#[derive(Clone, Copy, Debug, Default)]
pub struct QueryGuard;

impl RequestGuard for QueryGuard {
    const NAME: &'static str = "query";

    async fn check(&self, mut req: Request<Body>) -> AppResult<Request<Body>> {
        // An unparseable query string is treated as carrying no parameters
        let pairs = Query::<Vec<(String, String)>>::try_from_uri(req.uri())
            .map(|Query(pairs)| pairs)
            .unwrap_or_default();

        let range = validate_query_params(&pairs)?;
        debug!(start_date = %range.start_date, end_date = %range.end_date, "Query parameters valid");

        req.extensions_mut().insert(range);
        Ok(req)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::DateRange;

    fn request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_inserts_date_range() {
        let req = QueryGuard
            .check(request("/client/a?start_date=01-01-2024&end_date=31-01-2024"))
            .await
            .unwrap();

        let range = req.extensions().get::<DateRange>().unwrap();
        assert_eq!(range.start_date, "01-01-2024");
        assert_eq!(range.end_date, "31-01-2024");
    }

    #[tokio::test]
    async fn test_no_query_string() {
        let result = QueryGuard.check(request("/client/a")).await;
        assert!(matches!(result, Err(AppError::MissingQueryParameters)));
    }

    #[tokio::test]
    async fn test_percent_encoded_values_are_decoded() {
        let req = QueryGuard
            .check(request("/client/a?start_date=01%2D01%2D2024&end_date=31-01-2024"))
            .await
            .unwrap();

        let range = req.extensions().get::<DateRange>().unwrap();
        assert_eq!(range.start_date, "01-01-2024");
    }

    #[tokio::test]
    async fn test_bad_format() {
        let result = QueryGuard
            .check(request("/client/a?start_date=2024-01-01&end_date=31-01-2024"))
            .await;
        assert!(matches!(result, Err(AppError::InvalidQueryDate)));
    }
}

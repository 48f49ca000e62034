//! Client echo endpoint.
//!
//! # Endpoint
//!
//! - `POST /client/{client_id}?start_date=DD-MM-YYYY&end_date=DD-MM-YYYY`
//!
//! Only reached after the auth, query and payload guards passed; the
//! validated values are taken from the request extensions as-is.

use axum::Json;
use axum::extract::rejection::PathRejection;
use axum::extract::{Extension, Path};
use axum::http::Uri;
use percent_encoding::percent_decode_str;
use tracing::{debug, info, instrument};

use crate::models::{ClientPayload, DateRange, EchoResponse};

/// Echo the validated request back to the client.
///
/// # Response Body
///
/// ```json
/// {
///   "client_id": "acme",
///   "received_date": "15-01-2024",
///   "amount": 42.5,
///   "query_start_date": "01-01-2024",
///   "query_end_date": "31-01-2024"
/// }
/// ```
#[instrument(skip_all, fields(client_id = tracing::field::Empty))]
pub async fn echo_client(
    uri: Uri,
    path: Result<Path<String>, PathRejection>,
    Extension(range): Extension<DateRange>,
    Extension(payload): Extension<ClientPayload>,
) -> Json<EchoResponse> {
    let client_id = match path {
        Ok(Path(client_id)) => client_id,
        Err(rejection) => {
            debug!(error = %rejection, "Path segment is not UTF-8, decoding lossily");
            lossy_client_id(&uri)
        }
    };
    tracing::Span::current().record("client_id", client_id.as_str());

    info!("Client request accepted");
    Json(EchoResponse::new(client_id, range, payload))
}

/// Percent-decode the last path segment, replacing invalid UTF-8 with U+FFFD.
fn lossy_client_id(uri: &Uri) -> String {
    let segment = uri.path().rsplit('/').next().unwrap_or_default();
    percent_decode_str(segment).decode_utf8_lossy().into_owned()
}

use chrono::NaiveDate;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::models::{ClientPayload, DateRange};

// =============================================================================
// Validation Constants
// =============================================================================

/// Query parameter holding the first day of the requested range.
pub const START_DATE_PARAM: &str = "start_date";

/// Query parameter holding the last day of the requested range.
pub const END_DATE_PARAM: &str = "end_date";

/// Body field holding the transaction date.
pub const DATE_FIELD: &str = "date";

/// Body field holding the transaction amount.
pub const AMOUNT_FIELD: &str = "amount";

/// Parse a `DD-MM-YYYY` date.
///
/// Rules:
/// - Exactly ten characters: two-digit day, `-`, two-digit month, `-`, four-digit year
/// - Every digit position must be an ASCII digit (no signs, no whitespace)
/// - The date must exist on the calendar (`31-02-2024` is rejected)
/// - Year `0000` is rejected
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let &[d1, d2, b'-', m1, m2, b'-', y1, y2, y3, y4] = value.as_bytes() else {
        return None;
    };

    let day = digits(&[d1, d2])?;
    let month = digits(&[m1, m2])?;
    let year = digits(&[y1, y2, y3, y4])?;

    if year == 0 {
        return None;
    }

    NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, day)
}

/// Check whether a string is a real calendar date in `DD-MM-YYYY` form.
///
/// Never panics; malformed input simply yields `false`.
pub fn is_valid_date(value: &str) -> bool {
    parse_date(value).is_some()
}

fn digits(bytes: &[u8]) -> Option<u32> {
    bytes.iter().try_fold(0u32, |acc, b| {
        b.is_ascii_digit()
            .then(|| acc * 10 + u32::from(b - b'0'))
    })
}

/// Validate the `start_date`/`end_date` query pair.
///
/// Presence of both parameters is checked before the format of either, so a
/// request missing `end_date` is reported as missing even when `start_date`
/// is malformed. An empty value counts as missing. When a key is repeated the
/// first occurrence wins.
pub fn validate_query_params(pairs: &[(String, String)]) -> AppResult<DateRange> {
    let start_date = first_non_empty(pairs, START_DATE_PARAM);
    let end_date = first_non_empty(pairs, END_DATE_PARAM);

    let (Some(start_date), Some(end_date)) = (start_date, end_date) else {
        return Err(AppError::MissingQueryParameters);
    };

    if !is_valid_date(start_date) || !is_valid_date(end_date) {
        return Err(AppError::InvalidQueryDate);
    }

    Ok(DateRange {
        start_date: start_date.to_string(),
        end_date: end_date.to_string(),
    })
}

fn first_non_empty<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
        .filter(|v| !v.is_empty())
}

/// Validate a raw request body as a client payload.
///
/// Checks in order:
/// 1. A `Content-Type` must be present and name a JSON media type
/// 2. The body must parse as JSON and be an object (empty body fails here)
/// 3. `date` must be a string in `DD-MM-YYYY` form
/// 4. `amount` must be a JSON number; numeric strings and booleans are rejected
pub fn validate_payload(content_type: Option<&str>, body: &[u8]) -> AppResult<ClientPayload> {
    if !content_type.is_some_and(is_json_content_type) {
        return Err(AppError::InvalidJsonPayload);
    }

    let value: Value = serde_json::from_slice(body).map_err(|_| AppError::InvalidJsonPayload)?;
    let Value::Object(fields) = value else {
        return Err(AppError::InvalidJsonPayload);
    };

    let date = fields
        .get(DATE_FIELD)
        .and_then(Value::as_str)
        .filter(|d| is_valid_date(d))
        .ok_or(AppError::InvalidDate)?;

    let amount = match fields.get(AMOUNT_FIELD) {
        Some(Value::Number(n)) => n.clone(),
        _ => return Err(AppError::InvalidAmount),
    };

    Ok(ClientPayload {
        date: date.to_string(),
        amount,
    })
}

/// Check whether a `Content-Type` value names JSON.
///
/// Accepts `application/json` and any `application/*+json` type, ignoring
/// parameters such as `charset` and letter case.
pub fn is_json_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}
